// Selects the inbound headers that are propagated to downstream services.
// Only trace context, identity and session headers travel with a request; everything
// else stays at the edge of the service that received it.

use http::{HeaderMap, HeaderValue};
use indexmap::IndexMap;

/// Headers propagated between services. Keep in sync across productpage, reviews and details.
pub static FORWARD_HEADERS: &[&str] = &[
    // Request id used for access logs and consistent trace sampling.
    "x-request-id",
    // Lightstep
    "x-ot-span-context",
    // Datadog
    "x-datadog-trace-id",
    "x-datadog-parent-id",
    "x-datadog-sampling-priority",
    // W3C trace context
    "traceparent",
    "tracestate",
    // Cloud trace context
    "x-cloud-trace-context",
    // gRPC binary trace context
    "grpc-trace-bin",
    // b3 (Zipkin)
    "x-b3-traceid",
    "x-b3-spanid",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "x-b3-flags",
    // Application specific
    "end-user",
    "user-agent",
    // Context and session
    "cookie",
    "authorization",
    "jwt",
];

/// Header name used to carry the logged in user to downstream services.
pub const END_USER: &str = "end-user";

/// Inbound headers keyed by name as received, each with every value received for it.
///
/// Values are kept as raw header bytes, so opaque values such as cookies holding
/// non-ASCII bytes travel unchanged.
pub type InboundHeaders = IndexMap<String, Vec<HeaderValue>>;

/// Collects the headers of an incoming request in arrival order.
pub fn inbound_headers(headers: &HeaderMap) -> InboundHeaders {
    let mut inbound = InboundHeaders::new();
    for name in headers.keys() {
        let values: Vec<HeaderValue> = headers.get_all(name).iter().cloned().collect();
        inbound.insert(name.as_str().to_string(), values);
    }
    inbound
}

/// The subset of inbound headers that is forwarded downstream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwardHeaders {
    entries: IndexMap<String, Vec<HeaderValue>>,
}

impl ForwardHeaders {
    /// Adds or replaces a header. Used for headers synthesized by the service itself.
    pub fn insert<N>(&mut self, name: N, value: HeaderValue)
    where
        N: Into<String>,
    {
        self.entries.insert(name.into(), vec![value]);
    }

    pub fn get(&self, name: &str) -> Option<&[HeaderValue]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// One value per header name: the first one received.
    ///
    /// Additional values of a multi-valued header are not propagated.
    pub fn first_values(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries
            .iter()
            .filter_map(|(name, values)| values.first().map(|v| (name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps the entries whose name exactly matches an allow-list entry.
///
/// Matching is case-sensitive and no name normalization happens here. Entries keep
/// their inbound order; nothing is added.
pub fn filter(all: &InboundHeaders, allow_list: &[&str]) -> ForwardHeaders {
    let entries = all
        .iter()
        .filter(|(name, _)| allow_list.contains(&name.as_str()))
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect();

    ForwardHeaders { entries }
}

/// Shortcut for filtering a request's headers against [`FORWARD_HEADERS`].
pub fn forward_headers(headers: &HeaderMap) -> ForwardHeaders {
    filter(&inbound_headers(headers), FORWARD_HEADERS)
}
