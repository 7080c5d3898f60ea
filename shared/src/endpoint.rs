use std::time::Duration;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum EndpointError {
    #[error("invalid base URL {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("base URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// A downstream service reachable over HTTP.
///
/// Built once from configuration at startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceEndpoint {
    name: String,
    base_url: Url,
    segment: String,
    timeout: Duration,
}

impl ServiceEndpoint {
    /// Builds `http://{host}{domain}:{port}/{segment}`.
    ///
    /// `domain` is appended to the host verbatim.
    pub fn new(
        name: &str,
        host: &str,
        domain: &str,
        port: u16,
        segment: &str,
        timeout: Duration,
    ) -> Result<Self, EndpointError> {
        let raw = format!("http://{host}{domain}:{port}");
        let base_url = Url::parse(&raw).map_err(|e| EndpointError::InvalidUrl(raw.clone(), e))?;
        if base_url.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(raw));
        }

        Ok(ServiceEndpoint {
            name: name.to_string(),
            base_url,
            segment: segment.trim_matches('/').to_string(),
            timeout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL of `{segment}/{path}` on this endpoint.
    pub fn url_for(&self, path: &str) -> Result<Url, EndpointError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| EndpointError::CannotBeABase(self.base_url.to_string()))?;
            segments.pop_if_empty();
            if !self.segment.is_empty() {
                segments.push(&self.segment);
            }
            if !path.is_empty() {
                segments.push(path);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let endpoint = ServiceEndpoint::new(
            "details",
            "details",
            ".default.svc.cluster.local",
            9080,
            "details",
            Duration::from_secs(3),
        )
        .unwrap();

        assert_eq!(
            endpoint.base_url().as_str(),
            "http://details.default.svc.cluster.local:9080/"
        );
        assert_eq!(
            endpoint.url_for("0").unwrap().as_str(),
            "http://details.default.svc.cluster.local:9080/details/0"
        );
        assert_eq!(endpoint.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_endpoint_without_domain() {
        let endpoint =
            ServiceEndpoint::new("ratings", "127.0.0.1", "", 9083, "/ratings/", Duration::ZERO)
                .unwrap();
        assert_eq!(
            endpoint.url_for("7").unwrap().as_str(),
            "http://127.0.0.1:9083/ratings/7"
        );
    }

    #[test]
    fn test_domain_appended_verbatim() {
        let endpoint =
            ServiceEndpoint::new("reviews", "reviews", "-canary.mesh", 9082, "reviews", Duration::ZERO)
                .unwrap();
        assert_eq!(endpoint.base_url().host_str(), Some("reviews-canary.mesh"));

        let endpoint =
            ServiceEndpoint::new("reviews", "reviews", ".mesh", 9082, "reviews", Duration::ZERO)
                .unwrap();
        assert_eq!(endpoint.base_url().host_str(), Some("reviews.mesh"));
    }

    #[test]
    fn test_invalid_host() {
        let result =
            ServiceEndpoint::new("details", "bad host", "", 9081, "details", Duration::ZERO);
        assert!(matches!(result, Err(EndpointError::InvalidUrl(_, _))));
    }
}
