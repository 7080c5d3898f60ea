//! Common types for metrics definitions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "Counter",
            MetricType::Gauge => "Gauge",
            MetricType::Histogram => "Histogram",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

#[macro_export]
macro_rules! counter {
    ($def:expr) => {
        metrics::counter!($def.name)
    };
    ($def:expr, $($labels:tt)+) => {
        metrics::counter!($def.name, $($labels)+)
    };
}

#[macro_export]
macro_rules! gauge {
    ($def:expr) => {
        metrics::gauge!($def.name)
    };
    ($def:expr, $($labels:tt)+) => {
        metrics::gauge!($def.name, $($labels)+)
    };
}

#[macro_export]
macro_rules! histogram {
    ($def:expr) => {
        metrics::histogram!($def.name)
    };
    ($def:expr, $($labels:tt)+) => {
        metrics::histogram!($def.name, $($labels)+)
    };
}

pub const DOWNSTREAM_REQUEST_DURATION: MetricDef = MetricDef {
    name: "downstream.request.duration",
    metric_type: MetricType::Histogram,
    description: "Downstream call duration in seconds. Tagged with service, outcome.",
};

pub const DOWNSTREAM_REQUESTS: MetricDef = MetricDef {
    name: "downstream.requests",
    metric_type: MetricType::Counter,
    description: "Downstream calls issued. Tagged with service, outcome.",
};

pub const ALL_METRICS: &[MetricDef] = &[DOWNSTREAM_REQUEST_DURATION, DOWNSTREAM_REQUESTS];
