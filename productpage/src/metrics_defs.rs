use shared::metrics_defs::{MetricDef, MetricType};

pub const COMPOSITE_RENDERS: MetricDef = MetricDef {
    name: "productpage.composite.renders",
    metric_type: MetricType::Counter,
    description: "Composite results built. Tagged with details, reviews (ok or error).",
};

pub const REVIEWS_RETRIES: MetricDef = MetricDef {
    name: "productpage.reviews.retries",
    metric_type: MetricType::Counter,
    description: "Reviews calls repeated after a transport failure",
};

pub const FLOOD_CALLS: MetricDef = MetricDef {
    name: "productpage.flood.calls",
    metric_type: MetricType::Counter,
    description: "Fire-and-forget flood calls launched",
};

pub const FLOOD_BURSTS_DROPPED: MetricDef = MetricDef {
    name: "productpage.flood.bursts_dropped",
    metric_type: MetricType::Counter,
    description: "Flood bursts dropped because the dispatch backlog was full",
};

pub const ALL_METRICS: &[MetricDef] = &[
    COMPOSITE_RENDERS,
    REVIEWS_RETRIES,
    FLOOD_CALLS,
    FLOOD_BURSTS_DROPPED,
];
