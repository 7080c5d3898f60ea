use shared::metrics_defs::{MetricDef, MetricType};

pub const FAULT_DECISIONS: MetricDef = MetricDef {
    name: "ratings.fault.decisions",
    metric_type: MetricType::Counter,
    description: "Admission decisions taken by the fault simulator. Tagged with decision.",
};

pub const HEALTH_TRANSITIONS: MetricDef = MetricDef {
    name: "ratings.health.transitions",
    metric_type: MetricType::Counter,
    description: "Timer driven flips of the simulated health state. Tagged with mode.",
};

pub const STORE_FETCHES: MetricDef = MetricDef {
    name: "ratings.store.fetches",
    metric_type: MetricType::Counter,
    description: "Rating lookups. Tagged with source (override or store name), outcome.",
};

pub const OVERRIDES_WRITTEN: MetricDef = MetricDef {
    name: "ratings.overrides.written",
    metric_type: MetricType::Counter,
    description: "User submitted ratings recorded in memory",
};

pub const ALL_METRICS: &[MetricDef] = &[
    FAULT_DECISIONS,
    HEALTH_TRANSITIONS,
    STORE_FETCHES,
    OVERRIDES_WRITTEN,
];
