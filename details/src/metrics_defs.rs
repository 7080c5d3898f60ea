use shared::metrics_defs::{MetricDef, MetricType};

pub const DETAILS_LOOKUPS: MetricDef = MetricDef {
    name: "details.lookups",
    metric_type: MetricType::Counter,
    description: "Book detail lookups. Tagged with source, outcome.",
};

pub const ALL_METRICS: &[MetricDef] = &[DETAILS_LOOKUPS];
