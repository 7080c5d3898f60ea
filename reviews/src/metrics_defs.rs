use shared::metrics_defs::{MetricDef, MetricType};

pub const REVIEWS_SERVED: MetricDef = MetricDef {
    name: "reviews.served",
    metric_type: MetricType::Counter,
    description: "Review sets returned. Tagged with ratings (disabled, ok, unavailable).",
};

pub const ALL_METRICS: &[MetricDef] = &[REVIEWS_SERVED];
