use metrics_exporter_statsd::StatsdBuilder;
use shared::metrics_defs::{MetricDef, MetricType};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const METRICS_PREFIX: &str = "bookinfo";

#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
    #[error("failed to build statsd exporter: {0}")]
    Statsd(#[from] metrics_exporter_statsd::StatsdError),
    #[error("a metrics recorder is already installed")]
    Recorder,
}

/// Reports errors to Sentry when a DSN is configured. Keep the guard alive
/// until shutdown so pending events get flushed.
pub fn init_sentry(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.filter(|dsn| !dsn.is_empty())?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

pub fn init_tracing(filter: &str, sentry_enabled: bool) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_new(filter)?;
    let sentry_layer = sentry_enabled.then(|| sentry::integrations::tracing::layer());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(sentry_layer)
        .try_init()?;
    Ok(())
}

/// Installs the StatsD recorder and registers every known metric description.
pub fn init_metrics(host: &str, port: u16) -> Result<(), ObservabilityError> {
    let recorder = StatsdBuilder::from(host, port).build(Some(METRICS_PREFIX))?;
    metrics::set_global_recorder(recorder).map_err(|_| ObservabilityError::Recorder)?;

    for def in all_metrics() {
        describe(def);
    }
    tracing::info!(host, port, "Exporting metrics to statsd");
    Ok(())
}

fn all_metrics() -> impl Iterator<Item = &'static MetricDef> {
    shared::metrics_defs::ALL_METRICS
        .iter()
        .chain(productpage::metrics_defs::ALL_METRICS)
        .chain(details::metrics_defs::ALL_METRICS)
        .chain(reviews::metrics_defs::ALL_METRICS)
        .chain(ratings::metrics_defs::ALL_METRICS)
}

fn describe(def: &MetricDef) {
    match def.metric_type {
        MetricType::Counter => metrics::describe_counter!(def.name, def.description),
        MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
        MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
    }
}
