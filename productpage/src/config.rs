use shared::endpoint::{EndpointError, ServiceEndpoint};
use std::time::Duration;

#[derive(clap::Args, Clone, Debug)]
pub struct Config {
    /// Port to listen on
    #[arg(env = "PORT", default_value_t = 9080)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Appended verbatim to every downstream hostname, e.g. `.default.svc.cluster.local`
    #[arg(long, env = "SERVICES_DOMAIN", default_value = "")]
    pub services_domain: String,

    #[arg(long, env = "DETAILS_HOSTNAME", default_value = "127.0.0.1")]
    pub details_hostname: String,

    #[arg(long, env = "DETAILS_PORT", default_value_t = 9081)]
    pub details_port: u16,

    #[arg(long, env = "REVIEWS_HOSTNAME", default_value = "127.0.0.1")]
    pub reviews_hostname: String,

    #[arg(long, env = "REVIEWS_PORT", default_value_t = 9082)]
    pub reviews_port: u16,

    #[arg(long, env = "RATINGS_HOSTNAME", default_value = "127.0.0.1")]
    pub ratings_hostname: String,

    #[arg(long, env = "RATINGS_PORT", default_value_t = 9083)]
    pub ratings_port: u16,

    /// Per-call timeout for every downstream request
    #[arg(long, env = "DOWNSTREAM_TIMEOUT_SECS", default_value_t = 3)]
    pub downstream_timeout_secs: u64,

    /// Extra reviews calls fired per product page render. 0 disables flooding.
    #[arg(long, env = "FLOOD_FACTOR", default_value_t = 0)]
    pub flood_factor: usize,

    /// Maximum number of flood calls in flight at once
    #[arg(long, env = "FLOOD_CONCURRENCY", default_value_t = 64)]
    pub flood_concurrency: usize,

    /// Retry the reviews call once after a transport failure
    #[arg(long, env = "REVIEWS_RETRY", default_value_t = true, action = clap::ArgAction::Set)]
    pub reviews_retry: bool,
}

/// The three downstream services, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub details: ServiceEndpoint,
    pub reviews: ServiceEndpoint,
    pub ratings: ServiceEndpoint,
}

impl Config {
    pub fn downstream_timeout(&self) -> Duration {
        Duration::from_secs(self.downstream_timeout_secs)
    }

    pub fn endpoints(&self) -> Result<Endpoints, EndpointError> {
        let endpoint = |name: &str, host: &str, port: u16| {
            ServiceEndpoint::new(
                name,
                host,
                &self.services_domain,
                port,
                name,
                self.downstream_timeout(),
            )
        };

        Ok(Endpoints {
            details: endpoint("details", &self.details_hostname, self.details_port)?,
            reviews: endpoint("reviews", &self.reviews_hostname, self.reviews_port)?,
            ratings: endpoint("ratings", &self.ratings_hostname, self.ratings_port)?,
        })
    }
}
