use shared::endpoint::{EndpointError, ServiceEndpoint};
use std::time::Duration;

const DEFAULT_STAR_COLOR: &str = "black";

#[derive(clap::Args, Clone, Debug)]
pub struct Config {
    /// Port to listen on
    #[arg(env = "PORT", default_value_t = 9082)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Attach star ratings fetched from the ratings service
    #[arg(long, env = "ENABLE_RATINGS", default_value_t = false, action = clap::ArgAction::Set)]
    pub enable_ratings: bool,

    #[arg(long, env = "STAR_COLOR", default_value = DEFAULT_STAR_COLOR)]
    pub star_color: String,

    /// DNS suffix of the ratings host, joined with a dot
    #[arg(long, env = "SERVICES_DOMAIN", default_value = "")]
    pub services_domain: String,

    #[arg(long, env = "RATINGS_HOSTNAME", default_value = "127.0.0.1")]
    pub ratings_hostname: String,

    #[arg(long, env = "RATINGS_PORT", default_value_t = 9083)]
    pub ratings_port: u16,

    /// Reported as `podname` in every response
    #[arg(long = "pod-name", env = "HOSTNAME", default_value = "")]
    pub pod_name: String,

    /// Reported as `clustername` in every response
    #[arg(long, env = "CLUSTER_NAME", default_value = "")]
    pub cluster_name: String,
}

impl Config {
    /// Black stars get a generous budget, any other colour a tight one.
    pub fn ratings_timeout(&self) -> Duration {
        if self.star_color == DEFAULT_STAR_COLOR {
            Duration::from_secs(10)
        } else {
            Duration::from_millis(2500)
        }
    }

    pub fn ratings_endpoint(&self) -> Result<ServiceEndpoint, EndpointError> {
        let domain = match self.services_domain.as_str() {
            "" => String::new(),
            d => format!(".{d}"),
        };
        ServiceEndpoint::new(
            "ratings",
            &self.ratings_hostname,
            &domain,
            self.ratings_port,
            "ratings",
            self.ratings_timeout(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["reviews"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().config
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.port, 9082);
        assert!(!config.enable_ratings);
        assert_eq!(config.star_color, "black");
        assert_eq!(config.ratings_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.ratings_endpoint().unwrap().url_for("0").unwrap().as_str(),
            "http://127.0.0.1:9083/ratings/0"
        );
    }

    #[test]
    fn test_colored_stars_have_short_timeout() {
        let config = parse(&[
            "--enable-ratings",
            "true",
            "--star-color",
            "red",
            "--ratings-hostname",
            "ratings",
            "--services-domain",
            "bookinfo.svc",
        ]);
        assert!(config.enable_ratings);
        assert_eq!(config.ratings_timeout(), Duration::from_millis(2500));

        let endpoint = config.ratings_endpoint().unwrap();
        assert_eq!(endpoint.base_url().host_str(), Some("ratings.bookinfo.svc"));
    }
}
