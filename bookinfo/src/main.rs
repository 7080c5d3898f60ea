mod observability;

use clap::{Parser, Subcommand};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "bookinfo", version, about = "Bookinfo demo services")]
struct Cli {
    /// Log filter directives, e.g. `info,productpage=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    log_filter: String,

    /// Report errors to this Sentry DSN
    #[arg(long, env = "SENTRY_DSN", global = true)]
    sentry_dsn: Option<String>,

    /// Export metrics to this StatsD host
    #[arg(long, env = "STATSD_HOST", global = true)]
    statsd_host: Option<String>,

    #[arg(long, env = "STATSD_PORT", default_value_t = 8125, global = true)]
    statsd_port: u16,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Composite product view and product API
    Productpage(productpage::config::Config),
    /// Book details
    Details(details::config::Config),
    /// Book reviews, optionally with star ratings
    Reviews(reviews::config::Config),
    /// Reviewer ratings with simulated outages
    Ratings(ratings::config::Config),
}

#[derive(thiserror::Error, Debug)]
enum BookinfoError {
    #[error(transparent)]
    Observability(#[from] observability::ObservabilityError),
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
    #[error("productpage: {0}")]
    ProductPage(#[from] productpage::ProductPageError),
    #[error("details: {0}")]
    Details(#[from] details::DetailsError),
    #[error("reviews: {0}")]
    Reviews(#[from] reviews::ReviewsError),
    #[error("ratings: {0}")]
    Ratings(#[from] ratings::RatingsError),
}

fn main() {
    let cli = Cli::parse();

    // Sentry is set up before the runtime starts any threads
    let sentry = observability::init_sentry(cli.sentry_dsn.as_deref());

    if let Err(e) = run(cli, sentry.is_some()) {
        if tracing::enabled!(tracing::Level::ERROR) {
            tracing::error!(error = %e, "Service terminated with error");
        } else {
            eprintln!("Error: {e}");
        }
        // exit skips destructors, flush Sentry first
        drop(sentry);
        process::exit(1);
    }
}

fn run(cli: Cli, sentry_enabled: bool) -> Result<(), BookinfoError> {
    observability::init_tracing(&cli.log_filter, sentry_enabled)?;
    if let Some(host) = &cli.statsd_host {
        observability::init_metrics(host, cli.statsd_port)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(BookinfoError::Runtime)?;

    runtime.block_on(async move {
        match cli.command {
            CliCommand::Productpage(config) => productpage::run(config).await?,
            CliCommand::Details(config) => details::run(config).await?,
            CliCommand::Reviews(config) => reviews::run(config).await?,
            CliCommand::Ratings(config) => ratings::run(config).await?,
        }
        Ok::<_, BookinfoError>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_service_commands() {
        let cli = Cli::try_parse_from([
            "bookinfo",
            "ratings",
            "9090",
            "--service-version",
            "v-faulty",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_filter, "debug");
        let CliCommand::Ratings(config) = cli.command else {
            panic!("expected ratings");
        };
        assert_eq!(config.port, 9090);

        let cli = Cli::try_parse_from(["bookinfo", "productpage", "--flood-factor", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            CliCommand::Productpage(config) if config.flood_factor == 3
        ));

        assert!(Cli::try_parse_from(["bookinfo", "details", "not-a-port"]).is_err());
        assert!(Cli::try_parse_from(["bookinfo"]).is_err());
    }
}
