use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when RUST_LOG is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "sitekeeper=debug,sitekeeper_core=debug,sitekeeper_scanner=debug,warn"
    } else {
        "warn"
    }
}

/// Install the stderr logger; stdout stays reserved for reports
pub fn init_cli_logger(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
