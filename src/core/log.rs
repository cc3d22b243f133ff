use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. Logs go to stderr so tables printed on stdout stay clean.
///
/// `verbose` enables debug output for this crate and warnings from the storage
/// and HTTP layers; `RUST_LOG` overrides the defaults.
pub fn init_logging(verbose: bool) {
    let (app_level, dependency_level, env_default) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::WARN, "debug")
    } else {
        (LevelFilter::OFF, LevelFilter::OFF, "off")
    };
    let targets = Targets::new()
        .with_target("cnbrates", app_level)
        .with_target("fjall", dependency_level)
        .with_target("lsm_tree", dependency_level)
        .with_target("reqwest", dependency_level);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(targets)
        .with(env_filter)
        .init();
}
