use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber for the binaries.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
