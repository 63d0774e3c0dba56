use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Everything goes to stderr: stdout is reserved for machine-readable output
/// such as the detector runner's JSON. `RUST_LOG` takes precedence over the
/// `verbose` flag.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding applications).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
