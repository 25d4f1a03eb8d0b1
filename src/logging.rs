use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise library and runner events are shown at
/// info level, or debug when `verbose` is on.
pub fn setup(verbose: bool) {
    let default = if verbose {
        "warn,auto_2048=debug,autoplay=debug"
    } else {
        "warn,auto_2048=info,autoplay=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
