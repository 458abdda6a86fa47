//! Tracing initialization for the binary.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at `info` (or `debug`
/// with `verbose`) and everything else at `warn`.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "warn,youtube_fetch=debug,tower_http=debug"
    } else {
        "warn,youtube_fetch=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
