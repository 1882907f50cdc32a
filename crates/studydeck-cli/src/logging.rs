//! Tracing setup
//!
//! Logs go to stderr so they never mix with command output on stdout.
//! `RUST_LOG` overrides the level chosen here.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// The server logs requests at info; one-shot commands only report
/// warnings unless `--verbose` is given.
pub fn init(serving: bool, verbose: bool) {
    let level = match (verbose, serving) {
        (true, _) => "debug",
        (false, true) => "info",
        (false, false) => "warn",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "studydeck_core={level},studydeck_cli={level},tower_http={level}"
        ))
    });

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
