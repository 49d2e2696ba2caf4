//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "bumpr=debug"
    } else if quiet {
        "bumpr=warn"
    } else {
        "bumpr=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .init();
}
