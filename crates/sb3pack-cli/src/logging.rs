//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "sb3pack_core=debug,sb3pack=debug"
    } else {
        "error"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
