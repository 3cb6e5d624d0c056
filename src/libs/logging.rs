//! Diagnostic logging setup.
//!
//! Console output for the operator goes through the message macros; this
//! subscriber only carries `tracing` events. It writes to stderr so it never
//! interleaves with prompts on stdout.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the default `warn`
/// level. Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
