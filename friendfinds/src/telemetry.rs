//! Tracing subscriber setup for hosts embedding the crate.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a JSON subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed; the
/// failure is logged through whichever subscriber is active.
pub fn init_tracing() -> bool {
    match fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "tracing init failed");
            false
        }
    }
}
