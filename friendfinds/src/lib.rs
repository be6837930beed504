//! Friend-sourced recommendation tracking.
//!
//! The crate keeps a session-scoped cache of the signed-in user's
//! recommendations, filters it for display, and routes every write through a
//! mutation pipeline that reloads the cache before confirming success.
//!
//! Layout:
//! - `domain`: entities, cache, filter engine, mutation pipeline, ports.
//! - `outbound`: store and notification adapters.
//! - `config`: store connection settings.
//! - `telemetry`: tracing subscriber setup.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
