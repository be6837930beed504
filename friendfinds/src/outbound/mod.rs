//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local recommendation store
//! - **postgrest**: hosted row API over HTTP (reqwest)
//! - **notify**: notice sinks for hosts without a UI
//!
//! Adapters translate between domain types and transport representations.
//! They contain no business logic.

pub mod memory;
pub mod notify;
pub mod postgrest;
