//! PostgREST outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `RecommendationStore` port for hosted row APIs.

mod dto;
mod http_store;

pub use http_store::{PostgrestRecommendationStore, StoreSetupError};
