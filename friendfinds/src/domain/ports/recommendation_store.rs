//! Port for the hosted recommendation table.
//!
//! The [`RecommendationStore`] trait is the only way the core reaches the
//! remote store. Durability and row-level authorisation live behind it; the
//! core relies on the adapter to scope every call to the signed-in user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{NewRecommendation, Recommendation, RecommendationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recommendation store adapters.
    pub enum RecommendationStoreError {
        /// Listing failed because of transport or auth problems.
        Fetch { message: String } =>
            "recommendation fetch failed: {message}",
        /// The store rejected a malformed record.
        Validation { message: String } =>
            "recommendation rejected by store: {message}",
        /// The targeted row does not exist.
        NotFound { id: String } =>
            "recommendation {id} not found",
        /// Generic failure while inserting, updating, or deleting.
        Write { message: String } =>
            "recommendation write failed: {message}",
    }
}

/// Field changes accepted by [`RecommendationStore::update`].
///
/// Only the `used` flag is mutable after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPatch {
    /// New value for the `used` flag, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
}

impl RecommendationPatch {
    /// Patch that sets `used` to `target`.
    pub fn used(target: bool) -> Self {
        Self { used: Some(target) }
    }
}

/// Row-oriented CRUD capability over the user's recommendations.
///
/// # Contract
///
/// - `list` returns the user's full set ordered by `date`, newest first.
/// - `insert` assigns the id and stores `used = false`.
/// - `update` fails with [`RecommendationStoreError::NotFound`] when the id
///   is unknown.
/// - `delete` is idempotent: deleting a missing id succeeds. Adapters that
///   cannot tell may still report `NotFound`; callers treat it as done.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Fetch every recommendation owned by `user_id`.
    async fn list(&self, user_id: &UserId)
    -> Result<Vec<Recommendation>, RecommendationStoreError>;

    /// Persist a new recommendation and return the stored row.
    async fn insert(
        &self,
        record: &NewRecommendation,
    ) -> Result<Recommendation, RecommendationStoreError>;

    /// Apply `patch` to the row identified by `id`.
    async fn update(
        &self,
        id: &RecommendationId,
        patch: &RecommendationPatch,
    ) -> Result<(), RecommendationStoreError>;

    /// Remove the row identified by `id`.
    async fn delete(&self, id: &RecommendationId) -> Result<(), RecommendationStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_error_names_the_id() {
        let error = RecommendationStoreError::not_found("abc");
        assert_eq!(error.to_string(), "recommendation abc not found");
    }

    #[rstest]
    fn used_patch_serialises_only_the_flag() {
        let json = serde_json::to_value(RecommendationPatch::used(true)).expect("serialise patch");
        assert_eq!(json, serde_json::json!({ "used": true }));

        let empty = serde_json::to_value(RecommendationPatch::default()).expect("serialise patch");
        assert_eq!(empty, serde_json::json!({}));
    }
}
