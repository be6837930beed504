//! In-memory recommendation store.
//!
//! Behaves like the hosted table for one process: ids are minted on insert,
//! rows are scoped by owner, and listing returns newest first. Used by
//! tests and by hosts that run without a remote backend.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{RecommendationPatch, RecommendationStore, RecommendationStoreError};
use crate::domain::{NewRecommendation, Recommendation, RecommendationId, UserId};

/// Process-local [`RecommendationStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecommendationStore {
    rows: RwLock<Vec<Recommendation>>,
}

impl InMemoryRecommendationStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`, kept as given.
    ///
    /// # Examples
    /// ```
    /// use friendfinds::outbound::memory::InMemoryRecommendationStore;
    ///
    /// let store = InMemoryRecommendationStore::with_rows(Vec::new());
    /// assert!(store.rows().is_empty());
    /// ```
    pub fn with_rows(rows: Vec<Recommendation>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Copy of every stored row, across all users.
    pub fn rows(&self) -> Vec<Recommendation> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecommendationStore for InMemoryRecommendationStore {
    async fn list(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Recommendation>, RecommendationStoreError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut owned: Vec<_> = rows
            .iter()
            .filter(|row| &row.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(owned)
    }

    async fn insert(
        &self,
        record: &NewRecommendation,
    ) -> Result<Recommendation, RecommendationStoreError> {
        if !record.has_required_fields() {
            return Err(RecommendationStoreError::validation(
                "title, category, and friend_name are required",
            ));
        }
        let stored = Recommendation::from_new(RecommendationId::random(), record.clone());
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: &RecommendationId,
        patch: &RecommendationPatch,
    ) -> Result<(), RecommendationStoreError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let row = rows
            .iter_mut()
            .find(|row| &row.id == id)
            .ok_or_else(|| RecommendationStoreError::not_found(id.as_str()))?;
        if let Some(used) = patch.used {
            row.used = used;
        }
        Ok(())
    }

    async fn delete(&self, id: &RecommendationId) -> Result<(), RecommendationStoreError> {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|row| &row.id != id);
        Ok(())
    }
}
