//! Mutation pipeline: remote write, cache reconciliation, user feedback.
//!
//! Every mutation follows the same shape. The remote write happens first; on
//! success the cache is invalidated and reloaded, and only then is the user
//! told it worked. On failure the cache is left alone and an error notice is
//! raised. The pipeline never patches the cache itself and never validates
//! input: forms uphold required fields (see
//! [`RecommendationDraft`](super::RecommendationDraft)) and the store may
//! reject what slips through.
//!
//! Mutations on the same id run one at a time; different ids do not wait on
//! each other.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::keyed_lock::KeyedLocks;
use super::ports::{
    NotificationSink, RecommendationPatch, RecommendationStore, RecommendationStoreError,
};
use super::{
    MutationKind, NewRecommendation, Notice, Recommendation, RecommendationCache,
    RecommendationError, RecommendationId,
};

/// Add, delete, and toggle-used operations over a shared cache.
pub struct MutationPipeline<S, N> {
    cache: Arc<RecommendationCache<S>>,
    notifier: Arc<N>,
    locks: KeyedLocks<RecommendationId>,
}

impl<S, N> MutationPipeline<S, N> {
    /// Create a pipeline writing through `cache`'s store and reporting to
    /// `notifier`.
    pub fn new(cache: Arc<RecommendationCache<S>>, notifier: Arc<N>) -> Self {
        Self {
            cache,
            notifier,
            locks: KeyedLocks::default(),
        }
    }

    /// Cache reconciled after each mutation.
    pub fn cache(&self) -> &Arc<RecommendationCache<S>> {
        &self.cache
    }
}

impl<S, N> MutationPipeline<S, N>
where
    S: RecommendationStore,
    N: NotificationSink,
{
    /// Create a recommendation.
    ///
    /// Returns the stored row once the cache has reloaded. A store rejection
    /// leaves the cache untouched and is not retried.
    pub async fn add(
        &self,
        record: &NewRecommendation,
    ) -> Result<Recommendation, RecommendationError> {
        let kind = MutationKind::Add;
        let created = match self.cache.store().insert(record).await {
            Ok(created) => created,
            Err(error) => return Err(self.reject(kind, None, error)),
        };
        info!(
            recommendation_id = %created.id,
            category = %created.category,
            "recommendation added"
        );
        self.reconcile(kind).await?;
        Ok(created)
    }

    /// Remove a recommendation.
    ///
    /// A missing row counts as already deleted: the cache is still reloaded
    /// and the user still sees a confirmation.
    pub async fn delete(&self, id: &RecommendationId) -> Result<(), RecommendationError> {
        let kind = MutationKind::Delete;
        let _guard = self.locks.acquire(id).await;
        match self.cache.store().delete(id).await {
            Ok(()) => info!(recommendation_id = %id, "recommendation deleted"),
            Err(RecommendationStoreError::NotFound { .. }) => {
                debug!(recommendation_id = %id, "recommendation already absent");
            }
            Err(error) => return Err(self.reject(kind, Some(id), error)),
        }
        self.reconcile(kind).await
    }

    /// Set the `used` flag of `id` to `target`.
    ///
    /// Callers pass the value they want, normally the negation of what the
    /// snapshot shows. On failure the cache keeps the old value, so any
    /// indicator bound to the snapshot reverts.
    pub async fn toggle_used(
        &self,
        id: &RecommendationId,
        target: bool,
    ) -> Result<(), RecommendationError> {
        let kind = MutationKind::ToggleUsed;
        let _guard = self.locks.acquire(id).await;
        if let Err(error) = self
            .cache
            .store()
            .update(id, &RecommendationPatch::used(target))
            .await
        {
            return Err(self.reject(kind, Some(id), error));
        }
        info!(recommendation_id = %id, used = target, "recommendation used flag updated");
        self.reconcile(kind).await
    }

    /// Reload after a successful write and confirm to the user.
    async fn reconcile(&self, kind: MutationKind) -> Result<(), RecommendationError> {
        match self.cache.invalidate().await {
            Ok(snapshot) => {
                debug!(mutation = kind.as_str(), count = snapshot.len(), "cache reconciled");
                if let Some(notice) = Notice::success(kind) {
                    self.notifier.notify(&notice);
                }
                Ok(())
            }
            Err(error) => {
                warn!(
                    mutation = kind.as_str(),
                    %error,
                    "write succeeded but the cache could not be reloaded"
                );
                self.notifier.notify(&Notice::from_error(&error));
                Err(error)
            }
        }
    }

    fn reject(
        &self,
        kind: MutationKind,
        id: Option<&RecommendationId>,
        error: RecommendationStoreError,
    ) -> RecommendationError {
        warn!(
            mutation = kind.as_str(),
            error_kind = error.kind(),
            recommendation_id = id.map(tracing::field::display),
            %error,
            "recommendation mutation failed"
        );
        self.notifier.notify(&Notice::failure(kind));
        RecommendationError::from(error)
    }
}

#[cfg(test)]
#[path = "mutation_service_tests.rs"]
mod tests;
