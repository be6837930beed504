//! Session-scoped recommendation cache.
//!
//! The cache is the single shared view of the user's recommendations. It is
//! only written by reloads from the remote store: mutations never patch it in
//! place, they invalidate it and wait for the reload. Each reload builds a
//! complete [`CacheSnapshot`] and swaps it in behind one pointer, so readers
//! see either the old set or the new one and never a half-built list.
//!
//! Invalidations coalesce. Every call bumps a requested epoch; a reload
//! records the epoch it started at, and any waiter whose request is already
//! covered by a finished reload returns without fetching again. At most one
//! fetch is in flight at a time.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};

use super::filter::{self, FilterSpec, VisibleRecommendations};
use super::ports::RecommendationStore;
use super::{Recommendation, RecommendationError, RecommendationId, Session};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Immutable view of the cache at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    records: Arc<[Recommendation]>,
    loaded_at: Option<DateTime<Utc>>,
    stale: bool,
}

impl CacheSnapshot {
    fn loaded(records: Vec<Recommendation>, loaded_at: DateTime<Utc>) -> Self {
        Self {
            records: records.into(),
            loaded_at: Some(loaded_at),
            stale: false,
        }
    }

    fn marked_stale(&self) -> Self {
        Self {
            stale: true,
            ..self.clone()
        }
    }

    /// Records ordered by date, newest first.
    pub fn records(&self) -> &[Recommendation] {
        &self.records
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up one record by id.
    pub fn get(&self, id: &RecommendationId) -> Option<&Recommendation> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// When the records were fetched; `None` before the first load.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Whether at least one load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Whether an invalidation happened after these records were fetched.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Filter the snapshot.
    pub fn visible(&self, spec: &FilterSpec) -> VisibleRecommendations<'_> {
        filter::visible(&self.records, spec)
    }

    /// Distinct categories in the snapshot.
    pub fn categories(&self) -> Vec<String> {
        filter::categories(&self.records)
    }

    /// Distinct friends in the snapshot, sorted.
    pub fn friends(&self) -> Vec<String> {
        filter::friends(&self.records)
    }

    /// Add-form category options for the snapshot.
    pub fn category_options(&self) -> Vec<String> {
        filter::category_options(&self.records)
    }
}

/// Change notifications published to cache observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A mutation marked the snapshot stale; a reload follows.
    Invalidated,
    /// A fresh snapshot was swapped in.
    Reloaded {
        /// Records in the new snapshot.
        count: usize,
    },
    /// A reload failed and the previous snapshot was kept.
    LoadFailed {
        /// Failure detail.
        message: String,
    },
    /// The session ended and the snapshot was emptied.
    Cleared,
}

/// Cache of one session's recommendations backed by a [`RecommendationStore`].
pub struct RecommendationCache<S> {
    store: Arc<S>,
    session: Session,
    clock: Arc<dyn Clock>,
    snapshot: RwLock<Arc<CacheSnapshot>>,
    reload_gate: Mutex<()>,
    requested_epoch: AtomicU64,
    served_epoch: AtomicU64,
    clear_generation: AtomicU64,
    events: broadcast::Sender<CacheEvent>,
}

impl<S> RecommendationCache<S> {
    /// Create an empty cache bound to `session`.
    ///
    /// Nothing is fetched until [`load`](Self::load) or [`read`](Self::read)
    /// is called.
    pub fn new(store: Arc<S>, session: Session, clock: Arc<dyn Clock>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            session,
            clock,
            snapshot: RwLock::new(Arc::new(CacheSnapshot::default())),
            reload_gate: Mutex::new(()),
            requested_epoch: AtomicU64::new(1),
            served_epoch: AtomicU64::new(0),
            clear_generation: AtomicU64::new(0),
            events,
        }
    }

    /// Session the cache is scoped to.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Most recently loaded snapshot; empty before the first load.
    ///
    /// Never waits for a reload.
    pub fn current_snapshot(&self) -> Arc<CacheSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Whether a reload is in progress.
    pub fn is_loading(&self) -> bool {
        self.reload_gate.try_lock().is_err()
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Drop every record, for sign-out.
    ///
    /// A reload that is in flight when this runs discards its result.
    pub fn clear(&self) {
        {
            let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            self.clear_generation.fetch_add(1, Ordering::SeqCst);
            self.requested_epoch.fetch_add(1, Ordering::SeqCst);
            *guard = Arc::new(CacheSnapshot::default());
        }
        info!(user_id = %self.session.user_id(), "recommendation cache cleared");
        self.publish(CacheEvent::Cleared);
    }

    /// Install `next` unless `clear` ran since `generation` was read.
    ///
    /// The generation is checked under the snapshot write lock, which `clear`
    /// also holds while bumping it.
    fn swap_unless_cleared(&self, next: CacheSnapshot, generation: u64) -> bool {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if self.clear_generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        *guard = Arc::new(next);
        true
    }

    fn needs_reload(&self) -> bool {
        self.served_epoch.load(Ordering::SeqCst) < self.requested_epoch.load(Ordering::SeqCst)
    }

    fn publish(&self, event: CacheEvent) {
        // Sending only fails when nobody is subscribed.
        let _ = self.events.send(event);
    }
}

impl<S> RecommendationCache<S>
where
    S: RecommendationStore,
{
    /// Fetch the full set for the session user and swap it in.
    ///
    /// On failure the previous snapshot is kept and the error is returned.
    pub async fn load(&self) -> Result<Arc<CacheSnapshot>, RecommendationError> {
        let _gate = self.reload_gate.lock().await;
        self.fetch_and_swap().await
    }

    /// Mark the snapshot stale and reload it.
    ///
    /// Concurrent invalidations share reloads: if a reload that started
    /// after this call has already finished, no new fetch is made.
    pub async fn invalidate(&self) -> Result<Arc<CacheSnapshot>, RecommendationError> {
        self.requested_epoch.fetch_add(1, Ordering::SeqCst);
        {
            let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            if guard.is_loaded() && !guard.is_stale() {
                let stale = guard.marked_stale();
                *guard = Arc::new(stale);
            }
        }
        self.publish(CacheEvent::Invalidated);
        self.refresh().await
    }

    /// Snapshot for reading, reloading first when stale or never loaded.
    pub async fn read(&self) -> Result<Arc<CacheSnapshot>, RecommendationError> {
        if self.needs_reload() {
            return self.refresh().await;
        }
        Ok(self.current_snapshot())
    }

    async fn refresh(&self) -> Result<Arc<CacheSnapshot>, RecommendationError> {
        let wanted = self.requested_epoch.load(Ordering::SeqCst);
        let _gate = self.reload_gate.lock().await;
        if self.served_epoch.load(Ordering::SeqCst) >= wanted {
            debug!(epoch = wanted, "reload already served by a concurrent refresh");
            return Ok(self.current_snapshot());
        }
        self.fetch_and_swap().await
    }

    /// Callers must hold `reload_gate`.
    async fn fetch_and_swap(&self) -> Result<Arc<CacheSnapshot>, RecommendationError> {
        let epoch = self.requested_epoch.load(Ordering::SeqCst);
        let generation = self.clear_generation.load(Ordering::SeqCst);
        let user_id = self.session.user_id();
        debug!(%user_id, epoch, "loading recommendations");

        let fetched = match self.store.list(user_id).await {
            Ok(records) => records,
            Err(error) => {
                warn!(
                    %user_id,
                    error_kind = error.kind(),
                    %error,
                    "recommendation load failed; keeping previous snapshot"
                );
                self.publish(CacheEvent::LoadFailed {
                    message: error.to_string(),
                });
                return Err(error.into());
            }
        };

        let records = self.normalise(fetched);
        let count = records.len();
        let next = CacheSnapshot::loaded(records, self.clock.utc());
        if !self.swap_unless_cleared(next, generation) {
            debug!(%user_id, "discarding reload that finished after the cache was cleared");
            return Ok(self.current_snapshot());
        }
        self.served_epoch.fetch_max(epoch, Ordering::SeqCst);
        info!(%user_id, count, "recommendations reloaded");
        self.publish(CacheEvent::Reloaded { count });
        Ok(self.current_snapshot())
    }

    /// Enforce the snapshot invariants on a fetched set: only the session
    /// user's rows, unique ids, newest first (stable for equal dates).
    fn normalise(&self, fetched: Vec<Recommendation>) -> Vec<Recommendation> {
        let user_id = self.session.user_id();
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(fetched.len());
        for record in fetched {
            if &record.user_id != user_id {
                warn!(
                    recommendation_id = %record.id,
                    owner = %record.user_id,
                    "dropping recommendation owned by another user"
                );
                continue;
            }
            if !seen.insert(record.id.clone()) {
                warn!(recommendation_id = %record.id, "dropping duplicate recommendation id");
                continue;
            }
            records.push(record);
        }
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
