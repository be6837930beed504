//! Shared helpers for friendfinds integration tests.
//!
//! Integration tests compile as separate crates, so the store and notifier
//! doubles live here rather than in `src/`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use friendfinds::domain::ports::{
    NotificationSink, RecommendationPatch, RecommendationStore, RecommendationStoreError,
};
use friendfinds::domain::{
    AccessToken, MutationPipeline, NewRecommendation, Notice, Recommendation,
    RecommendationCache, RecommendationId, Session, UserId,
};
use friendfinds::outbound::memory::InMemoryRecommendationStore;
use friendfinds::test_support::{FixtureClock, fixture_user};

/// Which store call a scripted failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    List,
    Insert,
    Update,
    Delete,
}

/// In-memory store that counts calls and can fail on demand.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryRecommendationStore,
    failures: Mutex<VecDeque<(Call, RecommendationStoreError)>>,
    lists: AtomicUsize,
    updates: AtomicUsize,
}

impl RecordingStore {
    pub fn with_rows(rows: Vec<Recommendation>) -> Self {
        Self {
            inner: InMemoryRecommendationStore::with_rows(rows),
            ..Self::default()
        }
    }

    /// Fail the next `call` with `error` instead of touching the rows.
    pub fn fail_next(&self, call: Call, error: RecommendationStoreError) {
        self.failures
            .lock()
            .expect("failures lock")
            .push_back((call, error));
    }

    pub fn rows(&self) -> Vec<Recommendation> {
        self.inner.rows()
    }

    pub fn list_calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn scripted(&self, call: Call) -> Result<(), RecommendationStoreError> {
        let mut failures = self.failures.lock().expect("failures lock");
        match failures.iter().position(|(scripted, _)| *scripted == call) {
            Some(index) => Err(failures.remove(index).expect("indexed failure").1),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecommendationStore for RecordingStore {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Recommendation>, RecommendationStoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.scripted(Call::List)?;
        self.inner.list(user_id).await
    }

    async fn insert(
        &self,
        record: &NewRecommendation,
    ) -> Result<Recommendation, RecommendationStoreError> {
        self.scripted(Call::Insert)?;
        self.inner.insert(record).await
    }

    async fn update(
        &self,
        id: &RecommendationId,
        patch: &RecommendationPatch,
    ) -> Result<(), RecommendationStoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.scripted(Call::Update)?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &RecommendationId) -> Result<(), RecommendationStoreError> {
        self.scripted(Call::Delete)?;
        self.inner.delete(id).await
    }
}

/// Notifier that keeps every notice it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notices lock").clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().expect("notices lock").push(notice.clone());
    }
}

/// Cache and pipeline wired to shared doubles.
pub struct Harness {
    pub store: Arc<RecordingStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub cache: Arc<RecommendationCache<RecordingStore>>,
    pub pipeline: MutationPipeline<RecordingStore, RecordingNotifier>,
}

impl Harness {
    pub fn new(rows: Vec<Recommendation>) -> Self {
        let store = Arc::new(RecordingStore::with_rows(rows));
        let notifier = Arc::new(RecordingNotifier::default());
        let session = Session::new(
            fixture_user(),
            AccessToken::new("integration-token").expect("valid token"),
        );
        let cache = Arc::new(RecommendationCache::new(
            Arc::clone(&store),
            session,
            FixtureClock::on("2024-01-10"),
        ));
        let pipeline = MutationPipeline::new(Arc::clone(&cache), Arc::clone(&notifier));
        Self {
            store,
            notifier,
            cache,
            pipeline,
        }
    }

    /// The remote rows owned by the fixture user, newest first.
    pub fn remote_rows(&self) -> Vec<Recommendation> {
        let mut rows: Vec<_> = self
            .store
            .rows()
            .into_iter()
            .filter(|row| row.user_id == fixture_user())
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }
}

pub fn id(raw: &str) -> RecommendationId {
    RecommendationId::new(raw).expect("valid id")
}
