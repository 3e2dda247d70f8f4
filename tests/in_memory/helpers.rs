//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;
use tasktracker::task::{
    adapters::memory::{InMemoryTaskRepository, ScriptedRecommendationProvider},
    domain::{
        OwnerId, PersistedTaskData, RecommendationPrompt, Task, TaskId, TaskRevision, TaskStatus,
        TaskTitle,
    },
    ports::{RecommendationProvider, RecommendationProviderResult},
    services::TaskLifecycleService,
};
use tokio::sync::Barrier;

/// Service type wired to in-memory adapters.
pub type TestService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

/// Provides the primary caller identity.
#[fixture]
pub fn alice() -> OwnerId {
    OwnerId::new("alice").expect("valid owner")
}

/// Provides a second caller identity.
#[fixture]
pub fn bob() -> OwnerId {
    OwnerId::new("bob").expect("valid owner")
}

/// Builds a service over `repo` that answers every prompt with `reply`.
#[must_use]
pub fn service_with_reply(repo: &InMemoryTaskRepository, reply: &str) -> TestService {
    TaskLifecycleService::new(Arc::new(repo.clone()), Arc::new(DefaultClock))
        .with_recommendation_provider(Arc::new(ScriptedRecommendationProvider::replying(reply)))
}

/// Returns a fixed UTC timestamp offset by `minutes`.
#[must_use]
pub fn at_minute(minutes: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 8, minutes, 0)
        .single()
        .expect("valid timestamp")
}

/// Reconstructs a created task with explicit identity and timestamp.
#[must_use]
pub fn task_at(owner: &OwnerId, title: &str, id: TaskId, created_at: DateTime<Utc>) -> Task {
    Task::from_persisted(PersistedTaskData {
        id,
        owner: owner.clone(),
        title: TaskTitle::new(title).expect("valid title"),
        status: TaskStatus::Created,
        problem_description: None,
        recommendation: None,
        revision: TaskRevision::initial(),
        created_at,
        updated_at: created_at,
    })
    .expect("consistent task")
}

/// Provider that holds every caller until `parties` callers are waiting.
///
/// Callers load their task before asking for advice, so concurrent
/// transitions released together all start from the same revision.
pub struct RendezvousProvider {
    barrier: Barrier,
}

impl RendezvousProvider {
    #[must_use]
    pub fn new(parties: usize) -> Arc<Self> {
        Arc::new(Self {
            barrier: Barrier::new(parties),
        })
    }
}

#[async_trait]
impl RecommendationProvider for RendezvousProvider {
    async fn recommend(
        &self,
        prompt: &RecommendationPrompt,
    ) -> RecommendationProviderResult<String> {
        self.barrier.wait().await;
        Ok(format!("look into {}", prompt.problem().as_str()))
    }
}
