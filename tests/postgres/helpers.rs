//! Shared fixtures for `PostgreSQL` integration tests.

use super::cluster::shared_database;
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use tasktracker::{
    bootstrap::{PostgresTaskService, build_postgres_service},
    config::{DatabaseConfig, TaskTrackerConfig},
    task::{
        adapters::postgres::PostgresTaskRepository,
        domain::{OwnerId, RecommendationPrompt, Task, TaskTitle},
        ports::{RecommendationProvider, RecommendationProviderResult},
    },
};
use tokio::sync::Barrier;
use uuid::Uuid;

/// Provides a repository over the shared test database.
///
/// Fails when no database can be reached, so a missing server never passes
/// silently.
#[fixture]
pub fn repository() -> eyre::Result<PostgresTaskRepository> {
    let database = shared_database().map_err(|err| eyre::eyre!(err))?;
    let pool = diesel::r2d2::Pool::builder()
        .max_size(4)
        .build(diesel::r2d2::ConnectionManager::<diesel::pg::PgConnection>::new(database.url()))?;
    Ok(PostgresTaskRepository::new(pool))
}

/// Builds a service over the shared test database through `bootstrap`.
pub fn service() -> eyre::Result<PostgresTaskService> {
    let database = shared_database().map_err(|err| eyre::eyre!(err))?;
    let config = TaskTrackerConfig::new().with_database(DatabaseConfig::new(database.url()));
    Ok(build_postgres_service(&config)?)
}

/// Returns an owner no other test uses.
pub fn unique_owner() -> OwnerId {
    OwnerId::new(format!("owner-{}", Uuid::new_v4())).expect("valid owner")
}

/// Builds a fresh task for `owner`.
pub fn new_task(owner: &OwnerId, title: &str) -> Task {
    Task::new(
        owner.clone(),
        TaskTitle::new(title).expect("valid title"),
        &DefaultClock,
    )
}

/// Provider that holds every caller until `parties` callers are waiting.
///
/// Each caller has loaded its task before asking for advice, so concurrent
/// transitions all work from the same revision.
pub struct RendezvousProvider {
    barrier: Barrier,
}

impl RendezvousProvider {
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
