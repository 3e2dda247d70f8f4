//! Wiring of configured adapters into a ready-to-use lifecycle service.

use crate::config::TaskTrackerConfig;
use crate::task::{
    adapters::{
        memory::InMemoryTaskRepository,
        openai::OpenAiRecommendationProvider,
        postgres::{PostgresTaskRepository, TaskPgPool},
    },
    ports::{RecommendationProvider, RecommendationProviderError},
    services::TaskLifecycleService,
};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle service backed by `PostgreSQL`.
pub type PostgresTaskService = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;

/// Lifecycle service backed by process memory.
pub type InMemoryTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Errors raised while assembling the service.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A database-backed service was requested without database settings.
    #[error("no database configured, set DATABASE_URL")]
    MissingDatabase,
    /// The connection pool could not be created.
    #[error("failed to create database pool: {0}")]
    Pool(#[from] PoolError),
    /// The recommendation provider could not be created.
    #[error(transparent)]
    Recommendation(#[from] RecommendationProviderError),
}

/// Builds the configured recommendation provider, if any.
///
/// # Errors
///
/// Returns [`BootstrapError::Recommendation`] when the HTTP client cannot be
/// created.
pub fn recommendation_provider(
    config: &TaskTrackerConfig,
) -> Result<Option<Arc<dyn RecommendationProvider>>, BootstrapError> {
    let Some(settings) = config.recommendations() else {
        tracing::info!("no recommendation provider configured");
        return Ok(None);
    };

    let provider = OpenAiRecommendationProvider::new(settings.clone())?;
    tracing::info!(
        base_url = %settings.base_url(),
        model = %settings.model(),
        "recommendation provider configured"
    );
    Ok(Some(Arc::new(provider)))
}

/// Builds a `PostgreSQL`-backed service from configuration.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingDatabase`] without database settings,
/// [`BootstrapError::Pool`] when connections cannot be established, and
/// [`BootstrapError::Recommendation`] when the provider cannot be created.
pub fn build_postgres_service(
    config: &TaskTrackerConfig,
) -> Result<PostgresTaskService, BootstrapError> {
    let database = config.database().ok_or(BootstrapError::MissingDatabase)?;
    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool: TaskPgPool = Pool::builder()
        .max_size(database.pool_size())
        .build(manager)?;

    let service = TaskLifecycleService::new(
        Arc::new(PostgresTaskRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    Ok(attach_provider(service, recommendation_provider(config)?))
}

/// Builds an in-memory service from configuration.
///
/// # Errors
///
/// Returns [`BootstrapError::Recommendation`] when the provider cannot be
/// created.
pub fn build_in_memory_service(
    config: &TaskTrackerConfig,
) -> Result<InMemoryTaskService, BootstrapError> {
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
    );
    Ok(attach_provider(service, recommendation_provider(config)?))
}

fn attach_provider<R>(
    service: TaskLifecycleService<R, DefaultClock>,
    provider: Option<Arc<dyn RecommendationProvider>>,
) -> TaskLifecycleService<R, DefaultClock>
where
    R: crate::task::ports::TaskRepository,
{
    match provider {
        Some(recommendations) => service.with_recommendation_provider(recommendations),
        None => service,
    }
}
