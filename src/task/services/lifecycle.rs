//! Service layer for task creation, lookup, and status transitions.

use crate::task::{
    domain::{
        OwnerId, ParseTaskStatusError, ProblemDescriptionUpdate, Recommendation,
        RecommendationPrompt, Task, TaskDomainError, TaskId, TaskStatus, TaskTitle,
    },
    ports::{RecommendationProvider, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// Carries only the title: the owner always comes from the caller identity
/// passed alongside the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
}

impl CreateTaskRequest {
    /// Creates a request for a task with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Request payload for changing the status of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: TaskId,
    status: String,
    problem_description: ProblemDescriptionUpdate,
}

impl UpdateTaskStatusRequest {
    /// Creates a request that leaves the problem description untouched.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
            problem_description: ProblemDescriptionUpdate::Unchanged,
        }
    }

    /// Supplies a problem description. An empty or blank value clears the
    /// stored description.
    #[must_use]
    pub fn with_problem_description(mut self, problem_description: impl Into<String>) -> Self {
        self.problem_description = ProblemDescriptionUpdate::Replace(problem_description.into());
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The requested status is not a known task status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// No task with this identifier is visible to the caller.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every operation is scoped to the caller's [`OwnerId`]. A recommendation
/// provider is optional; without one, blocked tasks never carry advice.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    recommendations: Option<Arc<dyn RecommendationProvider>>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service without a recommendation provider.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            recommendations: None,
        }
    }

    /// Attaches a recommendation provider consulted for blocked tasks.
    #[must_use]
    pub fn with_recommendation_provider(
        mut self,
        provider: Arc<dyn RecommendationProvider>,
    ) -> Self {
        self.recommendations = Some(provider);
        self
    }

    /// Returns `true` when a recommendation provider is configured.
    #[must_use]
    pub const fn has_recommendation_provider(&self) -> bool {
        self.recommendations.is_some()
    }

    /// Lists the caller's tasks, newest first.
    ///
    /// An empty `search` is treated as no filter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(
        &self,
        owner: &OwnerId,
        search: Option<&str>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let title_contains = search.filter(|text| !text.is_empty());
        Ok(self
            .repository
            .list_for_owner(owner, title_contains)
            .await?)
    }

    /// Retrieves one of the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or belongs to another owner, and [`TaskLifecycleError::Repository`]
    /// when the lookup fails.
    pub async fn get_task(&self, owner: &OwnerId, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id_for_owner(task_id, owner)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Creates a task owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title is invalid and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        owner: &OwnerId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let task = Task::new(owner.clone(), title, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), owner = %owner, "created task");
        Ok(task)
    }

    /// Moves one of the caller's tasks to a new status.
    ///
    /// When the task ends up blocked with a problem description and a
    /// provider is configured, the provider is asked for a recommendation.
    /// Provider failures do not fail the transition; the task receives the
    /// [`Recommendation::unavailable`] placeholder instead. In every other
    /// case the recommendation is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidStatus`] for an unknown status,
    /// [`TaskLifecycleError::NotFound`] when the task is not visible to the
    /// caller, and [`TaskLifecycleError::Repository`] when persistence fails,
    /// including concurrent modification of the same task.
    pub async fn update_status(
        &self,
        owner: &OwnerId,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        let UpdateTaskStatusRequest {
            task_id,
            status,
            problem_description,
        } = request;
        let target_status = TaskStatus::try_from(status.as_str())?;

        let task = self.get_task(owner, task_id).await?;
        let transition = task.begin_transition(target_status, problem_description);
        let expected_revision = transition.expected_revision();

        let recommendation = match (&self.recommendations, transition.recommendation_prompt()) {
            (Some(provider), Some(prompt)) => {
                Some(request_recommendation(provider.as_ref(), &prompt).await)
            }
            _ => None,
        };

        let updated = transition.complete(recommendation, &*self.clock);
        self.repository.update(&updated, expected_revision).await?;
        tracing::info!(
            task_id = %updated.id(),
            status = %updated.status(),
            has_recommendation = updated.recommendation().is_some(),
            "updated task status"
        );
        Ok(updated)
    }
}

/// Asks the provider for advice, substituting the placeholder on failure.
async fn request_recommendation(
    provider: &dyn RecommendationProvider,
    prompt: &RecommendationPrompt,
) -> Recommendation {
    match provider.recommend(prompt).await {
        Ok(text) => Recommendation::new(text).unwrap_or_else(|| {
            tracing::warn!("recommendation provider returned blank advice");
            Recommendation::unavailable()
        }),
        Err(error) => {
            tracing::warn!(%error, "recommendation provider failed");
            Recommendation::unavailable()
        }
    }
}
