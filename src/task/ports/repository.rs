//! Repository port for owner-scoped task persistence.

use crate::task::domain::{OwnerId, Task, TaskId, TaskRevision};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces a stored task if its stored revision still equals
    /// `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::RevisionConflict`] when another writer
    /// updated it first.
    async fn update(&self, task: &Task, expected_revision: TaskRevision)
    -> TaskRepositoryResult<()>;

    /// Finds a task by identifier, restricted to tasks owned by `owner`.
    ///
    /// Returns `None` when the task does not exist or belongs to someone else.
    async fn find_by_id_for_owner(
        &self,
        id: TaskId,
        owner: &OwnerId,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Lists the tasks owned by `owner`, newest first.
    ///
    /// When `title_contains` is set, only tasks whose title contains it as a
    /// case-sensitive substring are returned.
    async fn list_for_owner(
        &self,
        owner: &OwnerId,
        title_contains: Option<&str>,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task changed since it was loaded.
    #[error("task {task_id} was modified concurrently (expected revision {expected})")]
    RevisionConflict {
        /// Task identifier.
        task_id: TaskId,
        /// Revision the writer loaded.
        expected: TaskRevision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
