//! Task aggregate root and status transition types.

use super::{
    OwnerId, ParseTaskStatusError, ProblemDescription, ProblemDescriptionUpdate, Recommendation,
    RecommendationPrompt, TaskDomainError, TaskId, TaskRevision, TaskTitle,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Task status as seen by callers and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Created,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Done,
    /// Task cannot progress until a problem is resolved.
    Blocked,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Blocked => "blocked",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a task.
///
/// Only the blocked state can carry a recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    /// Task has been created but work has not started.
    Created,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Done,
    /// Task is blocked.
    Blocked {
        /// Advice attached when the task entered this state.
        recommendation: Option<Recommendation>,
    },
}

impl TaskState {
    /// Returns the status tag of this state.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        match self {
            Self::Created => TaskStatus::Created,
            Self::InProgress => TaskStatus::InProgress,
            Self::Done => TaskStatus::Done,
            Self::Blocked { .. } => TaskStatus::Blocked,
        }
    }

    /// Returns the recommendation carried by a blocked state.
    #[must_use]
    pub const fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Blocked { recommendation } => recommendation.as_ref(),
            Self::Created | Self::InProgress | Self::Done => None,
        }
    }

    fn with_recommendation(status: TaskStatus, recommendation: Option<Recommendation>) -> Self {
        match status {
            TaskStatus::Created => Self::Created,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Done => Self::Done,
            TaskStatus::Blocked => Self::Blocked { recommendation },
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    title: TaskTitle,
    state: TaskState,
    problem_description: Option<ProblemDescription>,
    revision: TaskRevision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identity.
    pub owner: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted problem description, if any.
    pub problem_description: Option<ProblemDescription>,
    /// Persisted recommendation, if any.
    pub recommendation: Option<Recommendation>,
    /// Persisted concurrency revision.
    pub revision: TaskRevision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task owned by `owner`.
    #[must_use]
    pub fn new(owner: OwnerId, title: TaskTitle, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner,
            title,
            state: TaskState::Created,
            problem_description: None,
            revision: TaskRevision::initial(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InconsistentRecommendation`] when the record
    /// carries a recommendation without being blocked with a problem
    /// description.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let recommendation_allowed =
            data.status == TaskStatus::Blocked && data.problem_description.is_some();
        if data.recommendation.is_some() && !recommendation_allowed {
            return Err(TaskDomainError::InconsistentRecommendation(data.id));
        }

        Ok(Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            state: TaskState::with_recommendation(data.status, data.recommendation),
            problem_description: data.problem_description,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning caller identity.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns `true` when the task belongs to `owner`.
    #[must_use]
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        self.owner == *owner
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &TaskState {
        &self.state
    }

    /// Returns the status tag.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.state.status()
    }

    /// Returns the problem description, if any.
    #[must_use]
    pub const fn problem_description(&self) -> Option<&ProblemDescription> {
        self.problem_description.as_ref()
    }

    /// Returns the recommendation, if any.
    #[must_use]
    pub const fn recommendation(&self) -> Option<&Recommendation> {
        self.state.recommendation()
    }

    /// Returns the concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> TaskRevision {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Starts a status transition.
    ///
    /// The new status and problem description are fixed here; the returned
    /// [`StatusTransition`] reports whether a recommendation should be
    /// requested and finishes the mutation.
    pub fn begin_transition(
        self,
        status: TaskStatus,
        problem_update: ProblemDescriptionUpdate,
    ) -> StatusTransition {
        let problem_description = problem_update.resolve(self.problem_description.clone());
        StatusTransition {
            task: self,
            status,
            problem_description,
        }
    }
}

impl Serialize for Task {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Task", 7)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("problem_description", &self.problem_description)?;
        state.serialize_field("recommendation", &self.recommendation())?;
        state.serialize_field("created_at", &self.created_at)?;
        state.serialize_field("updated_at", &self.updated_at)?;
        state.end()
    }
}

/// In-flight status change of a single task.
///
/// This is the only path that mutates a task after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct StatusTransition {
    task: Task,
    status: TaskStatus,
    problem_description: Option<ProblemDescription>,
}

impl StatusTransition {
    /// Returns the identifier of the task being transitioned.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task.id
    }

    /// Returns the target status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the problem description the task will carry.
    #[must_use]
    pub const fn problem_description(&self) -> Option<&ProblemDescription> {
        self.problem_description.as_ref()
    }

    /// Returns the revision the task had when it was loaded.
    #[must_use]
    pub const fn expected_revision(&self) -> TaskRevision {
        self.task.revision
    }

    /// Returns the provider input when the task is entering the blocked
    /// state with a problem description.
    #[must_use]
    pub fn recommendation_prompt(&self) -> Option<RecommendationPrompt> {
        if self.status != TaskStatus::Blocked {
            return None;
        }
        self.problem_description
            .clone()
            .map(|problem| RecommendationPrompt::new(self.task.title.clone(), problem))
    }

    /// Applies the transition and returns the updated task.
    ///
    /// The recommendation is kept only when the task ends up blocked with a
    /// problem description; in every other case it is cleared.
    pub fn complete(self, recommendation: Option<Recommendation>, clock: &impl Clock) -> Task {
        let kept_recommendation = if self.recommendation_prompt().is_some() {
            recommendation
        } else {
            None
        };
        let Self {
            mut task,
            status,
            problem_description,
        } = self;

        task.state = TaskState::with_recommendation(status, kept_recommendation);
        task.problem_description = problem_description;
        task.revision = task.revision.next();
        task.updated_at = clock.utc();
        task
    }
}
