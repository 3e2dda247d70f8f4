//! Domain model for the task tracker.
//!
//! Tasks are owned by a single caller, move between a closed set of statuses,
//! and may carry a remediation recommendation while blocked. Infrastructure
//! concerns stay outside of this boundary.

mod error;
mod ids;
mod recommendation;
mod task;
mod title;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{OwnerId, TaskId, TaskRevision};
pub use recommendation::{
    ProblemDescription, ProblemDescriptionUpdate, RECOMMENDATION_UNAVAILABLE, Recommendation,
    RecommendationPrompt,
};
pub use task::{PersistedTaskData, StatusTransition, Task, TaskState, TaskStatus};
pub use title::TaskTitle;
