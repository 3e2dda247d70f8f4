//! Port contracts for the task tracker.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod recommendation;
pub mod repository;

pub use recommendation::{
    RecommendationProvider, RecommendationProviderError, RecommendationProviderResult,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
