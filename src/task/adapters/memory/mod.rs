//! In-memory adapters for tests and local deterministic flows.

mod recommendation;
mod task;

pub use recommendation::ScriptedRecommendationProvider;
pub use task::InMemoryTaskRepository;
