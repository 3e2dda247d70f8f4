//! Recommendation provider port for blocked tasks.

use crate::task::domain::RecommendationPrompt;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for recommendation provider calls.
pub type RecommendationProviderResult<T> = Result<T, RecommendationProviderError>;

/// External text-generation service that suggests how to unblock a task.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Generates free-text advice for the given task title and problem.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationProviderError`] when the service cannot be
    /// reached, rejects the request, or returns no usable content.
    async fn recommend(&self, prompt: &RecommendationPrompt)
    -> RecommendationProviderResult<String>;
}

/// Errors returned by recommendation provider adapters.
#[derive(Debug, Clone, Error)]
pub enum RecommendationProviderError {
    /// The request could not be delivered or timed out.
    #[error("recommendation request failed: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The service answered with a non-success status.
    #[error("recommendation service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response did not contain any advice.
    #[error("recommendation service returned no content")]
    EmptyContent,

    /// The response body could not be decoded.
    #[error("malformed recommendation response: {0}")]
    Decode(String),

    /// The prompt template could not be rendered.
    #[error("failed to render recommendation prompt: {0}")]
    Prompt(String),
}

impl RecommendationProviderError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
