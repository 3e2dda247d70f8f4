//! Scripted recommendation provider for tests and offline runs.

use crate::task::{
    domain::RecommendationPrompt,
    ports::{RecommendationProvider, RecommendationProviderError, RecommendationProviderResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Recommendation provider that answers every prompt with a fixed outcome.
///
/// Received prompts are recorded so callers can assert on what was asked.
#[derive(Debug, Clone)]
pub struct ScriptedRecommendationProvider {
    outcome: ScriptedOutcome,
    prompts: Arc<RwLock<Vec<RecommendationPrompt>>>,
}

#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Reply(String),
    Fail(String),
}

impl ScriptedRecommendationProvider {
    /// Creates a provider that always replies with `text`.
    #[must_use]
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_outcome(ScriptedOutcome::Reply(text.into()))
    }

    /// Creates a provider that always fails with a transport error carrying
    /// `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(ScriptedOutcome::Fail(message.into()))
    }

    fn with_outcome(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            prompts: Arc::default(),
        }
    }

    /// Returns the prompts received so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the prompt log lock is poisoned.
    pub fn received_prompts(&self) -> RecommendationProviderResult<Vec<RecommendationPrompt>> {
        let prompts = self.prompts.read().map_err(poisoned)?;
        Ok(prompts.clone())
    }
}

fn poisoned(err: impl ToString) -> RecommendationProviderError {
    RecommendationProviderError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RecommendationProvider for ScriptedRecommendationProvider {
    async fn recommend(
        &self,
        prompt: &RecommendationPrompt,
    ) -> RecommendationProviderResult<String> {
        self.prompts
            .write()
            .map_err(poisoned)?
            .push(prompt.clone());

        match &self.outcome {
            ScriptedOutcome::Reply(text) => Ok(text.clone()),
            ScriptedOutcome::Fail(message) => Err(RecommendationProviderError::transport(
                std::io::Error::other(message.clone()),
            )),
        }
    }
}
