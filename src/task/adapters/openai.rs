//! OpenAI-compatible chat-completions adapter for task recommendations.
//!
//! Works with any service exposing `POST {base_url}/chat/completions` with
//! bearer-token authentication.

use crate::task::{
    domain::RecommendationPrompt,
    ports::{RecommendationProvider, RecommendationProviderError, RecommendationProviderResult},
};
use async_trait::async_trait;
use minijinja::{Environment, context};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default API root for the hosted OpenAI service.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model used for recommendations.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default upper bound on a single recommendation request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_MAX_TOKENS: u32 = 200;
const DEFAULT_TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides concise, actionable \
recommendations for solving problems related to tasks or todos. Keep responses under 150 words.";

const USER_PROMPT_TEMPLATE: &str = "Task: \"{{ title }}\"\nProblem: \"{{ problem }}\"\n\n\
Provide a brief recommendation to solve this problem.";

/// Connection and generation settings for [`OpenAiRecommendationProvider`].
#[derive(Clone, PartialEq)]
pub struct OpenAiRecommendationConfig {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiRecommendationConfig {
    /// Creates settings for the hosted service with default model and limits.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Points the adapter at another OpenAI-compatible API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Selects the chat model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the chat model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for OpenAiRecommendationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiRecommendationConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Recommendation provider backed by an OpenAI-compatible chat API.
#[derive(Debug, Clone)]
pub struct OpenAiRecommendationProvider {
    client: Client,
    config: OpenAiRecommendationConfig,
}

impl OpenAiRecommendationProvider {
    /// Creates a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationProviderError::Transport`] when the HTTP client
    /// cannot be constructed.
    pub fn new(config: OpenAiRecommendationConfig) -> RecommendationProviderResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RecommendationProviderError::transport)?;
        Ok(Self { client, config })
    }

    fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request(
        &self,
        prompt: &RecommendationPrompt,
    ) -> RecommendationProviderResult<ChatRequest<'_>> {
        let user_prompt = render_user_prompt(prompt)?;
        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        })
    }
}

fn render_user_prompt(prompt: &RecommendationPrompt) -> RecommendationProviderResult<String> {
    let environment = Environment::new();
    environment
        .render_str(
            USER_PROMPT_TEMPLATE,
            context! {
                title => prompt.title().as_str(),
                problem => prompt.problem().as_str(),
            },
        )
        .map_err(|error| RecommendationProviderError::Prompt(error.to_string()))
}

/// Chat completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completion response body.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

#[async_trait]
impl RecommendationProvider for OpenAiRecommendationProvider {
    async fn recommend(
        &self,
        prompt: &RecommendationPrompt,
    ) -> RecommendationProviderResult<String> {
        let request = self.build_request(prompt)?;
        tracing::debug!(model = %self.config.model, "requesting task recommendation");

        let response = self
            .client
            .post(self.chat_completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(RecommendationProviderError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|error| {
                tracing::debug!(%error, "failed to read recommendation error body");
                String::new()
            });
            return Err(RecommendationProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|error| RecommendationProviderError::Decode(error.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(RecommendationProviderError::EmptyContent)?;

        let advice = content.trim();
        if advice.is_empty() {
            return Err(RecommendationProviderError::EmptyContent);
        }
        Ok(advice.to_owned())
    }
}
