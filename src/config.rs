//! Environment-driven configuration for the task tracker.
//!
//! Every setting is optional. Without `OPENAI_API_KEY` no recommendation
//! provider is configured and blocked tasks never receive advice.

use crate::task::adapters::openai::OpenAiRecommendationConfig;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// `PostgreSQL` connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Maximum number of pooled database connections.
pub const DATABASE_POOL_SIZE_ENV: &str = "DATABASE_POOL_SIZE";
/// API key enabling the recommendation provider.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// API root of an OpenAI-compatible service.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Chat model used for recommendations.
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
/// Recommendation request timeout in whole seconds.
pub const OPENAI_TIMEOUT_SECS_ENV: &str = "OPENAI_TIMEOUT_SECS";

const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Database connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    pool_size: u32,
}

impl DatabaseConfig {
    /// Creates settings with the default pool size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Returns the connection string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// Top-level task tracker configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTrackerConfig {
    database: Option<DatabaseConfig>,
    recommendations: Option<OpenAiRecommendationConfig>,
}

impl TaskTrackerConfig {
    /// Creates a configuration with no database and no provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets database settings.
    #[must_use]
    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }

    /// Sets recommendation provider settings.
    #[must_use]
    pub fn with_recommendations(mut self, recommendations: OpenAiRecommendationConfig) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot be
    /// parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = match read(DATABASE_URL_ENV) {
            Some(url) => {
                let mut connection = DatabaseConfig::new(url);
                if let Some(raw) = read(DATABASE_POOL_SIZE_ENV) {
                    let pool_size = parse_positive(DATABASE_POOL_SIZE_ENV, &raw)?;
                    connection = connection.with_pool_size(pool_size);
                }
                Some(connection)
            }
            None => None,
        };

        let recommendations = match read(OPENAI_API_KEY_ENV) {
            Some(api_key) => {
                let mut settings = OpenAiRecommendationConfig::new(api_key);
                if let Some(base_url) = read(OPENAI_BASE_URL_ENV) {
                    settings = settings.with_base_url(base_url);
                }
                if let Some(model) = read(OPENAI_MODEL_ENV) {
                    settings = settings.with_model(model);
                }
                if let Some(raw) = read(OPENAI_TIMEOUT_SECS_ENV) {
                    let seconds = parse_positive(OPENAI_TIMEOUT_SECS_ENV, &raw)?;
                    settings = settings.with_timeout(Duration::from_secs(u64::from(seconds)));
                }
                Some(settings)
            }
            None => None,
        };

        Ok(Self {
            database,
            recommendations,
        })
    }

    /// Returns database settings, if configured.
    #[must_use]
    pub const fn database(&self) -> Option<&DatabaseConfig> {
        self.database.as_ref()
    }

    /// Returns recommendation provider settings, if configured.
    #[must_use]
    pub const fn recommendations(&self) -> Option<&OpenAiRecommendationConfig> {
        self.recommendations.as_ref()
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason,
    };
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid("expected a positive integer"))?;
    if value == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(value)
}
