//! Problem descriptions and remediation recommendations for blocked tasks.

use super::TaskTitle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text stored in place of a recommendation when the provider call fails.
pub const RECOMMENDATION_UNAVAILABLE: &str = "AI recommendation unavailable";

/// Caller-supplied description of what is blocking a task.
///
/// Never blank. The text is kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemDescription(String);

impl ProblemDescription {
    /// Wraps a description, returning `None` for empty or blank input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let raw = value.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a status transition treats the stored problem description.
///
/// Distinguishes a request that omits the field from one that supplies an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProblemDescriptionUpdate {
    /// The field was absent; keep the current description.
    #[default]
    Unchanged,
    /// The field was present; a blank value clears the description.
    Replace(String),
}

impl ProblemDescriptionUpdate {
    /// Applies the update to the current description.
    #[must_use]
    pub fn resolve(self, current: Option<ProblemDescription>) -> Option<ProblemDescription> {
        match self {
            Self::Unchanged => current,
            Self::Replace(value) => ProblemDescription::new(value),
        }
    }
}

/// Remediation advice attached to a blocked task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation(String);

impl Recommendation {
    /// Wraps provider output trimmed of surrounding whitespace.
    ///
    /// Returns `None` when nothing remains after trimming.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the placeholder used when the provider could not answer.
    #[must_use]
    pub fn unavailable() -> Self {
        Self(RECOMMENDATION_UNAVAILABLE.to_owned())
    }

    /// Returns `true` for the placeholder produced by [`Self::unavailable`].
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.0 == RECOMMENDATION_UNAVAILABLE
    }

    /// Returns the recommendation as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input handed to a recommendation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPrompt {
    title: TaskTitle,
    problem: ProblemDescription,
}

impl RecommendationPrompt {
    /// Creates a prompt from a task title and its problem description.
    #[must_use]
    pub const fn new(title: TaskTitle, problem: ProblemDescription) -> Self {
        Self { title, problem }
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the problem description.
    #[must_use]
    pub const fn problem(&self) -> &ProblemDescription {
        &self.problem
    }
}
