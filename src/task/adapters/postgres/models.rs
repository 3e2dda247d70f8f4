//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning caller identity.
    pub owner: String,
    /// Task title.
    pub title: String,
    /// Task status.
    pub status: String,
    /// Problem description, if any.
    pub problem_description: Option<String>,
    /// Recommendation, if any.
    pub recommendation: Option<String>,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning caller identity.
    pub owner: String,
    /// Task title.
    pub title: String,
    /// Task status.
    pub status: String,
    /// Problem description, if any.
    pub problem_description: Option<String>,
    /// Recommendation, if any.
    pub recommendation: Option<String>,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by a status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task status.
    pub status: String,
    /// Problem description, if any.
    pub problem_description: Option<String>,
    /// Recommendation, if any.
    pub recommendation: Option<String>,
    /// New concurrency revision.
    pub revision: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
