//! Diesel schema for task persistence.

diesel::table! {
    /// Owner-scoped task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Caller identity that owns the task.
        owner -> Text,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task status.
        #[max_length = 32]
        status -> Varchar,
        /// Problem description, if any.
        problem_description -> Nullable<Text>,
        /// Recommendation attached while blocked, if any.
        recommendation -> Nullable<Text>,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
