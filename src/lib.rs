//! Tasktracker: per-user task tracking with remediation advice.
//!
//! Callers create tasks, list and search their own tasks, and move them
//! between statuses. When a task becomes blocked with a problem description,
//! an optional recommendation provider is asked how to unblock it.
//!
//! # Architecture
//!
//! Tasktracker follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, ownership scoping, and recommendations
//! - [`config`]: Environment-driven settings
//! - [`bootstrap`]: Assembly of configured adapters into a service
//! - [`telemetry`]: Structured logging setup

pub mod bootstrap;
pub mod config;
pub mod task;
pub mod telemetry;
