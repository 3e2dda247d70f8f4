//! Task lifecycle management.
//!
//! Tasks are created for a caller, looked up and listed only by that caller,
//! and moved between statuses. Entering the blocked status with a problem
//! description asks the optional recommendation provider for advice; a
//! provider failure degrades to a placeholder instead of failing the
//! transition. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
