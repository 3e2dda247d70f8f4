//! Adapter implementations for task tracker ports.

pub mod memory;
pub mod openai;
pub mod postgres;
