//! Deterministic, pure logic shared by the menu workflow.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! snapshots and return deterministic outputs suitable for tests.

pub mod filters;
pub mod snapshot;
pub mod types;
