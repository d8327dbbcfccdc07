//! Deterministic, pure logic shared by the action.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod outcome;
pub mod plan;
pub mod types;
