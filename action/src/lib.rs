//! CI action that installs Treebeard and runs notebooks through its CLI.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (plan construction, exit code
//!   reconciliation). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting adapters (inputs, environment, config files,
//!   process execution, workflow-command output).
//!
//! [`action`] coordinates the two to implement one invocation.

pub mod action;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
