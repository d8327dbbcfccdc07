//! I/O adapters for the action: inputs, context, config, processes, reporting.

pub mod config;
pub mod context;
pub mod inputs;
pub mod process;
pub mod report;
