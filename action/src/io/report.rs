//! Reporting to the CI host through workflow commands.
//!
//! This is product output read by the CI host (log groups, error
//! annotations). Developer diagnostics go through `tracing` instead.

use std::io::Write;

use anyhow::{Context, Result};

/// Sink for user-visible action output.
pub trait Reporter {
    /// Open a collapsible log group.
    fn start_group(&mut self, name: &str) -> Result<()>;
    fn end_group(&mut self) -> Result<()>;
    /// Plain log line.
    fn info(&mut self, line: &str) -> Result<()>;
    /// Non-fatal annotation.
    fn warning(&mut self, message: &str) -> Result<()>;
    /// Mark the invocation as failed with `message`.
    fn fail(&mut self, message: &str) -> Result<()>;
}

/// Writes GitHub Actions workflow commands (`::group::`, `::error::`, ...).
pub struct WorkflowReporter<W: Write> {
    out: W,
}

impl<W: Write> WorkflowReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("write action output")?;
        self.out.flush().context("flush action output")
    }
}

impl WorkflowReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Reporter for WorkflowReporter<W> {
    fn start_group(&mut self, name: &str) -> Result<()> {
        self.line(&format!("::group::{}", escape_data(name)))
    }

    fn end_group(&mut self) -> Result<()> {
        self.line("::endgroup::")
    }

    fn info(&mut self, line: &str) -> Result<()> {
        self.line(line)
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        self.line(&format!("::warning::{}", escape_data(message)))
    }

    fn fail(&mut self, message: &str) -> Result<()> {
        self.line(&format!("::error::{}", escape_data(message)))
    }
}

/// Escape a workflow command payload so it stays on one line.
pub fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
