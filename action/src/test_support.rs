//! Test-only runners, reporters and contexts.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::core::types::{CommandLine, InvocationContext};
use crate::io::process::{CommandRunner, RunRequest};
use crate::io::report::Reporter;

/// A command as seen by [`ScriptedRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: CommandLine,
    pub workdir: PathBuf,
    pub env: Option<BTreeMap<String, String>>,
}

/// Runner that returns queued exit codes (then `0`) without spawning anything.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    codes: RefCell<VecDeque<i32>>,
    spawn_errors: BTreeSet<usize>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    pub fn new(codes: Vec<i32>) -> Self {
        Self {
            codes: RefCell::new(codes.into()),
            ..Self::default()
        }
    }

    /// Make the `index`-th call (0-based) fail as if the program were missing.
    pub fn spawn_error_at(mut self, index: usize) -> Self {
        self.spawn_errors.insert(index);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines in call order.
    pub fn rendered(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.command.render())
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine, request: &RunRequest<'_>) -> Result<i32> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(RecordedCall {
            command: command.clone(),
            workdir: request.workdir.to_path_buf(),
            env: request.env.cloned(),
        });
        if self.spawn_errors.contains(&index) {
            return Err(anyhow!("spawn {}: No such file or directory", command.program));
        }
        Ok(self.codes.borrow_mut().pop_front().unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    StartGroup(String),
    EndGroup,
    Info(String),
    Warning(String),
    Fail(String),
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn failures(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Fail(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn start_group(&mut self, name: &str) -> Result<()> {
        self.events.push(ReportEvent::StartGroup(name.to_string()));
        Ok(())
    }

    fn end_group(&mut self) -> Result<()> {
        self.events.push(ReportEvent::EndGroup);
        Ok(())
    }

    fn info(&mut self, line: &str) -> Result<()> {
        self.events.push(ReportEvent::Info(line.to_string()));
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        self.events.push(ReportEvent::Warning(message.to_string()));
        Ok(())
    }

    fn fail(&mut self, message: &str) -> Result<()> {
        self.events.push(ReportEvent::Fail(message.to_string()));
        Ok(())
    }
}

/// Context for a `push` event owned by `octo` with the given environment.
pub fn push_context(env: &[(&str, &str)]) -> InvocationContext {
    context("push", env)
}

/// Context for a `pull_request` event owned by `octo` with the given environment.
pub fn pull_request_context(env: &[(&str, &str)]) -> InvocationContext {
    context("pull_request", env)
}

fn context(event: &str, env: &[(&str, &str)]) -> InvocationContext {
    InvocationContext {
        event_name: Some(event.to_string()),
        repository_owner: Some("octo".to_string()),
        env: env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Empty scratch directory to use as the action's base directory.
pub fn scratch_dir() -> Result<tempfile::TempDir> {
    Ok(tempfile::tempdir()?)
}
