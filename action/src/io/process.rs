//! Blocking execution of planned commands.
//!
//! The [`CommandRunner`] trait decouples the action state machine from real
//! process spawning. Tests use scripted runners that return predetermined exit
//! codes without spawning anything.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, error, instrument};

use crate::core::types::CommandLine;

/// Parameters shared by every command of an invocation.
#[derive(Debug, Clone, Copy)]
pub struct RunRequest<'a> {
    /// Working directory for the child process.
    pub workdir: &'a Path,
    /// Complete child environment. `None` inherits the action's own environment.
    pub env: Option<&'a BTreeMap<String, String>>,
}

/// Abstraction over process execution.
pub trait CommandRunner {
    /// Run `command` to completion and return its exit code.
    ///
    /// A non-zero exit is not an error; only failing to spawn or wait is.
    fn run(&self, command: &CommandLine, request: &RunRequest<'_>) -> Result<i32>;
}

/// Runner that spawns real processes with output streamed to the CI log.
///
/// There is no timeout: the CI host's job timeout is the only bound.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(program = %command.program))]
    fn run(&self, command: &CommandLine, request: &RunRequest<'_>) -> Result<i32> {
        let mut cmd = Command::new(&command.program);
        cmd.args(command.argv())
            .current_dir(request.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(env) = request.env {
            cmd.env_clear().envs(env);
        }

        debug!(workdir = %request.workdir.display(), "spawning child process");
        let status = match cmd.status() {
            Ok(status) => status,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {}", command.program));
            }
        };
        let code = exit_code(status);
        debug!(code, "command finished");
        Ok(code)
    }
}

/// Exit code of a finished child; signal termination maps to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
