//! Orchestration for a single action invocation.
//!
//! `PREREQ_CHECK → INSTALLING → PLANNING → RUNNING → outcome`. Every failure is
//! terminal for the invocation; retries are the CI host's business.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, error, info, instrument, warn};

use crate::core::outcome::{Flow, RunOutcome, Tally};
use crate::core::plan::build_plan;
use crate::core::types::{Arg, CommandLine, Configuration, InvocationContext, Toolchain};
use crate::error::ActionError;
use crate::exit_codes;
use crate::io::config::ActionConfig;
use crate::io::process::{CommandRunner, RunRequest};
use crate::io::report::Reporter;

pub const PYTHON_CHECK_GROUP: &str = "Checking Python is Installed";
pub const INSTALL_GROUP: &str = "🌲 Install Treebeard";
/// Importable only when the interpreter and setuptools are usable.
pub const PROBE_EXPRESSION: &str = "from setuptools import find_namespace_packages";
pub const RUN_LABEL: &str = "Treebeard CLI run";
pub const INSTALL_LABEL: &str = "pip install";
pub const SUCCESS_MESSAGE: &str = "🌲 Treebeard run succeeded";
pub const PULL_REQUEST_NOTICE: &str =
    "🐳❌ Not attempting to set up Docker registry as this is a pull request";

/// Everything a single invocation needs, captured up front.
#[derive(Debug, Clone, Copy)]
pub struct ActionRequest<'a> {
    pub config: &'a Configuration,
    pub context: &'a InvocationContext,
    pub settings: &'a ActionConfig,
    /// Directory `config.working_path` is resolved against.
    pub base_dir: &'a Path,
}

/// `<python> -c "<probe>"`.
pub fn probe_command(tool: &Toolchain) -> CommandLine {
    CommandLine::new(&tool.python)
        .flag("-c")
        .arg(Arg::DoubleQuoted(PROBE_EXPRESSION.to_string()))
}

/// `<pip> install git+<repo>@<ref>#subdirectory=treebeard-lib`.
pub fn install_command(tool: &Toolchain) -> CommandLine {
    CommandLine::new(&tool.pip).flag("install").arg(Arg::Literal(format!(
        "git+{}@{}#subdirectory=treebeard-lib",
        tool.package_repo, tool.treebeard_ref
    )))
}

/// Drive the invocation up to, but not including, the final report.
///
/// Returns `Ok(())` only when every planned command exited with zero.
#[instrument(skip_all, fields(on_failure = ?request.settings.on_failure))]
pub fn run_action<R: CommandRunner, P: Reporter>(
    request: &ActionRequest<'_>,
    runner: &R,
    reporter: &mut P,
) -> Result<(), ActionError> {
    let tool = &request.settings.tool;
    let workdir = resolve_workdir(request.base_dir, &request.config.working_path)?;
    let inherit = RunRequest {
        workdir: &workdir,
        env: None,
    };

    reporter.start_group(PYTHON_CHECK_GROUP)?;
    let probe = runner.run(&probe_command(tool), &inherit);
    reporter.end_group()?;
    match probe {
        Ok(0) => debug!("prerequisites available"),
        Ok(code) => {
            warn!(code, "prerequisite probe failed");
            return Err(ActionError::PrerequisiteMissing);
        }
        Err(err) => {
            warn!(err = %format!("{err:#}"), "prerequisite probe could not start");
            return Err(ActionError::PrerequisiteMissing);
        }
    }

    reporter.start_group(INSTALL_GROUP)?;
    let install = runner.run(&install_command(tool), &inherit);
    reporter.end_group()?;
    let code = install.context("install treebeard")?;
    if code != 0 {
        return Err(ActionError::CommandFailed {
            label: INSTALL_LABEL.to_string(),
            code,
        });
    }

    if request.context.is_pull_request() {
        reporter.info(PULL_REQUEST_NOTICE)?;
    }
    let plan = build_plan(request.config, request.context, tool)?;

    if request.config.debug {
        let keys: Vec<&str> = plan.env.keys().map(String::as_str).collect();
        reporter.info(&format!("Treebeard submitting env:\n{}", keys.join(",")))?;
    }

    let run_request = RunRequest {
        workdir: &workdir,
        env: Some(&plan.env),
    };
    let mut tally = Tally::new(request.settings.on_failure);
    for (index, command) in plan.commands.iter().enumerate() {
        info!(index, command = %command.render_masked(), "dispatching command");
        let code = runner
            .run(command, &run_request)
            .with_context(|| format!("run {}", command.render_masked()))?;
        if code != 0 {
            warn!(index, code, "command failed");
        }
        if tally.record(index, code) == Flow::Halt {
            debug!(index, "halting after failure");
            break;
        }
    }

    match tally.finish() {
        RunOutcome::Success => Ok(()),
        RunOutcome::Failed { first, later } => {
            for failure in later {
                reporter.warning(&format!(
                    "{RUN_LABEL} also failed with status code {} (command {})",
                    failure.code,
                    failure.index + 1
                ))?;
            }
            Err(ActionError::CommandFailed {
                label: RUN_LABEL.to_string(),
                code: first.code,
            })
        }
    }
}

/// Emit exactly one success or failure report and return the process exit code.
pub fn report_outcome<P: Reporter>(
    result: &Result<(), ActionError>,
    reporter: &mut P,
) -> anyhow::Result<i32> {
    match result {
        Ok(()) => {
            info!("action succeeded");
            reporter.info(SUCCESS_MESSAGE)?;
            Ok(exit_codes::OK)
        }
        Err(err) => {
            let message = err.report_message();
            error!(%message, "action failed");
            reporter.fail(&message)?;
            Ok(exit_codes::FAILED)
        }
    }
}

fn resolve_workdir(base: &Path, path: &str) -> anyhow::Result<PathBuf> {
    let dir = base.join(path);
    let meta =
        fs::metadata(&dir).with_context(|| format!("change directory to {}", dir.display()))?;
    if !meta.is_dir() {
        return Err(anyhow!(
            "change directory to {}: not a directory",
            dir.display()
        ));
    }
    Ok(dir)
}
