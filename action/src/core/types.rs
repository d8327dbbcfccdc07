//! Shared deterministic types for the action core.
//!
//! These types are built once per invocation and never mutated after the
//! first child process is spawned. They must not depend on external state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default Treebeard git ref installed into the runner.
pub const DEFAULT_TREEBEARD_REF: &str = "master";
/// Repository the Treebeard package is installed from.
pub const DEFAULT_PACKAGE_REPO: &str = "https://github.com/treebeardtech/treebeard.git";

/// Action inputs, collected once at process start.
///
/// Empty inputs are normalized to `None` so "non-empty" checks are plain
/// `Option` checks.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    pub api_key: Option<String>,
    pub notebooks: Option<String>,
    pub docker_username: Option<String>,
    pub docker_password: Option<String>,
    pub docker_image_name: Option<String>,
    pub docker_registry_prefix: Option<String>,
    pub use_docker: bool,
    pub debug: bool,
    pub working_path: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_key: None,
            notebooks: None,
            docker_username: None,
            docker_password: None,
            docker_image_name: None,
            docker_registry_prefix: None,
            use_docker: true,
            debug: false,
            working_path: ".".to_string(),
        }
    }
}

// Secrets stay out of `{:?}` so tracing fields never leak them.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("notebooks", &self.notebooks)
            .field("docker_username", &self.docker_username)
            .field("docker_password", &self.docker_password.as_ref().map(|_| "***"))
            .field("docker_image_name", &self.docker_image_name)
            .field("docker_registry_prefix", &self.docker_registry_prefix)
            .field("use_docker", &self.use_docker)
            .field("debug", &self.debug)
            .field("working_path", &self.working_path)
            .finish()
    }
}

/// Ambient facts about the CI invocation, captured once and passed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    /// CI event that triggered the workflow (`GITHUB_EVENT_NAME`).
    pub event_name: Option<String>,
    /// Owner of the repository (`GITHUB_REPOSITORY_OWNER`).
    pub repository_owner: Option<String>,
    /// Inherited process environment.
    pub env: BTreeMap<String, String>,
}

impl InvocationContext {
    pub fn is_pull_request(&self) -> bool {
        self.event_name.as_deref() == Some("pull_request")
    }
}

/// External programs the action drives.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Toolchain {
    /// Interpreter used for the prerequisite probe.
    pub python: String,
    /// Package installer.
    pub pip: String,
    /// Treebeard CLI entry point.
    pub cli: String,
    /// Git ref of Treebeard to install; also exported as `TREEBEARD_REF`.
    pub treebeard_ref: String,
    pub package_repo: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            python: "python".to_string(),
            pip: "pip".to_string(),
            cli: "treebeard".to_string(),
            treebeard_ref: DEFAULT_TREEBEARD_REF.to_string(),
            package_repo: DEFAULT_PACKAGE_REPO.to_string(),
        }
    }
}

/// What to do with the remaining planned commands once one has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep running the remaining commands; the first failure is still reported.
    #[default]
    Continue,
    /// Halt at the first failing command.
    Stop,
}

/// A single argv token.
///
/// The variant only affects how the token is rendered for humans; the raw
/// value is always what the child process receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Literal(String),
    /// Rendered inside single quotes (notebook selectors).
    SingleQuoted(String),
    /// Rendered inside double quotes (user names).
    DoubleQuoted(String),
    /// Rendered verbatim by [`CommandLine::render`], masked by [`CommandLine::render_masked`].
    Secret(String),
}

impl Arg {
    pub fn literal(value: impl Into<String>) -> Self {
        Arg::Literal(value.into())
    }

    pub fn value(&self) -> &str {
        match self {
            Arg::Literal(v) | Arg::SingleQuoted(v) | Arg::DoubleQuoted(v) | Arg::Secret(v) => v,
        }
    }

    fn render(&self, mask_secrets: bool) -> String {
        match self {
            Arg::Literal(v) => v.clone(),
            Arg::SingleQuoted(v) => format!("'{v}'"),
            Arg::DoubleQuoted(v) => format!("\"{v}\""),
            Arg::Secret(_) if mask_secrets => "***".to_string(),
            Arg::Secret(v) => v.clone(),
        }
    }
}

/// A program plus typed arguments, assembled into argv only when executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<Arg>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn flag(self, flag: &str) -> Self {
        self.arg(Arg::literal(flag))
    }

    /// Raw argument values, excluding the program.
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(Arg::value).collect()
    }

    /// Human-readable command line, including secrets.
    pub fn render(&self) -> String {
        self.render_with(false)
    }

    /// Human-readable command line with secrets replaced by `***`.
    pub fn render_masked(&self) -> String {
        self.render_with(true)
    }

    fn render_with(&self, mask_secrets: bool) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.render(mask_secrets));
        }
        out
    }
}

/// Ordered commands plus the environment they run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// One or two commands: optional `configure`, then `run`.
    pub commands: Vec<CommandLine>,
    /// Complete child environment.
    pub env: BTreeMap<String, String>,
    /// `TB_` keys forwarded with `--env`, in key order.
    pub forwarded: Vec<String>,
}

impl ExecutionPlan {
    /// Secret-free view suitable for printing.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            commands: self
                .commands
                .iter()
                .map(CommandLine::render_masked)
                .collect(),
            env_keys: self.env.keys().cloned().collect(),
            forwarded: self.forwarded.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub commands: Vec<String>,
    pub env_keys: Vec<String>,
    pub forwarded: Vec<String>,
}
