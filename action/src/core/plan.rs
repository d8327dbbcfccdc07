//! Deterministic construction of the Treebeard command plan.
//!
//! `build_plan` is a pure function of the inputs, the invocation context and
//! the toolchain. It never touches the process environment.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::core::types::{
    Arg, CommandLine, Configuration, ExecutionPlan, InvocationContext, Toolchain,
};
use crate::error::ActionError;

/// Inherited keys with this prefix are forwarded to `treebeard run --env`.
pub const FORWARD_PREFIX: &str = "TB_";
/// Exported so the CLI knows which ref of itself was installed.
pub const TREEBEARD_REF_VAR: &str = "TREEBEARD_REF";

pub const DOCKER_USERNAME_VAR: &str = "DOCKER_USERNAME";
pub const DOCKER_PASSWORD_VAR: &str = "DOCKER_PASSWORD";
pub const DOCKER_REGISTRY_PREFIX_VAR: &str = "DOCKER_REGISTRY_PREFIX";
pub const IMAGE_NAME_VAR: &str = "TREEBEARD_IMAGE_NAME";

/// Keys that carry registry configuration or secrets.
pub const DOCKER_VARS: [&str; 4] = [
    DOCKER_USERNAME_VAR,
    DOCKER_PASSWORD_VAR,
    DOCKER_REGISTRY_PREFIX_VAR,
    IMAGE_NAME_VAR,
];

/// Build the ordered command list and child environment.
///
/// Fails with [`ActionError::Config`] when a docker username is given without
/// a password (skipped for pull requests, which never receive registry
/// credentials).
#[instrument(skip_all, fields(pull_request = context.is_pull_request()))]
pub fn build_plan(
    config: &Configuration,
    context: &InvocationContext,
    tool: &Toolchain,
) -> Result<ExecutionPlan, ActionError> {
    if !context.is_pull_request()
        && config.docker_username.is_some()
        && config.docker_password.is_none()
    {
        return Err(ActionError::Config(
            "missing docker password: docker-username is supplied but docker-password is an empty string, are you missing a secret?".to_string(),
        ));
    }

    let env = build_env(config, context, tool);
    let forwarded = forwarded_keys(&context.env);

    let mut commands = Vec::with_capacity(2);
    if let Some(api_key) = &config.api_key {
        let owner = context.repository_owner.as_deref().unwrap_or_default();
        if owner.is_empty() {
            warn!("repository owner unknown, configuring with an empty user name");
        }
        commands.push(
            CommandLine::new(&tool.cli)
                .flag("configure")
                .flag("--api_key")
                .arg(Arg::Secret(api_key.clone()))
                .flag("--user_name")
                .arg(Arg::DoubleQuoted(owner.to_string())),
        );
    }
    commands.push(run_command(config, tool, &forwarded));

    debug!(
        commands = commands.len(),
        forwarded = forwarded.len(),
        env_keys = env.len(),
        "plan built"
    );
    Ok(ExecutionPlan {
        commands,
        env,
        forwarded,
    })
}

fn build_env(
    config: &Configuration,
    context: &InvocationContext,
    tool: &Toolchain,
) -> BTreeMap<String, String> {
    let mut env = context.env.clone();
    env.insert(TREEBEARD_REF_VAR.to_string(), tool.treebeard_ref.clone());

    if context.is_pull_request() {
        for key in DOCKER_VARS {
            env.remove(key);
        }
        return env;
    }

    let docker = [
        (DOCKER_USERNAME_VAR, &config.docker_username),
        (DOCKER_PASSWORD_VAR, &config.docker_password),
        (DOCKER_REGISTRY_PREFIX_VAR, &config.docker_registry_prefix),
        (IMAGE_NAME_VAR, &config.docker_image_name),
    ];
    for (key, value) in docker {
        if let Some(value) = value {
            env.insert(key.to_string(), value.clone());
        }
    }
    env
}

fn forwarded_keys(inherited: &BTreeMap<String, String>) -> Vec<String> {
    inherited
        .keys()
        .filter(|key| key.starts_with(FORWARD_PREFIX))
        .cloned()
        .collect()
}

fn run_command(config: &Configuration, tool: &Toolchain, forwarded: &[String]) -> CommandLine {
    let mut cmd = CommandLine::new(&tool.cli).flag("run").flag("--confirm");
    if config.api_key.is_some() {
        cmd = cmd.flag("--upload");
    }
    for key in forwarded {
        cmd = cmd.flag("--env").arg(Arg::literal(key));
    }
    if let Some(notebooks) = &config.notebooks {
        cmd = cmd
            .flag("--notebooks")
            .arg(Arg::SingleQuoted(notebooks.clone()));
    }
    if !config.use_docker {
        cmd = cmd.flag("--dockerless");
    }
    if config.debug {
        cmd = cmd.flag("--debug");
    }
    cmd
}
