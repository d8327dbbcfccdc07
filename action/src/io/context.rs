//! Capture of the ambient CI invocation context.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::types::InvocationContext;

pub const EVENT_NAME_VAR: &str = "GITHUB_EVENT_NAME";
pub const REPOSITORY_OWNER_VAR: &str = "GITHUB_REPOSITORY_OWNER";

/// Build the context from an environment snapshot.
pub fn context_from_env(env: BTreeMap<String, String>) -> InvocationContext {
    let lookup = |key: &str| env.get(key).filter(|value| !value.is_empty()).cloned();
    let event_name = lookup(EVENT_NAME_VAR);
    let repository_owner = lookup(REPOSITORY_OWNER_VAR);
    debug!(
        event = ?event_name,
        owner = ?repository_owner,
        vars = env.len(),
        "invocation context captured"
    );
    InvocationContext {
        event_name,
        repository_owner,
        env,
    }
}

/// Snapshot the current process environment.
///
/// Entries that are not valid unicode are skipped.
pub fn capture_context() -> InvocationContext {
    let env = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    context_from_env(env)
}
