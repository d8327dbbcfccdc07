//! Action inputs from the CI host's `INPUT_*` environment bindings.
//!
//! GitHub exposes each declared input as `INPUT_<NAME>` with the name
//! upper-cased and spaces replaced by underscores (dashes are kept).

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::types::Configuration;

pub const API_KEY: &str = "api-key";
pub const NOTEBOOKS: &str = "notebooks";
pub const DOCKER_USERNAME: &str = "docker-username";
pub const DOCKER_PASSWORD: &str = "docker-password";
pub const DOCKER_IMAGE_NAME: &str = "docker-image-name";
pub const DOCKER_REGISTRY_PREFIX: &str = "docker-registry-prefix";
pub const USE_DOCKER: &str = "use-docker";
pub const DEBUG: &str = "debug";
pub const PATH: &str = "path";

/// Environment key holding the value of input `name`.
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read a trimmed input, treating empty as absent.
pub fn get_input(env: &BTreeMap<String, String>, name: &str) -> Option<String> {
    env.get(&input_var(name))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Case-insensitive `"true"`; any other non-empty value is `false`.
fn get_bool(env: &BTreeMap<String, String>, name: &str, default: bool) -> bool {
    match get_input(env, name) {
        Some(value) => value.eq_ignore_ascii_case("true"),
        None => default,
    }
}

/// Collect the action inputs into a [`Configuration`].
pub fn read_inputs(env: &BTreeMap<String, String>) -> Configuration {
    let defaults = Configuration::default();
    let config = Configuration {
        api_key: get_input(env, API_KEY),
        notebooks: get_input(env, NOTEBOOKS),
        docker_username: get_input(env, DOCKER_USERNAME),
        docker_password: get_input(env, DOCKER_PASSWORD),
        docker_image_name: get_input(env, DOCKER_IMAGE_NAME),
        docker_registry_prefix: get_input(env, DOCKER_REGISTRY_PREFIX),
        use_docker: get_bool(env, USE_DOCKER, defaults.use_docker),
        debug: get_bool(env, DEBUG, defaults.debug),
        working_path: get_input(env, PATH).unwrap_or(defaults.working_path),
    };
    debug!(?config, "inputs read");
    config
}
