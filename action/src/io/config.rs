//! Tool configuration, optionally read from a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use tracing::debug;

use crate::core::types::{FailurePolicy, Toolchain};

/// Action tool settings (TOML).
///
/// Every field is optional in the file; missing fields take the defaults used
/// on hosted runners.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActionConfig {
    /// Behavior of the run loop after a planned command fails.
    pub on_failure: FailurePolicy,

    pub tool: Toolchain,
}

impl ActionConfig {
    pub fn validate(&self) -> Result<()> {
        let programs = [
            ("tool.python", &self.tool.python),
            ("tool.pip", &self.tool.pip),
            ("tool.cli", &self.tool.cli),
        ];
        for (name, value) in programs {
            if value.trim().is_empty() {
                return Err(anyhow!("{name} must be non-empty"));
            }
        }
        if self.tool.treebeard_ref.trim().is_empty() {
            return Err(anyhow!("tool.treebeard_ref must be non-empty"));
        }
        if self.tool.package_repo.trim().is_empty() {
            return Err(anyhow!("tool.package_repo must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// `None` or a missing file yields `ActionConfig::default()`.
pub fn load_config(path: Option<&Path>) -> Result<ActionConfig> {
    let Some(path) = path.filter(|path| path.exists()) else {
        debug!("using default action config");
        let cfg = ActionConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    };
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ActionConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), "action config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(Some(&temp.path().join("missing.toml"))).expect("load");
        assert_eq!(cfg, ActionConfig::default());
        assert_eq!(load_config(None).expect("load"), ActionConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("action.toml");
        fs::write(&path, "on_failure = \"stop\"\n[tool]\npython = \"python3\"\n").expect("write");

        let cfg = load_config(Some(&path)).expect("load");
        assert_eq!(cfg.on_failure, FailurePolicy::Stop);
        assert_eq!(cfg.tool.python, "python3");
        assert_eq!(cfg.tool.cli, "treebeard");
    }

    #[test]
    fn rejects_empty_program() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("action.toml");
        fs::write(&path, "[tool]\ncli = \"\"\n").expect("write");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("tool.cli must be non-empty"));
    }
}
