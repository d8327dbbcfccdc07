//! Classified failures surfaced to the CI host.

use thiserror::Error;

/// Message reported when the interpreter probe fails.
pub const PREREQUISITE_MESSAGE: &str = "Python does not appear to be setup, please include \"- uses: actions/setup-python@v2\" in your workflow.";

#[derive(Debug, Error)]
pub enum ActionError {
    /// Invalid or inconsistent inputs. Nothing was executed.
    #[error("{0}")]
    Config(String),

    /// Interpreter or a required library is unavailable. Nothing was installed or run.
    #[error("{}", PREREQUISITE_MESSAGE)]
    PrerequisiteMissing,

    /// A command exited non-zero. Effects of earlier commands stand.
    #[error("{label} failed with status code {code}")]
    CommandFailed { label: String, code: i32 },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ActionError {
    /// One-line message for the failure report, including any cause chain.
    pub fn report_message(&self) -> String {
        match self {
            ActionError::Unexpected(err) => format!("{err:#}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn command_failed_message_names_code() {
        let err = ActionError::CommandFailed {
            label: "Treebeard CLI run".to_string(),
            code: 3,
        };
        assert_eq!(
            err.report_message(),
            "Treebeard CLI run failed with status code 3"
        );
    }

    #[test]
    fn unexpected_message_includes_cause_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("No such file or directory"));
        let err = ActionError::from(inner.context("change directory to nb").unwrap_err());
        assert_eq!(
            err.report_message(),
            "change directory to nb: No such file or directory"
        );
    }
}
