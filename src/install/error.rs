// ABOUTME: Error types for the runtime install workflow.
// ABOUTME: One variant per stage that can end the workflow early.

use crate::target;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The connect deadline passed before discovery finished.
    #[error("connection timed out")]
    ConnectTimeout,

    /// Discovery finished without finding the target.
    #[error("connection failed")]
    ConnectFailed,

    #[error("failed to extract {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("failed to create remote directory {0}")]
    RemoteDir(String),

    #[error("failed to upload runtime files to {0}")]
    Upload(String),

    /// The target dropped off before the named command could run.
    #[error("lost connection before `{0}` could run")]
    Disconnected(String),

    #[error(transparent)]
    Target(#[from] target::Error),
}

impl InstallError {
    pub(super) fn extraction(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Line written to the progress sink when the workflow stops here.
    pub fn exit_message(&self) -> String {
        match self {
            Self::ConnectTimeout => "roboRIO connection timed out. Exiting.".to_string(),
            Self::ConnectFailed => "Failed to connect to roboRIO. Exiting.".to_string(),
            other => format!("Runtime install failed: {other}"),
        }
    }
}
