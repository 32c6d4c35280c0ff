// ABOUTME: Application-wide error types for riodeploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no roboRIO found for team {0}")]
    TargetNotFound(crate::types::TeamNumber),

    #[error("could not reach the roboRIO")]
    TargetUnreachable,

    #[error("remote command `{command}` exited with {exit_code}")]
    CommandFailed { command: String, exit_code: u32 },

    #[error("runtime install could not be verified")]
    VerificationFailed,

    #[error("file transfer failed: {0}")]
    TransferFailed(String),

    #[error("{0}")]
    Target(#[from] crate::target::Error),

    #[error("{0}")]
    Install(#[from] crate::install::InstallError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
