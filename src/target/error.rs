// ABOUTME: Error types for discovery, command execution, and file transfer.
// ABOUTME: Connect timeouts never reach here; they become None/false at the call site.

use super::credentials::Role;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No credentials for the role; discovery has not run or failed.
    #[error("no {0} session available; the target has not been discovered")]
    SessionUnavailable(Role),

    /// Failure after the transport came up, or during discovery that is not unreachability.
    #[error(transparent)]
    Transport(#[from] crate::ssh::Error),

    #[error("failed to read local file {path}: {source}")]
    LocalResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
