// ABOUTME: SSH-specific error types.
// ABOUTME: Separates socket-level unreachability from auth, protocol, and copy failures.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Socket-level failure: refused, unroutable, or the name did not resolve.
    #[error("{host} is unreachable: {reason}")]
    Unreachable { host: String, reason: String },

    #[error("connection to {host} timed out after {timeout:?}")]
    ConnectTimeout { host: String, timeout: Duration },

    #[error("authentication failed for user {user}")]
    AuthenticationFailed { user: String },

    #[error("command execution failed: {0}")]
    CommandFailed(String),

    #[error("command timed out after {0:?}")]
    CommandTimeout(Duration),

    #[error("channel closed unexpectedly without exit status")]
    ChannelClosed,

    /// The remote scp process rejected the transfer (missing file, permissions).
    #[error("remote copy failed: {0}")]
    Scp(String),

    #[error("SSH protocol error: {0}")]
    Protocol(#[from] russh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the target could not be reached at all, as opposed to a
    /// failure after the transport came up.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Error::Unreachable { .. } | Error::ConnectTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
