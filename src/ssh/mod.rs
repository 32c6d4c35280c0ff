// ABOUTME: SSH client module for talking to the target controller.
// ABOUTME: Empty-password auth, command execution, SCP copies, and the transport seam.

mod client;
mod error;
pub mod scp;
mod transport;

pub use client::{CommandOutput, PromptResponder, Session, SessionConfig};
pub use error::{Error, Result};
pub use transport::{RemoteSession, SessionKind, SshSession, SshTransport, Transport};
