// ABOUTME: Transport seam between the deploy core and the wire.
// ABOUTME: SshTransport opens russh sessions; tests plug in an in-memory target.

use super::client::{CommandOutput, Session, SessionConfig};
use super::error::Result;
use super::scp;
use async_trait::async_trait;
use std::fmt;

/// What a remote session will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Shell command execution.
    Exec,
    /// Bulk file copy.
    Copy,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Exec => write!(f, "exec"),
            SessionKind::Copy => write!(f, "copy"),
        }
    }
}

/// Opens authenticated sessions to a target.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    type Session: RemoteSession;

    /// Connect and authenticate, bounded by `config.connect_timeout`.
    async fn connect(&self, config: &SessionConfig, kind: SessionKind) -> Result<Self::Session>;
}

/// One live session. Callers must `disconnect` it on every path.
#[async_trait]
pub trait RemoteSession: Send {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput>;

    /// Copy `contents` to `remote_path`; `name` is used when the path is a directory.
    async fn upload(&mut self, remote_path: &str, name: &str, contents: &[u8]) -> Result<()>;

    async fn download(&mut self, remote_path: &str) -> Result<Vec<u8>>;

    async fn disconnect(self) -> Result<()>;
}

/// Production transport over russh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshTransport;

/// A russh session tagged with its intended use.
#[derive(Debug)]
pub struct SshSession {
    session: Session,
    kind: SessionKind,
}

impl SshSession {
    pub fn kind(&self) -> SessionKind {
        self.kind
    }
}

#[async_trait]
impl Transport for SshTransport {
    type Session = SshSession;

    async fn connect(&self, config: &SessionConfig, kind: SessionKind) -> Result<SshSession> {
        tracing::debug!(
            "opening {} session to {}@{}:{}",
            kind,
            config.user,
            config.host,
            config.port
        );
        let session = Session::connect(config.clone()).await?;
        Ok(SshSession { session, kind })
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn exec(&mut self, command: &str) -> Result<CommandOutput> {
        self.session.exec(command).await
    }

    async fn upload(&mut self, remote_path: &str, name: &str, contents: &[u8]) -> Result<()> {
        let timeout = self.session.config().command_timeout;
        scp::upload(&self.session, remote_path, name, contents, timeout).await
    }

    async fn download(&mut self, remote_path: &str) -> Result<Vec<u8>> {
        let timeout = self.session.config().command_timeout;
        scp::download(&self.session, remote_path, timeout).await
    }

    async fn disconnect(self) -> Result<()> {
        self.session.disconnect().await
    }
}
