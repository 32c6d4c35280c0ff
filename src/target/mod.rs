// ABOUTME: Per-operation context for one target controller.
// ABOUTME: Owns the transport and credential slots; hands out discoverer, executor, and transferer.

mod credentials;
mod discovery;
mod error;
mod exec;
mod transfer;

pub use credentials::{Credentials, Role, SessionManager};
pub use discovery::{DEFAULT_TIMEOUT, Discoverer};
pub use error::{Error, Result};
pub use exec::{CommandExecutor, CommandResult};
pub use transfer::FileTransferer;

use crate::output::Reporter;
use crate::ssh::{RemoteSession, SessionKind, Transport};
use std::time::Duration;

/// Connection settings that do not come from discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSettings {
    pub port: u16,
    /// Bound on each command or copy once connected.
    pub command_timeout: Duration,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            port: 22,
            command_timeout: Duration::from_secs(300),
        }
    }
}

/// A target controller reached through `T`.
///
/// Discovery writes the credential slots; executor and transferer only read them.
#[derive(Debug)]
pub struct Target<T> {
    transport: T,
    sessions: SessionManager,
    settings: TargetSettings,
}

impl<T: Transport> Target<T> {
    pub fn new(transport: T) -> Self {
        Self::with_settings(transport, TargetSettings::default())
    }

    pub fn with_settings(transport: T, settings: TargetSettings) -> Self {
        Self {
            transport,
            sessions: SessionManager::new(),
            settings,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn settings(&self) -> TargetSettings {
        self.settings
    }

    pub fn discoverer<'a>(&'a self, reporter: &'a dyn Reporter) -> Discoverer<'a, T> {
        Discoverer::new(self, reporter)
    }

    pub fn executor<'a>(&'a self, reporter: &'a dyn Reporter) -> CommandExecutor<'a, T> {
        CommandExecutor::new(self, reporter)
    }

    pub fn transferer<'a>(&'a self, reporter: &'a dyn Reporter) -> FileTransferer<'a, T> {
        FileTransferer::new(self, reporter)
    }

    /// Open a session for `role`.
    ///
    /// Returns `Ok(None)` when the target cannot be reached or the connect
    /// times out, and `SessionUnavailable` when discovery has not filled the slot.
    pub(crate) async fn open(&self, role: Role, kind: SessionKind) -> Result<Option<T::Session>> {
        let credentials = self
            .sessions
            .get(role)
            .ok_or(Error::SessionUnavailable(role))?;
        let config = credentials.session_config(self.settings.command_timeout);

        match self.transport.connect(&config, kind).await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_unreachable() => {
                tracing::warn!("{} session as {} failed: {}", kind, role, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Disconnect, logging rather than failing if the teardown itself breaks.
pub(crate) async fn close<S: RemoteSession>(session: S) {
    if let Err(e) = session.disconnect().await {
        tracing::warn!("disconnect failed: {}", e);
    }
}
