// ABOUTME: Finds the controller by probing mDNS, USB, then subnet addresses in order.
// ABOUTME: The first address whose SSH connect succeeds wins and fills the credential slots.

use super::credentials::{Credentials, Role};
use super::error::Result;
use super::{Target, close};
use crate::output::Reporter;
use crate::ssh::{self, SessionKind, Transport};
use crate::types::{Strategy, TargetAddress, TeamNumber};
use std::time::Duration;

/// Per-candidate connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Discoverer<'a, T> {
    target: &'a Target<T>,
    reporter: &'a dyn Reporter,
}

impl<'a, T: Transport> Discoverer<'a, T> {
    pub(super) fn new(target: &'a Target<T>, reporter: &'a dyn Reporter) -> Self {
        Self { target, reporter }
    }

    /// Locate the target for `team`.
    ///
    /// Candidates are tried one at a time, each bounded by `timeout`. Only
    /// refusal or timeout moves on to the next; any other transport error
    /// (including rejected credentials) aborts. Returns `None` and clears the
    /// credential slots when nothing answers.
    pub async fn discover(&self, team: TeamNumber, timeout: Duration) -> Result<Option<TargetAddress>> {
        let sessions = self.target.sessions();

        for strategy in Strategy::PRIORITY {
            let Some(host) = strategy.host_for(team) else {
                continue;
            };

            self.reporter
                .line(&format!("Trying {} connection at {}", strategy, host));

            match self.probe(&host, timeout).await {
                Ok(()) => {
                    sessions.install(&host, self.target.settings().port, timeout);
                    tracing::debug!("target found via {} at {}", strategy, host);
                    return Ok(Some(TargetAddress::reachable(strategy, host)));
                }
                Err(e) if e.is_unreachable() => {
                    tracing::debug!("{} candidate {} unreachable: {}", strategy, host, e);
                }
                Err(e) => {
                    sessions.clear();
                    return Err(e.into());
                }
            }
        }

        sessions.clear();
        Ok(None)
    }

    /// Connect as the service role and hang up.
    async fn probe(&self, host: &str, timeout: Duration) -> ssh::Result<()> {
        let settings = self.target.settings();
        let credentials = Credentials::new(Role::Service, host, settings.port, timeout);
        let config = credentials.session_config(settings.command_timeout);

        let session = self
            .target
            .transport()
            .connect(&config, SessionKind::Exec)
            .await?;
        close(session).await;
        Ok(())
    }
}
