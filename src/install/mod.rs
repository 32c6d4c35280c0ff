// ABOUTME: Runtime install workflow: connect while extracting, then stage, install, and verify.
// ABOUTME: Exports the Installer entry point, bundle types, and the busy gate.

mod bundle;
mod cleanup;
mod connect;
mod error;
mod gate;
mod run;
mod state;
mod transitions;

pub use bundle::{Bundle, ZipBundle};
pub use cleanup::CleanupHandle;
pub use error::InstallError;
pub use gate::{DeployGate, GateGuard};
pub use state::Stage;

use crate::config::InstallConfig;
use crate::output::Reporter;
use crate::ssh::Transport;
use crate::target::{DEFAULT_TIMEOUT, Target};
use crate::types::{TargetAddress, TeamNumber};
use run::{Aborted, InstallRun};
use state::Verified;
use std::sync::Arc;
use std::time::Duration;

pub const LABEL_RUNNING: &str = "Installing Runtime";
pub const LABEL_SUCCESS: &str = "Runtime Install Successful";
pub const LABEL_FAILED: &str = "Runtime Install Failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Success,
    Failed,
}

/// What one install workflow did.
#[derive(Debug)]
pub struct InstallReport {
    pub outcome: InstallOutcome,
    /// Stages in the order they were entered.
    pub stages: Vec<Stage>,
    /// Where the target was found, if it was.
    pub address: Option<TargetAddress>,
    pub error: Option<InstallError>,
    /// Present once a verdict was reached; cleanup runs detached.
    pub cleanup: Option<CleanupHandle>,
}

impl InstallReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == InstallOutcome::Success
    }

    pub fn final_stage(&self) -> Option<Stage> {
        self.stages.last().copied()
    }

    pub fn take_cleanup(&mut self) -> Option<CleanupHandle> {
        self.cleanup.take()
    }
}

/// Drives installs against one target. Only one runs at a time per gate,
/// and by default every installer shares [`DeployGate::global`].
pub struct Installer<T> {
    target: Arc<Target<T>>,
    reporter: Arc<dyn Reporter>,
    gate: Arc<DeployGate>,
    config: InstallConfig,
    timeout: Duration,
}

impl<T: Transport> Installer<T> {
    pub fn new(target: Arc<Target<T>>, reporter: Arc<dyn Reporter>, config: InstallConfig) -> Self {
        Self {
            target,
            reporter,
            gate: DeployGate::global(),
            config,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use `gate` instead of the process-wide one.
    pub fn with_gate(mut self, gate: Arc<DeployGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Per-candidate discovery timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn gate(&self) -> &Arc<DeployGate> {
        &self.gate
    }

    pub fn target(&self) -> &Arc<Target<T>> {
        &self.target
    }

    /// Run the whole workflow for `team`.
    ///
    /// Returns `None` without doing anything when another install holds the
    /// gate. Otherwise the report carries the verdict; cleanup may still be
    /// running when this returns.
    pub async fn install<B>(&self, team: TeamNumber, bundle: &B) -> Option<InstallReport>
    where
        B: Bundle + ?Sized,
    {
        let Some(guard) = self.gate.try_enter() else {
            tracing::debug!("install already in progress, ignoring request");
            return None;
        };

        self.reporter.label(LABEL_RUNNING);
        let reporter = self.reporter.as_ref();
        let mut stages = vec![Stage::Start, Stage::Connecting, Stage::Extracting];
        reporter.line("Attempting to connect to roboRIO");

        let joined = connect::join(
            &self.target,
            reporter,
            team,
            self.timeout,
            self.config.connect_deadline,
            bundle,
        )
        .await;

        let (address, files) = match joined {
            Ok(joined) => joined,
            Err(error) => return Some(self.fail(stages, None, error)),
        };

        stages.push(Stage::Joined);
        reporter.line("Successfully connected to roboRIO");
        tracing::debug!("{} files to deploy to {}", files.len(), address);

        let run = InstallRun::new(&self.target, reporter, &self.config, address, files, stages);
        let verdict = async {
            let run = run.create_remote_dir().await.map_err(Aborted::from)?;
            let run = run.upload().await.map_err(Aborted::from)?;
            let run = run.install().await.map_err(Aborted::from)?;
            run.verify().await.map_err(Aborted::from)
        }
        .await;

        match verdict {
            Ok((run, passed)) => Some(self.finish(run, passed, guard)),
            Err(aborted) => Some(self.fail(aborted.stages, Some(aborted.address), aborted.error)),
        }
    }

    fn finish(&self, run: InstallRun<'_, T, Verified>, passed: bool, guard: GateGuard) -> InstallReport {
        let (address, mut stages) = run.into_parts();
        let outcome = if passed {
            self.reporter.label(LABEL_SUCCESS);
            InstallOutcome::Success
        } else {
            self.reporter.label(LABEL_FAILED);
            InstallOutcome::Failed
        };

        stages.push(Stage::Cleanup);
        self.reporter.line("Cleaning up installation");
        let cleanup = cleanup::spawn(
            Arc::clone(&self.target),
            Arc::clone(&self.reporter),
            self.config.clone(),
            guard,
        );

        stages.push(if passed { Stage::Done } else { Stage::Failed });
        InstallReport {
            outcome,
            stages,
            address: Some(address),
            error: None,
            cleanup: Some(cleanup),
        }
    }

    fn fail(
        &self,
        mut stages: Vec<Stage>,
        address: Option<TargetAddress>,
        error: InstallError,
    ) -> InstallReport {
        match &error {
            InstallError::ConnectTimeout | InstallError::ConnectFailed => {
                tracing::warn!("install stopped: {}", error);
            }
            other => tracing::error!("install failed: {}", other),
        }

        self.target.sessions().clear();
        self.reporter.line(&error.exit_message());
        self.reporter.label(LABEL_FAILED);
        stages.push(Stage::Failed);

        InstallReport {
            outcome: InstallOutcome::Failed,
            stages,
            address,
            error: Some(error),
            cleanup: None,
        }
    }
}
