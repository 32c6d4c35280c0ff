// ABOUTME: Best-effort cleanup spawned once the install verdict is fixed.
// ABOUTME: Removes the staging directory and grants the runtime realtime priority.

use super::gate::GateGuard;
use crate::config::InstallConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Reporter;
use crate::ssh::Transport;
use crate::target::{Role, Target};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a detached cleanup task.
#[derive(Debug)]
pub struct CleanupHandle {
    handle: JoinHandle<Diagnostics>,
}

impl CleanupHandle {
    /// Wait for cleanup and collect what went wrong, if anything.
    pub async fn wait(self) -> Diagnostics {
        match self.handle.await {
            Ok(diagnostics) => diagnostics,
            Err(e) => {
                let mut diagnostics = Diagnostics::default();
                diagnostics.warn(Warning::cleanup(format!("cleanup task failed: {e}")));
                diagnostics
            }
        }
    }
}

/// Spawn cleanup. The gate stays held until it finishes, and the session
/// slots are emptied once the cleanup commands have run.
pub(super) fn spawn<T: Transport>(
    target: Arc<Target<T>>,
    reporter: Arc<dyn Reporter>,
    config: InstallConfig,
    guard: GateGuard,
) -> CleanupHandle {
    let handle = tokio::spawn(async move {
        let _guard = guard;
        let diagnostics = run(&target, reporter.as_ref(), &config).await;
        target.sessions().clear();
        reporter.line("Done. You may now deploy code to your robot.");
        diagnostics
    });
    CleanupHandle { handle }
}

async fn run<T: Transport>(
    target: &Target<T>,
    reporter: &dyn Reporter,
    config: &InstallConfig,
) -> Diagnostics {
    let executor = target.executor(reporter);
    let mut diagnostics = Diagnostics::default();

    for command in [config.remove_dir_command(), config.realtime_command()] {
        match executor.run_command(&command, Role::Admin).await {
            Ok(Some(result)) if result.success => {}
            Ok(Some(result)) => diagnostics.warn(Warning::cleanup(format!(
                "`{}` exited with {}",
                command, result.exit_code
            ))),
            Ok(None) => diagnostics.warn(Warning::unreachable(format!(
                "target unreachable, skipped `{command}`"
            ))),
            Err(e) => diagnostics.warn(Warning::cleanup(format!("`{command}` failed: {e}"))),
        }
    }

    diagnostics
}
