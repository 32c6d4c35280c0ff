// ABOUTME: Step methods for the install run, one per remote stage.
// ABOUTME: Each consumes the run and returns the next state, or itself with the failure.

use super::error::InstallError;
use super::run::{InstallRun, StepResult};
use super::state::{Installed, Joined, Stage, Staged, Uploaded, Verified};
use crate::ssh::Transport;
use crate::target::Role;

impl<'a, T: Transport> InstallRun<'a, T, Joined> {
    /// `mkdir -p` the staging directory. Safe to repeat.
    pub(super) async fn create_remote_dir(mut self) -> StepResult<'a, T, Staged, Joined> {
        self.enter(Stage::CreatingRemoteDir, "Creating install directory");

        let (target, reporter) = (self.target, self.reporter);
        let command = self.config.mkdir_command();
        let result = target
            .executor(reporter)
            .run_command(&command, Role::Admin)
            .await;

        match result {
            Ok(Some(r)) if r.success => Ok(self.transition()),
            Ok(Some(r)) => {
                tracing::warn!("`{}` exited with {}: {}", command, r.exit_code, r.stderr.trim());
                let dir = self.config.remote_dir.clone();
                Err((self, InstallError::RemoteDir(dir)))
            }
            Ok(None) => Err((self, InstallError::Disconnected(command))),
            Err(e) => Err((self, e.into())),
        }
    }
}

impl<'a, T: Transport> InstallRun<'a, T, Staged> {
    /// Copy every extracted file into the staging directory.
    pub(super) async fn upload(mut self) -> StepResult<'a, T, Uploaded, Staged> {
        self.enter(Stage::Uploading, "Deploying runtime files");

        let (target, reporter) = (self.target, self.reporter);
        let result = target
            .transferer(reporter)
            .upload_files(&self.files, &self.config.remote_dir, Role::Admin)
            .await;

        match result {
            Ok(true) => Ok(self.transition()),
            Ok(false) => {
                let dir = self.config.remote_dir.clone();
                Err((self, InstallError::Upload(dir)))
            }
            Err(e) => Err((self, e.into())),
        }
    }
}

impl<'a, T: Transport> InstallRun<'a, T, Uploaded> {
    /// Run the package install. Its exit status is logged only.
    pub(super) async fn install(mut self) -> StepResult<'a, T, Installed, Uploaded> {
        self.enter(Stage::Installing, "Installing runtime");

        let (target, reporter) = (self.target, self.reporter);
        let command = self.config.install_command();
        let result = target
            .executor(reporter)
            .run_command(&command, Role::Admin)
            .await;

        match result {
            Ok(Some(r)) => {
                if r.success {
                    tracing::debug!("install command succeeded");
                } else {
                    tracing::warn!(
                        "install command exited with {}: {}",
                        r.exit_code,
                        r.stderr.trim()
                    );
                }
                Ok(self.transition())
            }
            Ok(None) => Err((self, InstallError::Disconnected(command))),
            Err(e) => Err((self, e.into())),
        }
    }
}

impl<'a, T: Transport> InstallRun<'a, T, Installed> {
    /// Probe the target and fix the verdict.
    pub(super) async fn verify(
        mut self,
    ) -> Result<(InstallRun<'a, T, Verified>, bool), (Self, InstallError)> {
        tracing::debug!("install stage: {}", Stage::Verifying);
        self.stages.push(Stage::Verifying);

        let (target, reporter, config) = (self.target, self.reporter, self.config);
        let command = &config.verify_command;
        let result = target
            .executor(reporter)
            .run_command(command, Role::Admin)
            .await;

        let passed = match result {
            Ok(Some(r)) => r.success && config.verified(&r.output),
            Ok(None) => {
                let command = command.clone();
                return Err((self, InstallError::Disconnected(command)));
            }
            Err(e) => return Err((self, e.into())),
        };

        if passed {
            self.reporter.line("Runtime installed successfully");
        } else {
            self.reporter
                .line("Runtime not installed successfully. Please try again.");
        }
        Ok((self.transition(), passed))
    }
}
