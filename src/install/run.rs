// ABOUTME: Install run struct parameterized by state marker.
// ABOUTME: Carries the joined address, extracted files, and stage trail between steps.

use super::error::InstallError;
use super::state::{Joined, Stage};
use crate::config::InstallConfig;
use crate::output::Reporter;
use crate::target::Target;
use crate::types::TargetAddress;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Result of a step: the next state, or the current one with the reason it stopped.
pub(super) type StepResult<'a, T, Next, Cur> =
    Result<InstallRun<'a, T, Next>, (InstallRun<'a, T, Cur>, InstallError)>;

/// One in-flight install, after the connect/extract join.
pub(super) struct InstallRun<'a, T, S> {
    pub(super) target: &'a Target<T>,
    pub(super) reporter: &'a dyn Reporter,
    pub(super) config: &'a InstallConfig,
    pub(super) address: TargetAddress,
    pub(super) files: Vec<PathBuf>,
    pub(super) stages: Vec<Stage>,
    _state: PhantomData<S>,
}

impl<'a, T> InstallRun<'a, T, Joined> {
    pub(super) fn new(
        target: &'a Target<T>,
        reporter: &'a dyn Reporter,
        config: &'a InstallConfig,
        address: TargetAddress,
        files: Vec<PathBuf>,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            target,
            reporter,
            config,
            address,
            files,
            stages,
            _state: PhantomData,
        }
    }
}

impl<'a, T, S> InstallRun<'a, T, S> {
    pub(super) fn transition<N>(self) -> InstallRun<'a, T, N> {
        InstallRun {
            target: self.target,
            reporter: self.reporter,
            config: self.config,
            address: self.address,
            files: self.files,
            stages: self.stages,
            _state: PhantomData,
        }
    }

    /// Record `stage` and announce it.
    pub(super) fn enter(&mut self, stage: Stage, line: &str) {
        tracing::debug!("install stage: {}", stage);
        self.stages.push(stage);
        self.reporter.line(line);
    }

    pub(super) fn into_parts(self) -> (TargetAddress, Vec<Stage>) {
        (self.address, self.stages)
    }
}

/// A run that stopped before a verdict, with whatever it had reached.
pub(super) struct Aborted {
    pub(super) address: TargetAddress,
    pub(super) stages: Vec<Stage>,
    pub(super) error: InstallError,
}

impl<'a, T, S> From<(InstallRun<'a, T, S>, InstallError)> for Aborted {
    fn from((run, error): (InstallRun<'a, T, S>, InstallError)) -> Self {
        let (address, stages) = run.into_parts();
        Self {
            address,
            stages,
            error,
        }
    }
}
