// ABOUTME: Runs discovery and bundle extraction side by side under one deadline.
// ABOUTME: Extraction failure wins immediately; the deadline only bounds the connect.

use super::bundle::Bundle;
use super::error::InstallError;
use crate::output::Reporter;
use crate::ssh::Transport;
use crate::target::{self, Target};
use crate::types::{TargetAddress, TeamNumber};
use std::path::PathBuf;
use std::time::Duration;

/// Connect to the target while the bundle unpacks.
///
/// The deadline timer starts on entry. A connect result that arrived before
/// the deadline is honored even if extraction finished later.
pub(super) async fn join<T, B>(
    target: &Target<T>,
    reporter: &dyn Reporter,
    team: TeamNumber,
    timeout: Duration,
    deadline: Duration,
    bundle: &B,
) -> Result<(TargetAddress, Vec<PathBuf>), InstallError>
where
    T: Transport,
    B: Bundle + ?Sized,
{
    let timer = tokio::time::sleep(deadline);
    tokio::pin!(timer);

    let discoverer = target.discoverer(reporter);
    let connect = discoverer.discover(team, timeout);
    tokio::pin!(connect);

    let extract = bundle.extract();
    tokio::pin!(extract);

    let mut connected: Option<target::Result<Option<TargetAddress>>> = None;
    let files = loop {
        tokio::select! {
            biased;
            result = &mut connect, if connected.is_none() => {
                tracing::debug!("connect finished before extraction");
                connected = Some(result);
            }
            files = &mut extract => match files {
                Ok(files) => break files,
                Err(e) => {
                    target.sessions().clear();
                    return Err(e);
                }
            },
        }
    };

    reporter.line("Waiting for connection to finish");

    let result = match connected {
        Some(result) => result,
        None => tokio::select! {
            biased;
            result = &mut connect => result,
            () = &mut timer => {
                tracing::debug!("connect deadline of {:?} passed", deadline);
                // Discovery is dropped mid-probe and never gets to reset the slots.
                target.sessions().clear();
                return Err(InstallError::ConnectTimeout);
            }
        },
    };

    match result? {
        Some(address) => Ok((address, files)),
        None => Err(InstallError::ConnectFailed),
    }
}
