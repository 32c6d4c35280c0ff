// ABOUTME: Command module aggregator for the riodeploy CLI.
// ABOUTME: Re-exports handlers and the shared find-the-target step.

mod check;
mod exec;
mod install;
mod transfer;

pub use check::check;
pub use exec::exec_command;
pub use install::install;
pub use transfer::{pull, push};

use riodeploy::config::Config;
use riodeploy::error::{Error, Result};
use riodeploy::output::Output;
use riodeploy::ssh::SshTransport;
use riodeploy::target::{Role, Target};
use riodeploy::types::TargetAddress;

/// Discover the roboRIO for the configured team.
async fn connect(config: &Config, output: &Output) -> Result<(Target<SshTransport>, TargetAddress)> {
    let target = Target::with_settings(SshTransport, config.target_settings());
    let address = target
        .discoverer(output)
        .discover(config.team, config.timeout)
        .await?
        .ok_or(Error::TargetNotFound(config.team))?;

    output.progress(&format!("Connected to {address}"));
    Ok((target, address))
}

fn role(admin: bool) -> Role {
    if admin { Role::Admin } else { Role::Service }
}
