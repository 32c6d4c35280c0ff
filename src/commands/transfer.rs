// ABOUTME: Push and pull command implementations.
// ABOUTME: Copies files between this machine and the roboRIO over SCP.

use riodeploy::config::Config;
use riodeploy::error::{Error, Result};
use riodeploy::output::Output;
use std::path::{Path, PathBuf};

pub async fn push(
    config: &Config,
    files: &[PathBuf],
    dest: &str,
    admin: bool,
    output: &Output,
) -> Result<()> {
    let missing: Vec<_> = files.iter().filter(|f| !f.is_file()).collect();
    for file in &missing {
        output.warning(&format!("skipping {}: not a file", file.display()));
    }

    let (target, _) = super::connect(config, output).await?;
    let sent = target
        .transferer(output)
        .upload_files(files, dest, super::role(admin))
        .await?;

    if !sent {
        return Err(Error::TransferFailed(format!("could not open a copy session for {dest}")));
    }

    output.success(&format!(
        "Copied {} file(s) to {}",
        files.len() - missing.len(),
        dest
    ));
    Ok(())
}

pub async fn pull(
    config: &Config,
    remote: &str,
    local: &Path,
    admin: bool,
    output: &Output,
) -> Result<()> {
    let (target, _) = super::connect(config, output).await?;

    let mut buffer = Vec::new();
    let received = target
        .transferer(output)
        .download_file(remote, &mut buffer, super::role(admin))
        .await?;

    if !received {
        return Err(Error::TransferFailed(format!("could not download {remote}")));
    }

    tokio::fs::write(local, &buffer).await?;
    output.success(&format!("Copied {} to {}", remote, local.display()));
    Ok(())
}
