// ABOUTME: Install command implementation.
// ABOUTME: Runs the runtime install workflow and waits for its cleanup.

use riodeploy::config::Config;
use riodeploy::error::{Error, Result};
use riodeploy::install::{Installer, ZipBundle};
use riodeploy::output::{Output, Reporter};
use riodeploy::ssh::SshTransport;
use riodeploy::target::Target;
use std::path::Path;
use std::sync::Arc;

pub async fn install(config: Config, bundle: Option<&Path>, mut output: Output) -> Result<()> {
    let mut install = config.install()?.clone();
    if let Some(bundle) = bundle {
        install.bundle = bundle.to_path_buf();
    }

    let bundle = ZipBundle::new(&install.bundle, &install.extract_dir);
    let target = Arc::new(Target::with_settings(SshTransport, config.target_settings()));

    output.start_timer();
    let output = Arc::new(output);
    let reporter: Arc<dyn Reporter> = output.clone();

    let installer = Installer::new(target, reporter, install).with_timeout(config.timeout);
    let Some(mut report) = installer.install(config.team, &bundle).await else {
        output.warning("another install is already running");
        return Ok(());
    };

    if let Some(cleanup) = report.take_cleanup() {
        let diagnostics = cleanup.wait().await;
        for warning in diagnostics.warnings() {
            output.warning(&warning.message);
        }
    }

    let succeeded = report.succeeded();
    if let Some(error) = report.error {
        return Err(Error::Install(error));
    }
    if !succeeded {
        return Err(Error::VerificationFailed);
    }

    output.success("Runtime installed");
    Ok(())
}
