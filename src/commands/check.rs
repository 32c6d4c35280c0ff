// ABOUTME: Check command implementation.
// ABOUTME: Runs discovery only and reports the winning strategy and host.

use riodeploy::config::Config;
use riodeploy::error::Result;
use riodeploy::output::{Output, OutputMode};

pub async fn check(config: &Config, output: &Output) -> Result<()> {
    let (_, address) = super::connect(config, output).await?;

    match output.mode() {
        OutputMode::Json => {
            if let Ok(json) = serde_json::to_string(&address) {
                println!("{json}");
            }
        }
        _ => output.success(&format!(
            "roboRIO for team {} reachable via {} at {}",
            config.team, address.strategy, address.host
        )),
    }
    Ok(())
}
