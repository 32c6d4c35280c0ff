// ABOUTME: Config scaffolding for new robot projects.
// ABOUTME: Creates riodeploy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::TeamNumber;

use super::{CONFIG_FILENAME, Config, InstallConfig};

pub fn init_config(dir: &Path, team: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(t) = team {
        config.team = TeamNumber::parse_lenient(t);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let default_install = InstallConfig::template();
    let install = config.install.as_ref().unwrap_or(&default_install);
    format!(
        r#"team: {}
# Per-address connect timeout while searching for the roboRIO
timeout: {}s
install:
  bundle: {}
  remote_dir: {}
  # install_command: opkg install {}/*.ipk
  verify_command: "{}"
  runtime_binary: {}
  connect_deadline: {}s
"#,
        config.team,
        config.timeout.as_secs(),
        install.bundle.display(),
        install.remote_dir,
        install.remote_dir,
        install.verify_command,
        install.runtime_binary,
        install.connect_deadline.as_secs(),
    )
}
