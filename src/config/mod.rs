// ABOUTME: Configuration types and parsing for riodeploy.yml.
// ABOUTME: Handles YAML parsing, lenient team numbers, and file discovery.

mod deserialize;
mod init;
mod install;

pub use init::init_config;
pub use install::InstallConfig;

use crate::error::{Error, Result};
use crate::target::TargetSettings;
use crate::types::TeamNumber;
use deserialize::deserialize_team;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "riodeploy.yml";
pub const CONFIG_FILENAME_ALT: &str = "riodeploy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".riodeploy/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "deserialize_team")]
    pub team: TeamNumber,

    /// Per-candidate discovery timeout, reused for every later connect.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub install: Option<InstallConfig>,
}

fn default_timeout() -> Duration {
    crate::target::DEFAULT_TIMEOUT
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_port() -> u16 {
    22
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Discover a config file, falling back to defaults when there is none.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn target_settings(&self) -> TargetSettings {
        TargetSettings {
            port: self.port,
            command_timeout: self.command_timeout,
        }
    }

    /// The install section, or an error naming what is missing.
    pub fn install(&self) -> Result<&InstallConfig> {
        self.install
            .as_ref()
            .ok_or_else(|| Error::InvalidConfig("missing `install` section".to_string()))
    }

    pub fn template() -> Self {
        Config {
            team: TeamNumber::new(0),
            install: Some(InstallConfig::template()),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            team: TeamNumber::default(),
            timeout: default_timeout(),
            command_timeout: default_command_timeout(),
            port: default_port(),
            verbose: false,
            install: None,
        }
    }
}
