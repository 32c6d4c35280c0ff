// ABOUTME: Install workflow settings: local bundle, remote staging dir, and commands.
// ABOUTME: Defaults match the stock opkg layout on the controller.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    /// Zip archive holding the packages to install.
    pub bundle: PathBuf,

    /// Local directory the bundle is unpacked into.
    #[serde(default = "default_extract_dir")]
    pub extract_dir: PathBuf,

    /// Remote staging directory, created before upload and removed afterwards.
    #[serde(default = "default_remote_dir")]
    pub remote_dir: String,

    /// Defaults to installing every `.ipk` in `remote_dir`.
    #[serde(default)]
    pub install_command: Option<String>,

    #[serde(default = "default_verify_command")]
    pub verify_command: String,

    /// Substring the verify output must contain, on top of a zero exit.
    #[serde(default)]
    pub verify_expect: Option<String>,

    /// Installed binary that gets the realtime capability.
    #[serde(default = "default_runtime_binary")]
    pub runtime_binary: String,

    /// Overall bound on discovery while the bundle unpacks.
    #[serde(default = "default_connect_deadline", with = "humantime_serde")]
    pub connect_deadline: Duration,
}

fn default_extract_dir() -> PathBuf {
    PathBuf::from("build/runtime")
}

fn default_remote_dir() -> String {
    "/home/admin/opkg".to_string()
}

fn default_verify_command() -> String {
    "opkg list-installed | grep mono".to_string()
}

fn default_runtime_binary() -> String {
    "/usr/bin/mono-sgen".to_string()
}

fn default_connect_deadline() -> Duration {
    Duration::from_secs(10)
}

impl InstallConfig {
    pub fn new(bundle: impl Into<PathBuf>) -> Self {
        Self {
            bundle: bundle.into(),
            extract_dir: default_extract_dir(),
            remote_dir: default_remote_dir(),
            install_command: None,
            verify_command: default_verify_command(),
            verify_expect: None,
            runtime_binary: default_runtime_binary(),
            connect_deadline: default_connect_deadline(),
        }
    }

    pub fn install_command(&self) -> String {
        self.install_command
            .clone()
            .unwrap_or_else(|| format!("opkg install {}/*.ipk", self.remote_dir))
    }

    pub fn mkdir_command(&self) -> String {
        format!("mkdir -p {}", self.remote_dir)
    }

    pub fn remove_dir_command(&self) -> String {
        format!("rm -rf {}", self.remote_dir)
    }

    pub fn realtime_command(&self) -> String {
        format!("setcap cap_sys_nice=pe {}", self.runtime_binary)
    }

    /// Whether a verify run's output counts as installed.
    pub fn verified(&self, output: &str) -> bool {
        match &self.verify_expect {
            Some(expect) => output.contains(expect.as_str()),
            None => true,
        }
    }

    pub(super) fn template() -> Self {
        Self::new("mono.zip")
    }
}
