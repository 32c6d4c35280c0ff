// ABOUTME: Test support utilities.
// ABOUTME: In-memory roboRIO transport, a recording reporter, and bundle fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use riodeploy::install::{Bundle, InstallError};
use riodeploy::output::Reporter;
use riodeploy::ssh::{self, CommandOutput, RemoteSession, SessionConfig, SessionKind, Transport};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("riodeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const TEAM: u32 = 1234;
pub const MDNS_HOST: &str = "roborio-1234-FRC.local";
pub const USB_HOST: &str = "172.22.11.2";
pub const SUBNET_HOST: &str = "10.12.34.2";

/// How a mock host answers a connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBehavior {
    Reachable,
    Refused,
    /// Hangs for the full connect timeout.
    Timeout,
    AuthRejected,
    /// Fails with a transport error that is not unreachability.
    Broken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRecord {
    pub host: String,
    pub user: String,
    pub kind: SessionKind,
}

#[derive(Default)]
struct MockState {
    hosts: HashMap<String, HostBehavior>,
    connect_delay: Option<Duration>,
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    installed: Vec<String>,
    connects: Vec<ConnectRecord>,
    commands: Vec<String>,
    uploads: Vec<String>,
    disconnects: usize,
    failing: HashSet<String>,
    exit_codes: HashMap<String, u32>,
}

/// A fake controller that interprets the handful of shell commands deploys use.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target answering only on its mDNS name.
    pub fn reachable_via_mdns() -> Self {
        Self::new().with_host(MDNS_HOST, HostBehavior::Reachable)
    }

    pub fn with_host(self, host: &str, behavior: HostBehavior) -> Self {
        self.set_host(host, behavior);
        self
    }

    pub fn set_host(&self, host: &str, behavior: HostBehavior) {
        self.state.lock().hosts.insert(host.to_string(), behavior);
    }

    /// Delay every connect by `delay` before it resolves.
    pub fn set_connect_delay(&self, delay: Duration) {
        self.state.lock().connect_delay = Some(delay);
    }

    pub fn add_dir(&self, dir: &str) {
        self.state.lock().dirs.insert(dir.to_string());
    }

    pub fn add_file(&self, path: &str, contents: &[u8]) {
        self.state
            .lock()
            .files
            .insert(path.to_string(), contents.to_vec());
    }

    /// Make `command` break the channel instead of running.
    pub fn fail_command(&self, command: &str) {
        self.state.lock().failing.insert(command.to_string());
    }

    /// Make `command` exit with `code` and no output.
    pub fn set_exit_code(&self, command: &str, code: u32) {
        self.state
            .lock()
            .exit_codes
            .insert(command.to_string(), code);
    }

    pub fn connects(&self) -> Vec<ConnectRecord> {
        self.state.lock().connects.clone()
    }

    pub fn connected_hosts(&self) -> Vec<String> {
        self.connects().into_iter().map(|c| c.host).collect()
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.state.lock().uploads.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().disconnects
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    pub fn has_dir(&self, dir: &str) -> bool {
        self.state.lock().dirs.contains(dir)
    }

    pub fn installed(&self) -> Vec<String> {
        self.state.lock().installed.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Session = MockSession;

    async fn connect(&self, config: &SessionConfig, kind: SessionKind) -> ssh::Result<MockSession> {
        let (behavior, delay) = {
            let mut state = self.state.lock();
            state.connects.push(ConnectRecord {
                host: config.host.clone(),
                user: config.user.clone(),
                kind,
            });
            (state.hosts.get(&config.host).copied(), state.connect_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match behavior {
            Some(HostBehavior::Reachable) => Ok(MockSession {
                state: Arc::clone(&self.state),
            }),
            Some(HostBehavior::Refused) | None => Err(ssh::Error::Unreachable {
                host: config.host.clone(),
                reason: "connection refused".to_string(),
            }),
            Some(HostBehavior::Timeout) => {
                tokio::time::sleep(config.connect_timeout).await;
                Err(ssh::Error::ConnectTimeout {
                    host: config.host.clone(),
                    timeout: config.connect_timeout,
                })
            }
            Some(HostBehavior::AuthRejected) => Err(ssh::Error::AuthenticationFailed {
                user: config.user.clone(),
            }),
            Some(HostBehavior::Broken) => Err(ssh::Error::ChannelClosed),
        }
    }
}

pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl RemoteSession for MockSession {
    async fn exec(&mut self, command: &str) -> ssh::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.commands.push(command.to_string());

        if state.failing.contains(command) {
            return Err(ssh::Error::ChannelClosed);
        }
        if let Some(code) = state.exit_codes.get(command) {
            return Ok(CommandOutput {
                exit_code: *code,
                ..Default::default()
            });
        }

        Ok(interpret(&mut state, command))
    }

    async fn upload(&mut self, remote_path: &str, name: &str, contents: &[u8]) -> ssh::Result<()> {
        let mut state = self.state.lock();

        let dest = if state.dirs.contains(remote_path) {
            format!("{}/{}", remote_path.trim_end_matches('/'), name)
        } else if state.dirs.contains(parent(remote_path)) {
            remote_path.to_string()
        } else {
            return Err(ssh::Error::Scp(format!(
                "{remote_path}: No such file or directory"
            )));
        };

        state.uploads.push(dest.clone());
        state.files.insert(dest, contents.to_vec());
        Ok(())
    }

    async fn download(&mut self, remote_path: &str) -> ssh::Result<Vec<u8>> {
        self.state
            .lock()
            .files
            .get(remote_path)
            .cloned()
            .ok_or_else(|| ssh::Error::Scp(format!("{remote_path}: No such file or directory")))
    }

    async fn disconnect(self) -> ssh::Result<()> {
        self.state.lock().disconnects += 1;
        Ok(())
    }
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => ".",
    }
}

fn output(exit_code: u32, stdout: impl Into<String>) -> CommandOutput {
    CommandOutput {
        exit_code,
        stdout: stdout.into(),
        stderr: String::new(),
    }
}

fn interpret(state: &mut MockState, command: &str) -> CommandOutput {
    let words: Vec<&str> = command.split_whitespace().collect();

    match words.as_slice() {
        ["echo", rest @ ..] => output(0, format!("{}\n", rest.join(" "))),
        ["mkdir", "-p", dir] => {
            state.dirs.insert(dir.to_string());
            output(0, "")
        }
        ["rm", "-rf", dir] => {
            let prefix = format!("{dir}/");
            state.dirs.remove(*dir);
            state.files.retain(|path, _| !path.starts_with(&prefix));
            output(0, "")
        }
        ["opkg", "install", pattern] => {
            let Some(dir) = pattern.strip_suffix("/*.ipk") else {
                return output(1, "");
            };
            let prefix = format!("{dir}/");
            let packages: Vec<String> = state
                .files
                .keys()
                .filter_map(|path| path.strip_prefix(&prefix))
                .filter_map(|name| name.strip_suffix(".ipk"))
                .map(str::to_string)
                .collect();
            if packages.is_empty() {
                return output(1, "");
            }
            for package in packages {
                if !state.installed.contains(&package) {
                    state.installed.push(package);
                }
            }
            output(0, "")
        }
        ["opkg", "list-installed", "|", "grep", needle] => {
            let matches: Vec<&String> = state
                .installed
                .iter()
                .filter(|p| p.contains(needle))
                .collect();
            let listing: String = matches.iter().map(|p| format!("{p} - 1.0\n")).collect();
            output(if matches.is_empty() { 1 } else { 0 }, listing)
        }
        ["setcap", ..] => output(0, ""),
        _ => CommandOutput {
            exit_code: 127,
            stdout: String::new(),
            stderr: format!("sh: {}: not found\n", words.first().unwrap_or(&"")),
        },
    }
}

/// Reporter that keeps everything it is told.
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
    labels: Mutex<Vec<String>>,
    verbose: bool,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().clone()
    }

    pub fn has_line(&self, line: &str) -> bool {
        self.lines.lock().iter().any(|l| l == line)
    }
}

impl Reporter for RecordingReporter {
    fn line(&self, message: &str) {
        self.lines.lock().push(message.to_string());
    }

    fn label(&self, label: &str) {
        self.labels.lock().push(label.to_string());
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

/// A bundle whose files already exist, optionally taking a while to "extract".
pub struct ReadyBundle {
    pub files: Vec<PathBuf>,
    pub delay: Duration,
}

impl ReadyBundle {
    /// Write `names` into `dir` and hand them out in order.
    pub fn create(dir: &Path, names: &[&str]) -> Self {
        let files = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();
        Self {
            files,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Bundle for ReadyBundle {
    async fn extract(&self) -> Result<Vec<PathBuf>, InstallError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.files.clone())
    }
}

/// A bundle that always fails to extract.
pub struct BrokenBundle;

#[async_trait]
impl Bundle for BrokenBundle {
    async fn extract(&self) -> Result<Vec<PathBuf>, InstallError> {
        Err(InstallError::Extraction {
            path: PathBuf::from("broken.zip"),
            reason: "invalid Zip archive".to_string(),
        })
    }
}

/// Write a zip archive holding `entries`.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}
