// ABOUTME: SSH session management using russh.
// ABOUTME: Handles bounded connect, empty-password auth, and command execution.

use super::error::{Error, Result};
use russh::client::{self, Config, Handle, KeyboardInteractiveAuthResponse, Msg};
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect};
use std::sync::Arc;
use std::time::Duration;

/// Keyboard-interactive rounds before giving up on a chatty server.
const MAX_INTERACTIVE_ROUNDS: usize = 8;

/// Answers keyboard-interactive prompts with a fixed password.
///
/// Prompts that ask for a password (case-insensitive `Password:`) get the
/// password; anything else gets an empty answer so the round still carries
/// one response per prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptResponder {
    password: String,
}

impl PromptResponder {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn respond<'a>(&self, prompts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        prompts
            .into_iter()
            .map(|prompt| {
                if prompt.to_ascii_lowercase().contains("password:") {
                    self.password.clone()
                } else {
                    String::new()
                }
            })
            .collect()
    }
}

/// Configuration for establishing an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host to connect to.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username for authentication.
    pub user: String,
    /// Answers password and keyboard-interactive challenges.
    pub responder: PromptResponder,
    /// Bound on TCP connect plus authentication.
    pub connect_timeout: Duration,
    /// Timeout for command execution (default: 5 minutes).
    pub command_timeout: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            responder: PromptResponder::default(),
            connect_timeout: Duration::from_secs(2),
            command_timeout: Duration::from_secs(300),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.responder = PromptResponder::new(password);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// Output from a remote command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// SSH client handler for russh.
///
/// The controller regenerates its host key on every reimage, so keys are
/// accepted and logged rather than pinned.
pub(crate) struct TargetHandler {
    host: String,
}

impl client::Handler for TargetHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        tracing::debug!(
            "accepting host key {} for {}",
            server_public_key.algorithm(),
            self.host
        );
        Ok(true)
    }
}

/// An established SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<TargetHandler>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

impl Session {
    /// Connect and authenticate, bounded by `config.connect_timeout`.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        match tokio::time::timeout(config.connect_timeout, Self::establish(&config)).await {
            Ok(Ok(handle)) => Ok(Self { config, handle }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::ConnectTimeout {
                host: config.host.clone(),
                timeout: config.connect_timeout,
            }),
        }
    }

    async fn establish(config: &SessionConfig) -> Result<Handle<TargetHandler>> {
        let russh_config = Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let handler = TargetHandler {
            host: config.host.clone(),
        };

        let mut handle = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            handler,
        )
        .await
        .map_err(|e| match e {
            russh::Error::IO(io) => Error::Unreachable {
                host: config.host.clone(),
                reason: io.to_string(),
            },
            other => Error::Protocol(other),
        })?;

        if !Self::authenticate(&mut handle, config).await? {
            return Err(Error::AuthenticationFailed {
                user: config.user.clone(),
            });
        }

        Ok(handle)
    }

    /// Try plain password auth first, then answer keyboard-interactive prompts.
    async fn authenticate(handle: &mut Handle<TargetHandler>, config: &SessionConfig) -> Result<bool> {
        let result = handle
            .authenticate_password(config.user.as_str(), config.responder.password())
            .await?;
        if result.success() {
            return Ok(true);
        }

        let mut response = handle
            .authenticate_keyboard_interactive_start(config.user.as_str(), None::<String>)
            .await?;

        for _ in 0..MAX_INTERACTIVE_ROUNDS {
            match response {
                KeyboardInteractiveAuthResponse::Success => return Ok(true),
                KeyboardInteractiveAuthResponse::Failure { .. } => return Ok(false),
                KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => {
                    let answers = config
                        .responder
                        .respond(prompts.iter().map(|p| p.prompt.as_str()));
                    response = handle
                        .authenticate_keyboard_interactive_respond(answers)
                        .await?;
                }
            }
        }

        Ok(false)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Execute a command on the remote host.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.exec_with_timeout(command, self.config.command_timeout)
            .await
    }

    /// Execute a command with a custom timeout.
    pub async fn exec_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        match tokio::time::timeout(timeout, self.exec_inner(command)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn exec_inner(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self.open_exec(command).await?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = 0u32;

        let mut got_exit_status = false;
        let mut got_eof = false;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == 1 {
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    exit_code = exit_status;
                    got_exit_status = true;
                    if got_eof {
                        break;
                    }
                }
                Some(ChannelMsg::Eof) => {
                    got_eof = true;
                    if got_exit_status {
                        break;
                    }
                }
                Some(ChannelMsg::Close) => {
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        // No exit status means the link dropped mid-command.
        if !got_exit_status {
            return Err(Error::ChannelClosed);
        }

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
        })
    }

    /// Open a session channel running `command`, leaving the data stream to the caller.
    pub(crate) async fn open_exec(&self, command: &str) -> Result<Channel<Msg>> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to exec command: {}", e)))?;

        Ok(channel)
    }

    /// Disconnect the session.
    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)?;
        Ok(())
    }
}
