// ABOUTME: Runs shell commands on the target under a chosen role.
// ABOUTME: One session per call; batches share a session and keep command order.

use super::credentials::Role;
use super::error::Result;
use super::{Target, close};
use crate::output::Reporter;
use crate::ssh::{CommandOutput, RemoteSession, SessionKind, Transport};
use serde::Serialize;
use std::collections::HashMap;

/// Outcome of one remote command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub output: String,
    pub stderr: String,
    pub exit_code: u32,
    pub success: bool,
}

impl CommandResult {
    fn new(command: &str, output: CommandOutput) -> Self {
        Self {
            command: command.to_string(),
            success: output.success(),
            exit_code: output.exit_code,
            output: output.stdout,
            stderr: output.stderr,
        }
    }
}

pub struct CommandExecutor<'a, T> {
    target: &'a Target<T>,
    reporter: &'a dyn Reporter,
}

impl<'a, T: Transport> CommandExecutor<'a, T> {
    pub(super) fn new(target: &'a Target<T>, reporter: &'a dyn Reporter) -> Self {
        Self { target, reporter }
    }

    /// Run one command. `None` means the target could not be reached.
    pub async fn run_command(&self, command: &str, role: Role) -> Result<Option<CommandResult>> {
        let Some(mut session) = self.target.open(role, SessionKind::Exec).await? else {
            return Ok(None);
        };

        let result = self.exec(&mut session, command).await;
        close(session).await;
        result.map(Some)
    }

    /// Run commands in order over one session, keyed by command text.
    ///
    /// A repeated command keeps its last result. Errors after the connect
    /// propagate; the remaining commands are not run.
    pub async fn run_commands<S: AsRef<str>>(
        &self,
        commands: &[S],
        role: Role,
    ) -> Result<Option<HashMap<String, CommandResult>>> {
        let Some(mut session) = self.target.open(role, SessionKind::Exec).await? else {
            return Ok(None);
        };

        let mut results = HashMap::with_capacity(commands.len());
        for command in commands {
            let command = command.as_ref();
            match self.exec(&mut session, command).await {
                Ok(result) => {
                    results.insert(command.to_string(), result);
                }
                Err(e) => {
                    close(session).await;
                    return Err(e);
                }
            }
        }

        close(session).await;
        Ok(Some(results))
    }

    async fn exec(&self, session: &mut T::Session, command: &str) -> Result<CommandResult> {
        self.reporter.detail(&format!("Running command: {command}"));
        let output = session.exec(command).await?;
        if !output.success() {
            tracing::debug!(
                "`{}` exited with {}: {}",
                command,
                output.exit_code,
                output.stderr.trim()
            );
        }
        Ok(CommandResult::new(command, output))
    }
}
