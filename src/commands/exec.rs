// ABOUTME: Exec command implementation.
// ABOUTME: Runs one command, or several over a single session, on the roboRIO.

use riodeploy::config::Config;
use riodeploy::error::{Error, Result};
use riodeploy::output::{Output, OutputMode};
use riodeploy::target::CommandResult;
use std::collections::HashMap;

/// Run `commands` in order and print each result.
pub async fn exec_command(
    config: &Config,
    commands: &[String],
    admin: bool,
    output: &Output,
) -> Result<()> {
    let (target, _) = super::connect(config, output).await?;
    let executor = target.executor(output);
    let role = super::role(admin);

    let results = match commands {
        [command] => executor
            .run_command(command, role)
            .await?
            .map(|result| vec![result]),
        _ => executor
            .run_commands(commands, role)
            .await?
            .map(|by_command| in_command_order(commands, by_command)),
    };
    let results = results.ok_or(Error::TargetUnreachable)?;

    for result in &results {
        print_result(result, output);
    }

    match results.iter().find(|r| !r.success) {
        Some(failed) => Err(Error::CommandFailed {
            command: failed.command.clone(),
            exit_code: failed.exit_code,
        }),
        None => Ok(()),
    }
}

/// Order batch results by where each command first appears.
///
/// A repeated command runs every time but shows once, with its last result.
fn in_command_order(
    commands: &[String],
    mut by_command: HashMap<String, CommandResult>,
) -> Vec<CommandResult> {
    commands
        .iter()
        .filter_map(|command| by_command.remove(command))
        .collect()
}

fn print_result(result: &CommandResult, output: &Output) {
    match output.mode() {
        OutputMode::Json => {
            if let Ok(json) = serde_json::to_string(result) {
                println!("{json}");
            }
        }
        _ => {
            print!("{}", result.output);
            eprint!("{}", result.stderr);
        }
    }
}
