// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use riodeploy::output::OutputMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "riodeploy")]
#[command(about = "Find, command, and install runtimes onto a roboRIO over SSH")]
#[command(version)]
pub struct Cli {
    /// Show every command and file as it is sent
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Team number (overrides riodeploy.yml)
    #[arg(short, long, global = true, env = "RIODEPLOY_TEAM")]
    pub team: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new riodeploy.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Find the roboRIO and report how it was reached
    Check,

    /// Run shell commands on the roboRIO, in order
    Exec {
        /// Run as admin instead of lvuser
        #[arg(long)]
        admin: bool,

        /// Each argument is one complete command
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Copy local files into a remote directory
    Push {
        #[arg(long)]
        admin: bool,

        /// Remote destination directory
        #[arg(short, long)]
        dest: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Copy one remote file to a local path
    Pull {
        #[arg(long)]
        admin: bool,

        remote: String,

        local: PathBuf,
    },

    /// Install the runtime bundle onto the roboRIO
    Install {
        /// Bundle archive (overrides install.bundle)
        #[arg(short, long)]
        bundle: Option<PathBuf>,
    },
}
