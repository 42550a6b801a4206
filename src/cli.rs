use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::numbering::write::Strategy;
use crate::runner::RunOptions;

#[derive(Parser, Debug)]
#[command(
    name = "tasknum",
    version,
    about = "Number ClickUp epics (10, 20, 30, ...) and their tasks (10.1, 10.2, ...)"
)]
pub struct Cli {
    /// ClickUp API token
    #[arg(long, global = true, env = "CLICKUP_API_KEY", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Config file (defaults to ~/.tasknum/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the numbering into a custom field
    Fields {
        #[command(flatten)]
        target: Target,
        /// Custom field to update (default: PM.Prio)
        #[arg(long)]
        field_name: Option<String>,
    },
    /// Prefix each task name with its number, replacing any previous number
    Names {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args, Debug)]
pub struct Target {
    /// The ClickUp list ID to process
    #[arg(long)]
    pub list_id: String,
    /// Preview changes without applying them
    #[arg(long)]
    pub dry_run: bool,
}

impl Command {
    pub fn run_options(self, config: &AppConfig) -> RunOptions {
        let (target, strategy) = match self {
            Command::Fields { target, field_name } => (
                target,
                Strategy::CustomField {
                    field_name: config.field_name(field_name),
                },
            ),
            Command::Names { target } => (target, Strategy::Name),
        };
        RunOptions {
            list_id: target.list_id,
            strategy,
            dry_run: target.dry_run,
        }
    }
}
