use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use panel_core::MAX_RECORDS_PER_GROUP;

#[derive(Parser, Debug)]
#[command(
    name = "pension-panel",
    version,
    about = "Control panel for the pension data generation service"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./pension-panel.ron if present)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Base URL of the generation service")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "Directory where generated artifacts are saved")]
    pub output_dir: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "More log output (-v, -vv)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rule counts, environment and files.
    Dashboard,
    Rules {
        #[command(subcommand)]
        command: RuleCommands,
    },
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
    /// List generated files known to the service.
    Files,
    /// Interactive session; type `help` for commands.
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    List,
    /// Turn a rule on or off.
    Set {
        name: String,
        #[arg(value_enum)]
        state: Switch,
    },
    /// Restore every rule to its default value.
    Reset {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommands {
    /// Single CSV for a contiguous id range.
    Csv {
        #[arg(long, default_value_t = 1)]
        start: u64,
        #[arg(long, default_value_t = 100)]
        end: u64,
    },
    /// ZIP bundle split into groups.
    Bundle {
        #[arg(long, default_value_t = 1000)]
        total: u64,
        #[arg(
            long,
            default_value_t = 100,
            value_parser = clap::value_parser!(u32).range(1..=MAX_RECORDS_PER_GROUP as i64)
        )]
        per_group: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}
