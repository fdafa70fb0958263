//! CLI entry and dispatch.

use std::fmt;

use anyhow::{Context, Result};
use clap::Parser;
use jump_core::config::Config;
use jump_core::logging;

mod commands;

#[derive(Parser)]
#[command(name = "j")]
#[command(version)]
#[command(about = "Jump to previously visited directories by name")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record the current directory
    AddCwd,
    /// Print every recorded key
    ListAllKeys,
    /// Print the directory for a key, asking when several match
    Select {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Interactively delete directories recorded under a key
    Prune {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the directories recorded under a key, most recent first
    List {
        #[arg(value_name = "KEY")]
        key: String,

        /// Also print when each directory was last visited
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the most recent directory for a key, or "." if there is none
    Resolve {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Drop directories that are gone, ignored, or not visited recently
    Clean {
        /// Also drop directories not visited for this many days
        #[arg(long, value_name = "DAYS", env = "J_MAX_AGE_DAYS")]
        max_age_days: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

/// Ends the process with exit code 1, optionally printing one line.
///
/// Used for expected outcomes such as an unknown key or a cancelled
/// selection, which are not faults.
#[derive(Debug)]
pub struct ExitFailure {
    message: Option<String>,
}

impl ExitFailure {
    pub fn silent() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for ExitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or("Failed"))
    }
}

impl std::error::Error for ExitFailure {}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return Ok(());
        }
        // Usage errors exit 1 like every other failure.
        Err(err) => {
            let _ = err.print();
            return Err(ExitFailure::silent().into());
        }
    };

    logging::init();
    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<()> {
    // Config commands must keep working when the config file is broken.
    let load = || Config::load().context("load config");

    match cli.command {
        Commands::AddCwd => commands::history::add_cwd(&load()?),
        Commands::ListAllKeys => commands::history::list_all_keys(&load()?),
        Commands::Select { key } => commands::interactive::select(&load()?, &key),
        Commands::Prune { key } => commands::interactive::prune(&load()?, &key),
        Commands::List { key, verbose } => commands::history::list(&load()?, &key, verbose),
        Commands::Resolve { key } => commands::history::resolve(&load()?, &key),
        Commands::Clean { max_age_days } => commands::history::clean(&load()?, max_age_days),

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
