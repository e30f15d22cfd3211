use crate::config::{ReportConfig, DEFAULT_BRANCH, DEFAULT_RECENT_LIMIT};
use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

pub const USAGE: &str = "Usage: git-toolbox [manifest|changelog|check-wip]";
pub const INVALID_COMMAND: &str = "Invalid command. Use one of: manifest, changelog, check-wip";

#[derive(Parser)]
#[command(name = "git-toolbox")]
#[command(about = "Local git utilities for manifest, changelog, and WIP blocking")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(value_enum, ignore_case = true, help = "Operation to run")]
    pub command: Action,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Branch to report on", default_value = DEFAULT_BRANCH)]
    pub branch: String,

    #[arg(long, help = "Number of entries in the recent summaries", default_value_t = DEFAULT_RECENT_LIMIT)]
    pub recent_limit: usize,

    #[arg(long, help = "Document path (defaults to CHANGELOG.md / MANIFEST.md)")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Print the report as JSON instead of writing the document")]
    pub json: bool,

    #[arg(short, long, help = "Enable debug diagnostics on stderr")]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Write MANIFEST.md: tracked files and their add/delete history
    Manifest,
    /// Write CHANGELOG.md: commits grouped by date
    Changelog,
    /// Exit non-zero if any commit subject contains "WIP"
    CheckWip,
}

impl Cli {
    pub fn try_parse() -> std::result::Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }

    pub fn config(&self) -> ReportConfig {
        ReportConfig {
            repo: self.common.repo.clone(),
            ..ReportConfig::default()
        }
        .with_branch(self.common.branch.clone())
        .with_recent_limit(self.common.recent_limit)
    }

    pub fn execute(self) -> Result<ExitCode> {
        let config = self.config();
        debug!(action = ?self.command, ?config, "dispatching");
        let output = self.common.output.as_deref();

        match self.command {
            Action::Manifest => crate::manifest::exec(&config, output, self.common.json)?,
            Action::Changelog => crate::changelog::exec(&config, output, self.common.json)?,
            Action::CheckWip => {
                if crate::wip::exec(&config)?.is_blocked() {
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Report a command-line error on stdout. Every outcome other than a
/// dispatched operation exits 1, help and version included.
pub fn usage_failure(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => print!("{err}"),
        ErrorKind::InvalidValue => println!("{INVALID_COMMAND}"),
        _ => println!("{USAGE}"),
    }
    ExitCode::FAILURE
}

pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
