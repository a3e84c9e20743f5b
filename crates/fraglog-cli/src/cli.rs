use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fraglog",
    about = "Collect changelog fragments into CHANGELOG.md",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (default: ./fraglog.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new fragment from the template
    New(NewArgs),
    /// Merge pending fragments into the changelog
    Generate(GenerateArgs),
    /// Show pending fragments
    List(ListArgs),
    /// Validate fragments and the changelog
    Check(CheckArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Author written into the fragment header
    #[arg(short, long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Preview the merge without writing, deleting, or committing
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub debug: Option<bool>,
    /// Commit author email
    #[arg(long)]
    pub user: Option<String>,
    /// Commit author name
    #[arg(long)]
    pub name: Option<String>,
    /// Commit without pushing
    #[arg(long)]
    pub no_push: bool,
    /// Leave malformed fragments behind instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct CheckArgs {}
