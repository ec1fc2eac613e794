use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cfr",
    about = "ConfigReplace: apply copy-config with replace semantics to a datastore",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty datastore file
    Init(InitArgs),
    /// Replace a datastore with another datastore or a configuration tree
    CopyConfig(CopyConfigArgs),
    /// Print the committed content of a datastore
    Show(ShowArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(long)]
    pub store: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CopyConfigArgs {
    #[arg(long)]
    pub store: PathBuf,
    #[arg(long)]
    pub target: String,
    /// Source datastore name
    #[arg(long, conflicts_with = "config_tree", required_unless_present = "config_tree")]
    pub source: Option<String>,
    /// JSON file with one top-level node or an array of them
    #[arg(long)]
    pub config_tree: Option<PathBuf>,
    /// Engine settings (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub store: PathBuf,
    #[arg(long, default_value = "running")]
    pub datastore: String,
}
