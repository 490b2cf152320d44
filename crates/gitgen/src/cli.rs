use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gitgen",
    about = "Generate a git repository with a known history",
    version
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress human-readable output
    #[arg(long)]
    pub quiet: bool,

    /// Directory to generate the repository in (default: current directory)
    #[arg(long, short)]
    pub dir: Option<PathBuf>,

    /// Number of linear commits to generate when no config file is given
    #[arg(long, short, default_value = "3", conflicts_with = "file")]
    pub commits: u32,

    /// YAML, JSON or TOML file holding an event log
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Print the normalized commands without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
