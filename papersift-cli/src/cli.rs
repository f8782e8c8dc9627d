use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Filter a day's arXiv listing down to the papers worth reading.
#[derive(Parser, Debug)]
#[command(name = "papersift", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the title and abstract filters over a candidate file
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// TOML configuration file
    #[arg(short, long, env = "PAPERSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON array of candidate papers
    #[arg(long)]
    pub candidates: PathBuf,

    /// Directory holding the prompt files
    #[arg(long, default_value = "prompts")]
    pub prompts: PathBuf,

    /// Output root, overriding `output.output_path`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Verbose logging, including raw model output on parse failures
    #[arg(long)]
    pub debug: bool,
}
