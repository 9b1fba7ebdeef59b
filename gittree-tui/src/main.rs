use anyhow::Result;
use clap::Parser;
use gittree_tui::{run_ui, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive git branch tree", long_about = None)]
struct Args {
    /// Path to the Git repository
    #[arg(default_value = ".")]
    path: String,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logger
    env_logger::init();

    let config = Config::load(args.config.as_deref())?;
    run_ui(&args.path, &config.ui)?;

    Ok(())
}
