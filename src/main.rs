use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gittree_tui::{run_ui, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod list;

#[derive(Parser, Debug)]
#[command(name = "gittree")]
#[command(
    about = "List branches of a git repository in a tree structure",
    long_about = "gittree visualizes git branches in a hierarchical tree structure,\n\
                  showing ancestor-descendant relationships between branches.\n\
                  The current HEAD branch is marked with an asterisk (*)."
)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, env = "GITTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List branches in a tree structure
    List {
        /// Path to the git repository
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Show the age of each branch tip
        #[arg(long)]
        age: bool,
    },
    /// Interactive branch tree UI
    Ui {
        /// Path to the git repository
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Commands::List { path, age } => {
            let show_age = age || config.list.show_age;
            list::run_list(&path, show_age, std::io::stdout().lock())?;
        }
        Commands::Ui { path } => {
            run_ui(&path.to_string_lossy(), &config.ui)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
