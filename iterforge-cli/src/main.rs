mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use iterforge::io::settings::{DEFAULT_SETTINGS_FILE, load_settings_with_env};

#[derive(Parser)]
#[command(name = "iterforge", version, about = "Create and inspect iterative generation runs")]
struct Cli {
    /// Settings file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision a new run and write its initial documents.
    New {
        task: String,
        #[arg(long)]
        max_iterations: Option<u32>,
        #[arg(long)]
        run_id: Option<String>,
    },
    /// List persisted runs.
    List,
    /// Show the summary of a persisted run.
    Show { run_id: String },
    /// Remove a run directory.
    Clean { run_id: String },
}

fn main() {
    iterforge::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings_with_env(&cli.config)?;
    match cli.command {
        Command::New {
            task,
            max_iterations,
            run_id,
        } => cli::new_run(&settings, task, max_iterations, run_id),
        Command::List => cli::list_runs(&settings),
        Command::Show { run_id } => cli::show_run(&settings, &run_id),
        Command::Clean { run_id } => cli::clean_run(&settings, &run_id),
    }
}
