mod cmd;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use xaccess_lib::manager::Operation;

use crate::config::UnitArgs;
use crate::output::print_error;

/// xa - cross-account resource policy manager
#[derive(Parser)]
#[command(name = "xa")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(flatten)]
  unit: UnitArgs,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Summarize the roles and managers a configuration declares
  Plan {
    /// Path to the configuration file
    #[arg(default_value = "init.lua")]
    file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
  },

  /// Write the evaluated manifest as JSON
  Synth {
    /// Path to the configuration file
    #[arg(default_value = "init.lua")]
    file: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Deliver one lifecycle operation for every manager to the local recording agent
  Dispatch {
    /// Path to the configuration file
    #[arg(default_value = "init.lua")]
    file: PathBuf,

    /// Lifecycle operation: create, update, or delete
    #[arg(long)]
    operation: Operation,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = 4)]
    parallelism: usize,

    /// Print the delivered requests as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Plan { file, json } => cmd::cmd_plan(&file, &cli.unit, cli.verbose, json),
    Commands::Synth { file, output } => cmd::cmd_synth(&file, &cli.unit, output.as_deref()),
    Commands::Dispatch {
      file,
      operation,
      parallelism,
      json,
    } => cmd::cmd_dispatch(&file, &cli.unit, operation, parallelism, json),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
