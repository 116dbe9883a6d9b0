//! TensorRT-LLM executor CLI
//!
//! # Commands
//!
//! - `generate`: run one request against an engine and print its results
//! - `config`: print the resolved executor configuration
//!
//! Exit code 0 on success, 1 on error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

/// Drive a TensorRT-LLM engine from the command line
#[derive(Parser)]
#[command(name = "trtllm")]
#[command(version)]
#[command(about = "Run requests against a TensorRT-LLM engine")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one request and print every result until the final one
    Generate(commands::generate::GenerateArgs),
    /// Print the executor configuration after applying file and environment
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Generate(args) => commands::generate::handle_generate(args),
        Commands::Config(args) => commands::config::handle_config(args),
    };

    std::process::exit(exit_code);
}
