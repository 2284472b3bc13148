mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, init, new, outline, types, validate, ApplyArgs, InitArgs, NewArgs, OutlineArgs,
    TypesArgs, ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagekit CLI - inspect and edit block-tree page documents
#[derive(Parser, Debug)]
#[command(name = "pagekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a pagekit.config.json
    Init(InitArgs),

    /// List the available block types
    Types(TypesArgs),

    /// Check page documents for parse errors and duplicate ids
    Validate(ValidateArgs),

    /// Print the block tree of a page
    Outline(OutlineArgs),

    /// Run an edit script against a page
    Apply(ApplyArgs),

    /// Print a fresh block as JSON
    New(NewArgs),
}

fn main() {
    // Logs go to stderr so JSON output stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!(
                "{} Cannot get current directory: {}",
                "Error:".red().bold(),
                err
            );
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Types(args) => types(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Outline(args) => outline(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::New(args) => new(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
