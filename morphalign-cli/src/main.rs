//! Entry point for the `morphalign` binary

use clap::{Parser, Subcommand};
use morphalign_cli::commands::{
    annotate::AnnotateArgs, check::CheckArgs, generate_config::GenerateConfigArgs,
};

/// Morphosyntactic token alignment and standoff annotation
#[derive(Parser)]
#[command(name = "morphalign", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a corpus of marked-up documents
    Annotate(AnnotateArgs),
    /// Validate analyzer outputs without writing documents
    Check(CheckArgs),
    /// Print a default configuration file
    GenerateConfig(GenerateConfigArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Annotate(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::GenerateConfig(args) => args.execute(),
    };
    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
