//! CLI frontend for the Parlance interactive fiction engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "parlance",
    about = "Parlance — a natural-language interactive fiction engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a world interactively
    Play {
        /// World definition file (JSON)
        world: PathBuf,

        /// Skip the language model; only fixed command forms work
        #[arg(long)]
        offline: bool,

        /// Start in a named location instead of the declared start
        #[arg(short, long)]
        location: Option<String>,

        /// Seed for reproducible narration rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Mirror parser and narration traffic to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Feed a fixed list of commands to a fresh session
    Run {
        /// World definition file (JSON)
        world: PathBuf,

        /// Commands to run, in order
        commands: Vec<String>,

        /// Skip the language model; only fixed command forms work
        #[arg(long)]
        offline: bool,

        /// Seed for reproducible narration rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Mirror parser and narration traffic to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Validate a world definition and list its entities
    World {
        /// World definition file (JSON)
        world: PathBuf,

        /// Print the validated definition back out as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            world,
            offline,
            location,
            seed,
            trace,
        } => commands::play::run(&world, offline, location.as_deref(), seed, trace).await,
        Commands::Run {
            world,
            commands: inputs,
            offline,
            seed,
            trace,
        } => commands::run::run(&world, &inputs, offline, seed, trace).await,
        Commands::World { world, json } => commands::world::run(&world, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
