//! CLI frontend for the Tilequest text-adventure engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tq",
    about = "Tilequest: a tile-based text adventure engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a data directory with a sample game, realm and plugin manifest
    Init {
        /// Directory to create
        dir: PathBuf,
    },

    /// Play interactively
    Play {
        #[command(flatten)]
        world: WorldArgs,
    },

    /// Run commands non-interactively and print each result as JSON
    Exec {
        /// Commands to run, e.g. "move north" "take coin"
        #[arg(required = true)]
        commands: Vec<String>,

        #[command(flatten)]
        world: WorldArgs,
    },

    /// Show the player and the quest log
    Status {
        #[command(flatten)]
        world: WorldArgs,
    },
}

/// Where the world is and who plays it. Flags win over `TQ_*` variables.
#[derive(clap::Args)]
struct WorldArgs {
    /// Data directory (default: $TQ_DATA_DIR or the current directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Plugin manifest (default: <dir>/plugins.json)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Game id, required when the directory holds several games
    #[arg(short, long)]
    game: Option<String>,

    /// Player name (default: $TQ_PLAYER or the game's player)
    #[arg(short, long)]
    player: Option<String>,

    /// Skip the objective check after each change
    #[arg(long)]
    no_objectives: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tq_engine=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { dir } => commands::init::run(&dir).await,
        Commands::Play { world } => commands::play::run(&world.into_options()).await,
        Commands::Exec { commands, world } => {
            commands::exec::run(&world.into_options(), &commands).await
        }
        Commands::Status { world } => commands::status::run(&world.into_options()).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

impl WorldArgs {
    fn into_options(self) -> commands::WorldOptions {
        commands::WorldOptions {
            dir: self.dir,
            manifest: self.manifest,
            game: self.game,
            player: self.player,
            evaluate_objectives: !self.no_objectives,
        }
    }
}
