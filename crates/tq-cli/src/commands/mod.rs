pub mod exec;
pub mod init;
pub mod play;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use tq_core::GameId;
use tq_engine::{ActionResult, EngineConfig, GameSession, LogNotifier};
use tracing::debug;

/// World selection gathered from the command line.
pub struct WorldOptions {
    pub dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub game: Option<String>,
    pub player: Option<String>,
    pub evaluate_objectives: bool,
}

impl WorldOptions {
    /// Environment defaults with the flags laid over them.
    fn config(&self) -> Result<EngineConfig, String> {
        let mut config = EngineConfig::from_env();
        if let Some(dir) = &self.dir {
            config = config.with_data_dir(dir);
        }
        if let Some(manifest) = &self.manifest {
            config = config.with_manifest(manifest);
        }
        if let Some(player) = &self.player {
            config = config.with_player(player);
        }
        if let Some(game) = &self.game {
            let id: GameId = game
                .parse()
                .map_err(|e| format!("invalid game id '{game}': {e}"))?;
            config = config.with_game(id);
        }
        Ok(config.with_objective_evaluation(self.evaluate_objectives))
    }
}

/// Open a session and decide who is playing.
async fn open(options: &WorldOptions) -> Result<(GameSession, String), String> {
    let config = options.config()?;
    debug!(dir = %config.data_dir.display(), "opening world");
    let session = GameSession::from_config(&config)
        .await
        .map_err(|e| format!("cannot open world in {}: {e}", config.data_dir.display()))?
        .with_notifier(Arc::new(LogNotifier));
    let player = config
        .player_name
        .unwrap_or_else(|| session.game().player.name.clone());
    Ok((session, player))
}

/// Render an envelope for a human.
fn print_result(result: &ActionResult) {
    match result {
        ActionResult::Failure { message } => println!("  {}", message.yellow()),
        ActionResult::Success(data) => {
            if let Some(message) = &data.description.message {
                if data.description.action == "objectives" {
                    println!("  {}", message.green().bold());
                } else {
                    println!("  {message}");
                }
            }
        }
    }
}
