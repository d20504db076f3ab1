//! Configuration for a game session.

use std::path::PathBuf;

use tq_core::GameId;

/// Environment variable naming the data directory.
pub const ENV_DATA_DIR: &str = "TQ_DATA_DIR";
/// Environment variable naming the plugin manifest.
pub const ENV_MANIFEST: &str = "TQ_MANIFEST";
/// Environment variable naming the player.
pub const ENV_PLAYER: &str = "TQ_PLAYER";

/// Where the world lives and who plays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding `games/`, `realms/` and the manifest.
    pub data_dir: PathBuf,
    /// Plugin manifest; defaults to `<data_dir>/plugins.json`.
    pub manifest: Option<PathBuf>,
    /// Name commands are issued under.
    pub player_name: Option<String>,
    /// Game to load; the only stored game when unset.
    pub game_id: Option<GameId>,
    /// Re-check objectives after every world change.
    pub evaluate_objectives: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            manifest: None,
            player_name: None,
            game_id: None,
            evaluate_objectives: true,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `TQ_DATA_DIR`, `TQ_MANIFEST` and `TQ_PLAYER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(manifest) = lookup(ENV_MANIFEST).filter(|v| !v.is_empty()) {
            config.manifest = Some(PathBuf::from(manifest));
        }
        config.player_name = lookup(ENV_PLAYER).filter(|v| !v.is_empty());
        config
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the manifest path.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// Set the player name.
    pub fn with_player(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Pick the game to load.
    pub fn with_game(mut self, id: GameId) -> Self {
        self.game_id = Some(id);
        self
    }

    /// Turn objective evaluation on or off.
    pub fn with_objective_evaluation(mut self, enabled: bool) -> Self {
        self.evaluate_objectives = enabled;
        self
    }

    /// The manifest to load.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.data_dir.join("plugins.json"))
    }
}
