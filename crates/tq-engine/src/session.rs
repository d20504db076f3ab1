//! Game session: the explicit context every command runs in.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tq_core::{CoreError, Game, GameId, Objective, Realm, find_player_by_name};
use tracing::{debug, info, warn};

use crate::action::{self, ActionContext, Outcome};
use crate::config::EngineConfig;
use crate::envelope::{ActionResult, Description, ResponseData};
use crate::error::{EngineError, EngineResult};
use crate::notify::Notifier;
use crate::objective;
use crate::parser::{Command, parse_command};
use crate::plugin::PluginRegistry;
use crate::store::{JsonFileStore, Store};

/// What one routed command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    /// The command's own result.
    pub result: ActionResult,
    /// The objective pass that followed a world change, if one ran.
    pub objectives: Option<ActionResult>,
}

impl RouteOutcome {
    /// Both envelopes in delivery order.
    pub fn envelopes(&self) -> impl Iterator<Item = &ActionResult> {
        std::iter::once(&self.result).chain(self.objectives.as_ref())
    }
}

/// One loaded game and the realm its player stands in.
///
/// Commands take `&mut self`, so a session runs one command at a time.
pub struct GameSession {
    game: Game,
    realm: Realm,
    registry: Arc<PluginRegistry>,
    store: Arc<dyn Store>,
    notifier: Option<Arc<dyn Notifier>>,
    evaluate_objectives: bool,
}

impl GameSession {
    /// Load a game and the realm its player is in.
    pub async fn start(
        store: Arc<dyn Store>,
        registry: Arc<PluginRegistry>,
        game_id: GameId,
    ) -> EngineResult<Self> {
        let mut game = store.load_game(game_id).await?;
        let at = game.player.location;
        if !game.realms.iter().any(|r| r.id == at.realm_id) {
            return Err(CoreError::InvalidReference(format!(
                "game {} does not list realm {}",
                game.id, at.realm_id
            ))
            .into());
        }

        let realm = store.load_realm(at.realm_id).await?;
        realm.validate()?;
        // The starting cell counts as explored
        game.player.visit(realm.id, at.x, at.y);

        info!(game = %game.id, realm = %realm.name, "session started");
        Ok(Self {
            game,
            realm,
            registry,
            store,
            notifier: None,
            evaluate_objectives: true,
        })
    }

    /// Build the registry and file store described by `config` and start.
    ///
    /// Without a configured game id the data directory must hold exactly one game.
    pub async fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let registry = Arc::new(PluginRegistry::load(&config.manifest_path())?);
        let store = Arc::new(JsonFileStore::new(&config.data_dir));
        let game_id = match config.game_id {
            Some(id) => id,
            None => only_game(store.as_ref(), config).await?,
        };
        let session = Self::start(store, registry, game_id).await?;
        Ok(session.with_objective_evaluation(config.evaluate_objectives))
    }

    /// Deliver every envelope to `notifier` as well.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Turn the objective pass after world changes on or off.
    pub fn with_objective_evaluation(mut self, enabled: bool) -> Self {
        self.evaluate_objectives = enabled;
        self
    }

    /// The game aggregate.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The current realm.
    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    /// The plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Run one command line on behalf of `player_name`.
    ///
    /// Failures never escape: they come back as failure envelopes. A
    /// successful command has changed the world, so both aggregates are
    /// saved (game first) and the objective pass runs, yielding a second
    /// envelope.
    pub async fn route(&mut self, line: &str, player_name: &str) -> RouteOutcome {
        debug!(command = line, player = player_name, "command received");

        let applied = self.apply(line, player_name).await;
        let changed = applied.is_ok();
        let result = match applied {
            Ok(outcome) => match self.persist().await {
                Ok(()) => self.success(outcome),
                Err(e) => {
                    warn!(error = %e, "world changed but could not be saved");
                    ActionResult::failure(&e)
                }
            },
            Err(e) => {
                debug!(error = %e, "command failed");
                ActionResult::failure(&e)
            }
        };
        self.emit(&result);

        let objectives = if changed && self.evaluate_objectives {
            let pass = self.check_objectives(player_name).await;
            self.emit(&pass);
            Some(pass)
        } else {
            None
        };
        RouteOutcome { result, objectives }
    }

    async fn apply(&mut self, line: &str, player_name: &str) -> EngineResult<Outcome> {
        let command = parse_command(line);
        if let Command::Unknown { verb } = command {
            return Err(EngineError::UnknownCommand(verb));
        }
        if find_player_by_name(&self.game, player_name).is_none() {
            return Err(EngineError::InvalidPlayer(player_name.to_string()));
        }

        let mut ctx = ActionContext {
            game: &mut self.game,
            realm: &mut self.realm,
            registry: self.registry.as_ref(),
            player_name,
        };
        action::execute(&mut ctx, command).await
    }

    /// Game first, then realm. A realm failure leaves the saved game in place.
    async fn persist(&mut self) -> EngineResult<()> {
        self.game.saved_at = Some(Utc::now());
        self.store.save_game(&self.game).await?;
        debug!(game = %self.game.id, "game saved");
        self.store.save_realm(&self.realm).await?;
        debug!(realm = %self.realm.id, "realm saved");
        Ok(())
    }

    async fn check_objectives(&mut self, player_name: &str) -> ActionResult {
        let outcomes =
            objective::evaluate(&self.registry, &self.game, &mut self.realm, player_name).await;
        let completed: Vec<Objective> = outcomes
            .into_iter()
            .filter(|o| o.is_completed())
            .map(|o| o.objective)
            .collect();

        if !completed.is_empty()
            && let Err(e) = self.store.save_realm(&self.realm).await
        {
            warn!(error = %e, "completed objectives could not be saved");
            return ActionResult::failure(&EngineError::from(e));
        }

        let description = if completed.is_empty() {
            Description {
                action: "objectives".to_string(),
                success: Some(true),
                message: None,
            }
        } else {
            let names: Vec<&str> = completed.iter().map(|o| o.kind.as_str()).collect();
            Description::succeeded(
                "objectives",
                format!("Objective complete: {}.", names.join(", ")),
            )
        };
        ActionResult::Success(ResponseData {
            player: self.game.player.clone(),
            description,
            data: json!({ "completed": completed }),
        })
    }

    fn success(&self, outcome: Outcome) -> ActionResult {
        ActionResult::Success(ResponseData {
            player: self.game.player.clone(),
            description: Description::succeeded(outcome.action, outcome.message),
            data: outcome.data,
        })
    }

    fn emit(&self, result: &ActionResult) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(result);
        }
    }
}

async fn only_game(store: &JsonFileStore, config: &EngineConfig) -> EngineResult<GameId> {
    let games = store.list_games().await?;
    match games.as_slice() {
        [id] => Ok(*id),
        [] => Err(CoreError::Validation(format!(
            "no game found in {}",
            config.data_dir.display()
        ))
        .into()),
        _ => Err(CoreError::Validation(format!(
            "{} games found in {}; pick one",
            games.len(),
            config.data_dir.display()
        ))
        .into()),
    }
}
