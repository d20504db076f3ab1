//! Plugin modules, behaviors, and the handler registry.
//!
//! Every item, character, environment, and objective names the plugin module
//! that defines it by `(module, filename)`. A module carries catalog
//! attributes and, optionally, one handler per player action. Handlers are
//! statically compiled behaviors bound to modules by a manifest at startup;
//! nothing is loaded from disk as code.
//!
//! A handler only reads the world. It reports the effect it wants through
//! [`HandlerResponse::data`], and the action pipelines are the only place
//! that commits changes.

mod behavior;
mod manifest;
mod quest;
mod registry;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tq_core::{Character, Game, Item, Objective, Realm};

use crate::envelope::Description;

pub use behavior::{Accept, Combat, FightOutcome, Refuse, Sell};
pub use manifest::{Attributes, BehaviorName, BehaviorSpec, Category, Manifest, ModuleSpec};
pub use quest::{AcquireFrom, AcquireItem, NavigateTo};
pub use registry::{PluginModule, PluginRegistry};

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors raised while building the registry or running a handler.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The manifest could not be read.
    #[error("cannot read plugin manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not valid JSON or names an unknown behavior.
    #[error("invalid plugin manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A handler is bound to an action the engine does not have.
    #[error("unknown action \"{0}\"")]
    UnknownAction(String),

    /// Two modules share a `(module, filename)` key.
    #[error("plugin module {0} is registered twice")]
    DuplicateModule(PluginKey),

    /// An objective behavior bound as an action handler, or the reverse.
    #[error("behavior \"{behavior}\" cannot be bound in {module}")]
    MisplacedBehavior {
        /// The module key.
        module: PluginKey,
        /// The behavior name.
        behavior: BehaviorName,
    },

    /// A behavior is missing a required setting.
    #[error("behavior \"{behavior}\" requires \"{setting}\"")]
    MissingSetting {
        /// The behavior name.
        behavior: BehaviorName,
        /// The missing setting.
        setting: &'static str,
    },

    /// A handler could not produce a response.
    #[error("{0}")]
    Handler(String),
}

/// Identifies a plugin module: `(module, filename)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PluginKey {
    /// Module name.
    pub module: String,
    /// File within the module.
    pub filename: String,
}

impl PluginKey {
    /// Module of the system default handlers.
    pub const DEFAULT_MODULE: &'static str = "system";
    /// File of the system default handlers.
    pub const DEFAULT_FILENAME: &'static str = "default";

    /// Create a key.
    pub fn new(module: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            filename: filename.into(),
        }
    }

    /// The system default module.
    pub fn system_default() -> Self {
        Self::new(Self::DEFAULT_MODULE, Self::DEFAULT_FILENAME)
    }

    /// The module that defines an item.
    pub fn of_item(item: &Item) -> Self {
        Self::new(&item.module, &item.filename)
    }

    /// The module that defines a character.
    pub fn of_character(character: &Character) -> Self {
        Self::new(&character.module, &character.filename)
    }

    /// The module that defines an objective.
    pub fn of_objective(objective: &Objective) -> Self {
        Self::new(&objective.module, &objective.filename)
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module, self.filename)
    }
}

/// Player actions a plugin can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `fight <npc>`
    Fight,
    /// `fight <npc> for <item>`
    FightFor,
    /// `give <item> to <npc>`
    Give,
    /// `take <item> from <npc>`
    TakeFrom,
    /// `buy <item> from <npc>`
    BuyFrom,
    /// `use <item>`
    Use,
}

impl Action {
    /// The action name used in manifests and envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fight => "fight",
            Self::FightFor => "fight for",
            Self::Give => "give",
            Self::TakeFrom => "take from",
            Self::BuyFrom => "buy from",
            Self::Use => "use",
        }
    }

    /// Only fights fall back to the system default module.
    pub fn allows_default_fallback(&self) -> bool {
        matches!(self, Self::Fight | Self::FightFor)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fight" => Ok(Self::Fight),
            "fight for" => Ok(Self::FightFor),
            "give" => Ok(Self::Give),
            "take from" => Ok(Self::TakeFrom),
            "buy from" => Ok(Self::BuyFrom),
            "use" => Ok(Self::Use),
            other => Err(PluginError::UnknownAction(other.to_string())),
        }
    }
}

/// An entity taking part in an interaction.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// An item.
    Item(&'a Item),
    /// A character.
    Character(&'a Character),
}

impl Subject<'_> {
    /// Display name of the entity.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Item(item) => item.display_name(),
            Self::Character(character) => character.display_name(),
        }
    }

    /// The character, if this subject is one.
    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(character) => Some(*character),
            Self::Item(_) => None,
        }
    }
}

/// Everything a handler may read when deciding an interaction.
#[derive(Debug, Clone, Copy)]
pub struct HandlerContext<'a> {
    /// The action being handled.
    pub action: Action,
    /// The entity whose plugin supplied the handler.
    pub entity: Subject<'a>,
    /// The other party: the item given, taken, bought, or fought for.
    pub counterpart: Option<Subject<'a>>,
    /// The game aggregate.
    pub game: &'a Game,
    /// The current realm.
    pub realm: &'a Realm,
    /// The acting player.
    pub player_name: &'a str,
    /// Catalog lookups.
    pub registry: &'a PluginRegistry,
}

/// A handler's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    /// Outcome in words; `success` must be set.
    pub description: Description,
    /// Effects the handler asks the engine to apply.
    pub data: Map<String, Value>,
}

impl HandlerResponse {
    /// A successful response with no data.
    pub fn accepted(action: Action, message: impl Into<String>) -> Self {
        Self {
            description: Description::succeeded(action.as_str(), message),
            data: Map::new(),
        }
    }

    /// A failed response.
    pub fn rejected(action: Action, message: impl Into<String>) -> Self {
        Self {
            description: Description::failed(action.as_str(), message),
            data: Map::new(),
        }
    }

    /// Attach a data field.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// An entity's response to one player action.
#[async_trait]
pub trait Handler: Send + Sync + fmt::Debug {
    /// Decide the interaction described by `ctx`.
    async fn handle(&self, ctx: &HandlerContext<'_>) -> PluginResult<HandlerResponse>;
}

/// A quest objective's completion predicate.
#[async_trait]
pub trait ObjectiveHandler: Send + Sync + fmt::Debug {
    /// Return the objective marked complete, or `None` if it is not met yet.
    async fn evaluate(
        &self,
        objective: &Objective,
        game: &Game,
        realm: &Realm,
        player_name: &str,
    ) -> PluginResult<Option<Objective>>;
}

/// Shared handle to a handler.
pub type SharedHandler = Arc<dyn Handler>;
/// Shared handle to an objective predicate.
pub type SharedObjectiveHandler = Arc<dyn ObjectiveHandler>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip() {
        for action in [
            Action::Fight,
            Action::FightFor,
            Action::Give,
            Action::TakeFrom,
            Action::BuyFrom,
            Action::Use,
        ] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("steal".parse::<Action>().is_err());
    }

    #[test]
    fn only_fights_fall_back() {
        assert!(Action::Fight.allows_default_fallback());
        assert!(Action::FightFor.allows_default_fallback());
        assert!(!Action::Give.allows_default_fallback());
        assert!(!Action::TakeFrom.allows_default_fallback());
        assert!(!Action::BuyFrom.allows_default_fallback());
        assert!(!Action::Use.allows_default_fallback());
    }

    #[test]
    fn key_display() {
        assert_eq!(PluginKey::system_default().to_string(), "system/default");
    }
}
