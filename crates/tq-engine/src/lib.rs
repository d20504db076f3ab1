//! Command engine for Tilequest.
//!
//! Interprets short player commands (`move north`, `give food to Giant`),
//! resolves the entities they name inside the current realm, asks the
//! entity's plugin behavior how the interaction turns out, commits the
//! result to the game and realm aggregates, persists both, and re-checks
//! quest objectives after every change.

/// Action pipelines that commit handler outcomes to the world.
mod action;
/// Engine configuration.
pub mod config;
/// Result envelopes returned to the caller.
pub mod envelope;
/// Error types for the engine.
pub mod error;
/// Delivery of results to an outer layer.
pub mod notify;
/// Quest objective evaluation.
pub mod objective;
/// Command parsing.
pub mod parser;
/// Plugin modules, behaviors, and the handler registry.
pub mod plugin;
/// Session context and command routing.
pub mod session;
/// Persistence gateway for the game and realm aggregates.
pub mod store;

pub use config::EngineConfig;
pub use envelope::{ActionResult, Description, ResponseData};
pub use error::{EngineError, EngineResult};
pub use notify::{ChannelNotifier, LogNotifier, Notifier};
pub use objective::{ObjectiveOutcome, evaluate};
pub use parser::{Command, Direction, Target, parse_command};
pub use plugin::{Action, PluginKey, PluginRegistry};
pub use session::{GameSession, RouteOutcome};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError, StoreResult};
