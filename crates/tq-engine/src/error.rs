//! Error types for the command engine.
//!
//! The `Display` text of every variant is written for the player: it is the
//! `message` of a failure envelope.

use thiserror::Error;

use crate::plugin::PluginError;
use crate::store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The command names a player who is not in this game.
    #[error("There is no player named {0}.")]
    InvalidPlayer(String),

    /// The player's position, or the destination of a move, is not on the map.
    #[error("{0}")]
    LocationNotFound(String),

    /// No entity of the requested type where the command looked.
    #[error("There is no {0}.")]
    TargetNotFound(String),

    /// A character does not carry the requested item.
    #[error("The {holder} has no {item}.")]
    NotCarried {
        /// Character display name.
        holder: String,
        /// Requested item type.
        item: String,
    },

    /// The player does not carry the requested item.
    #[error("You have no {0}.")]
    NotInInventory(String),

    /// The entity's plugin has no handler for the interaction.
    #[error("{0}")]
    HandlerAbsent(String),

    /// The handler ran and reported failure.
    #[error("{0}")]
    HandlerRejected(String),

    /// The handler response was malformed.
    #[error("handler contract violated: {0}")]
    ContractViolation(String),

    /// A save failed. Earlier saves in the same command are not rolled back.
    #[error("could not save the game: {0}")]
    Persistence(#[from] StoreError),

    /// The loaded aggregates are inconsistent.
    #[error("world error: {0}")]
    World(#[from] tq_core::CoreError),

    /// The plugin registry could not be built.
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// The verb is not one the engine understands.
    #[error("I don't know how to \"{0}\".")]
    UnknownCommand(String),

    /// The verb is known but the rest of the command does not fit it.
    #[error("{0}")]
    InvalidCommand(String),
}
