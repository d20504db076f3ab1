//! Persistence gateway for the two aggregates.
//!
//! A command that changes the world saves the game first and the realm
//! second. The two writes are independent: if the realm save fails after
//! the game save succeeded, the stores diverge and nothing rolls back.

mod json;
mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tq_core::{Game, GameId, Realm, RealmId};

pub use json::JsonFileStore;
pub use memory::{MemoryStore, SaveRecord};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from loading or saving an aggregate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with that id.
    #[error("{kind} {id} not found")]
    NotFound {
        /// `"game"` or `"realm"`.
        kind: &'static str,
        /// The requested id.
        id: String,
    },

    /// The backing storage could not be read or written.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn game_not_found(id: GameId) -> Self {
        Self::NotFound {
            kind: "game",
            id: id.to_string(),
        }
    }

    pub(crate) fn realm_not_found(id: RealmId) -> Self {
        Self::NotFound {
            kind: "realm",
            id: id.to_string(),
        }
    }
}

/// Loads and saves the game and realm aggregates.
#[async_trait]
pub trait Store: Send + Sync {
    /// Load a game by id.
    async fn load_game(&self, id: GameId) -> StoreResult<Game>;

    /// Save a game, replacing any previous version.
    async fn save_game(&self, game: &Game) -> StoreResult<()>;

    /// Load a realm by id.
    async fn load_realm(&self, id: RealmId) -> StoreResult<Realm>;

    /// Save a realm, replacing any previous version.
    async fn save_realm(&self, realm: &Realm) -> StoreResult<()>;

    /// Ids of all stored games.
    async fn list_games(&self) -> StoreResult<Vec<GameId>> {
        Ok(Vec::new())
    }
}
