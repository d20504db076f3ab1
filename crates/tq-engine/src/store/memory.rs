//! In-memory store for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tq_core::{Game, GameId, Realm, RealmId};

use super::{Store, StoreError, StoreResult};

/// One recorded save, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRecord {
    /// A game save.
    Game(GameId),
    /// A realm save.
    Realm(RealmId),
}

/// A [`Store`] that keeps aggregates in memory and records every save.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<RwLock<HashMap<GameId, Game>>>,
    realms: Arc<RwLock<HashMap<RealmId, Realm>>>,
    saves: Arc<RwLock<Vec<SaveRecord>>>,
    fail_realm_saves: Arc<AtomicBool>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with one game and its realm.
    pub async fn with_world(game: Game, realm: Realm) -> Self {
        let store = Self::new();
        store.games.write().await.insert(game.id, game);
        store.realms.write().await.insert(realm.id, realm);
        store
    }

    /// Make every following realm save fail (or succeed again).
    pub fn fail_realm_saves(&self, fail: bool) {
        self.fail_realm_saves.store(fail, Ordering::SeqCst);
    }

    /// Saves performed so far, oldest first.
    pub async fn saves(&self) -> Vec<SaveRecord> {
        self.saves.read().await.clone()
    }

    /// The stored version of a game, if any.
    pub async fn game(&self, id: GameId) -> Option<Game> {
        self.games.read().await.get(&id).cloned()
    }

    /// The stored version of a realm, if any.
    pub async fn realm(&self, id: RealmId) -> Option<Realm> {
        self.realms.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_game(&self, id: GameId) -> StoreResult<Game> {
        self.game(id)
            .await
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    async fn save_game(&self, game: &Game) -> StoreResult<()> {
        self.games.write().await.insert(game.id, game.clone());
        self.saves.write().await.push(SaveRecord::Game(game.id));
        Ok(())
    }

    async fn load_realm(&self, id: RealmId) -> StoreResult<Realm> {
        self.realm(id)
            .await
            .ok_or_else(|| StoreError::realm_not_found(id))
    }

    async fn save_realm(&self, realm: &Realm) -> StoreResult<()> {
        if self.fail_realm_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("realm store is offline".to_string()));
        }
        self.realms.write().await.insert(realm.id, realm.clone());
        self.saves.write().await.push(SaveRecord::Realm(realm.id));
        Ok(())
    }

    async fn list_games(&self) -> StoreResult<Vec<GameId>> {
        let mut ids: Vec<GameId> = self.games.read().await.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}
