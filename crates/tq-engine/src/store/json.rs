//! Aggregates as pretty JSON documents on disk.
//!
//! ```text
//! <root>/games/<game id>.json
//! <root>/realms/<realm id>.json
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tq_core::{Game, GameId, Realm, RealmId};
use tracing::debug;

use super::{Store, StoreError, StoreResult};

/// A [`Store`] backed by one JSON file per aggregate.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// A store rooted at `root`. Nothing is created until the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of a game document.
    pub fn game_path(&self, id: GameId) -> PathBuf {
        self.root.join("games").join(format!("{id}.json"))
    }

    /// Path of a realm document.
    pub fn realm_path(&self, id: RealmId) -> PathBuf {
        self.root.join("realms").join(format!("{id}.json"))
    }

    async fn read<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write through a temporary file so a crash never leaves half a document.
    async fn write<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load_game(&self, id: GameId) -> StoreResult<Game> {
        Self::read(&self.game_path(id))
            .await?
            .ok_or_else(|| StoreError::game_not_found(id))
    }

    async fn save_game(&self, game: &Game) -> StoreResult<()> {
        Self::write(&self.game_path(game.id), game).await
    }

    async fn load_realm(&self, id: RealmId) -> StoreResult<Realm> {
        Self::read(&self.realm_path(id))
            .await?
            .ok_or_else(|| StoreError::realm_not_found(id))
    }

    async fn save_realm(&self, realm: &Realm) -> StoreResult<()> {
        Self::write(&self.realm_path(realm.id), realm).await
    }

    async fn list_games(&self) -> StoreResult<Vec<GameId>> {
        let mut entries = match fs::read_dir(self.root.join("games")).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(id) = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .and_then(|stem| stem.parse::<GameId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tq_core::{Player, PlayerLocation};

    fn sample_game() -> Game {
        let realm_id = RealmId::from_u128(2);
        let player = Player::new(
            "Ayla",
            10,
            1,
            PlayerLocation {
                realm_id,
                x: 0,
                y: 0,
            },
        );
        Game::new(GameId::from_u128(1), "Test", player).with_realm(realm_id, "Vale")
    }

    #[tokio::test]
    async fn game_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let game = sample_game();

        store.save_game(&game).await.unwrap();
        assert!(store.game_path(game.id).exists());
        assert_eq!(store.load_game(game.id).await.unwrap(), game);
        assert_eq!(store.list_games().await.unwrap(), vec![game.id]);
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(
            store.load_realm(RealmId::from_u128(9)).await,
            Err(StoreError::NotFound { kind: "realm", .. })
        ));
        assert!(store.list_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_document_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let id = GameId::from_u128(3);
        std::fs::create_dir_all(dir.path().join("games")).unwrap();
        std::fs::write(store.game_path(id), "{ not json").unwrap();
        assert!(matches!(
            store.load_game(id).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn realm_saves_replace_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let mut realm = Realm::new(RealmId::from_u128(4), "Vale", 2, 2);
        store.save_realm(&realm).await.unwrap();
        realm.name = "Moor".to_string();
        store.save_realm(&realm).await.unwrap();
        assert_eq!(store.load_realm(realm.id).await.unwrap().name, "Moor");
    }
}
