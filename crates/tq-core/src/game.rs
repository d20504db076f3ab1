use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::character::clamp_health;
use crate::id::{GameId, ItemId, RealmId};
use crate::item::Item;
use crate::location::location_key;

/// Where the player stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLocation {
    /// Realm the player is in.
    pub realm_id: RealmId,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// The single player of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player name, used to address commands.
    pub name: String,
    /// Current health.
    pub health: u32,
    /// Initial health; captured on first change when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<u32>,
    /// Bare-handed damage.
    pub damage: u32,
    /// Current position.
    pub location: PlayerLocation,
    /// Carried items, one per slot.
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// The equipped inventory item, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<ItemId>,
    /// Explored coordinate keys per realm.
    #[serde(default)]
    pub visited: BTreeMap<RealmId, BTreeSet<String>>,
}

impl Player {
    /// Create a player standing at `location` with nothing explored yet.
    pub fn new(name: impl Into<String>, health: u32, damage: u32, location: PlayerLocation) -> Self {
        Self {
            name: name.into(),
            health,
            max_health: Some(health),
            damage,
            location,
            inventory: Vec::new(),
            using: None,
            visited: BTreeMap::new(),
        }
    }

    /// Record `(x, y)` in `realm` as visited. Returns `false` if it already was.
    pub fn visit(&mut self, realm: RealmId, x: i32, y: i32) -> bool {
        self.visited
            .entry(realm)
            .or_default()
            .insert(location_key(x, y))
    }

    /// Whether the coordinate key has been visited in `realm`.
    pub fn has_visited(&self, realm: RealmId, key: &str) -> bool {
        self.visited.get(&realm).is_some_and(|keys| keys.contains(key))
    }

    /// Number of carried items of the given type.
    pub fn count_of(&self, kind: &str) -> usize {
        self.inventory.iter().filter(|i| i.kind == kind).count()
    }

    /// The equipped item, if it is still in the inventory.
    pub fn equipped(&self) -> Option<&Item> {
        let id = self.using?;
        self.inventory.iter().find(|i| i.id == id)
    }

    /// Clear `using` if it points at `item`.
    pub fn unequip_if(&mut self, item: ItemId) {
        if self.using == Some(item) {
            self.using = None;
        }
    }

    /// Apply a new health value, clamped to `[0, initial]`.
    pub fn set_health(&mut self, value: i64) {
        let max = *self.max_health.get_or_insert(self.health);
        self.health = clamp_health(value, max);
    }

    /// Whether the player has no health left.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// A reference from a game to one of its realms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmRef {
    /// Realm document identifier.
    pub id: RealmId,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// The game aggregate: one player and the realms they can travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Document identifier.
    pub id: GameId,
    /// Display name.
    pub name: String,
    /// The player.
    pub player: Player,
    /// Realms in play order.
    #[serde(default)]
    pub realms: Vec<RealmRef>,
    /// Last time the document was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Create a game with no realms.
    pub fn new(id: GameId, name: impl Into<String>, player: Player) -> Self {
        Self {
            id,
            name: name.into(),
            player,
            realms: Vec::new(),
            saved_at: None,
        }
    }

    /// Add a realm reference.
    pub fn with_realm(mut self, id: RealmId, name: impl Into<String>) -> Self {
        self.realms.push(RealmRef {
            id,
            name: name.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(
            "Ayla",
            20,
            2,
            PlayerLocation {
                realm_id: RealmId::from_u128(1),
                x: 0,
                y: 0,
            },
        )
    }

    #[test]
    fn visiting_twice_is_idempotent() {
        let mut p = player();
        let realm = RealmId::from_u128(1);
        assert!(p.visit(realm, 0, 1));
        assert!(!p.visit(realm, 0, 1));
        assert_eq!(p.visited[&realm].len(), 1);
        assert!(p.has_visited(realm, "0_1"));
        assert!(!p.has_visited(RealmId::from_u128(2), "0_1"));
    }

    #[test]
    fn count_of_counts_slots() {
        let mut p = player();
        p.inventory.push(Item::new("coin", "loot", "coins"));
        p.inventory.push(Item::new("coin", "loot", "coins"));
        p.inventory.push(Item::new("food", "loot", "food"));
        assert_eq!(p.count_of("coin"), 2);
        assert_eq!(p.count_of("gem"), 0);
    }

    #[test]
    fn equipped_follows_inventory() {
        let mut p = player();
        let sword = Item::new("short sword", "arms", "blades");
        let id = sword.id;
        p.inventory.push(sword);
        p.using = Some(id);
        assert_eq!(p.equipped().map(|i| i.kind.as_str()), Some("short sword"));

        p.unequip_if(ItemId::new());
        assert_eq!(p.using, Some(id));
        p.unequip_if(id);
        assert_eq!(p.using, None);
    }

    #[test]
    fn visited_serializes_with_realm_keys() {
        let mut p = player();
        p.visit(RealmId::from_u128(1), 0, 0);
        let json = serde_json::to_value(&p).unwrap();
        let keys = &json["visited"]["00000000-0000-0000-0000-000000000001"];
        assert_eq!(keys[0], "0_0");
        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
