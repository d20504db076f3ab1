use serde::{Deserialize, Serialize};

use crate::id::CharacterId;
use crate::item::Item;

/// Clamp a handler-reported health value into `[0, max]`.
pub fn clamp_health(value: i64, max: u32) -> u32 {
    u32::try_from(value.clamp(0, i64::from(max))).unwrap_or(0)
}

/// A non-player character standing on a map location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Instance identity. Generated when a document omits it.
    #[serde(default)]
    pub id: CharacterId,
    /// Catalog type key, e.g. `"night spider"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Plugin module that defines this character's behavior.
    pub module: String,
    /// Plugin file within the module.
    pub filename: String,
    /// Per-instance display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current health.
    pub health: u32,
    /// Initial health; captured on first change when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<u32>,
    /// Damage dealt per combat round.
    pub damage: u32,
    /// Items the character carries.
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// Items left behind when the character dies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<Item>,
}

impl Character {
    /// Create a character with the given stats and empty inventory.
    pub fn new(
        kind: impl Into<String>,
        module: impl Into<String>,
        filename: impl Into<String>,
        health: u32,
        damage: u32,
    ) -> Self {
        Self {
            id: CharacterId::new(),
            kind: kind.into(),
            module: module.into(),
            filename: filename.into(),
            name: None,
            health,
            max_health: Some(health),
            damage,
            inventory: Vec::new(),
            drops: Vec::new(),
        }
    }

    /// Give the character an item to carry.
    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    /// Add an item to the drop list.
    pub fn with_drop(mut self, item: Item) -> Self {
        self.drops.push(item);
        self
    }

    /// Display name: the per-instance name if present, otherwise the type.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    /// Apply a new health value, clamped to `[0, initial]`.
    pub fn set_health(&mut self, value: i64) {
        let max = *self.max_health.get_or_insert(self.health);
        self.health = clamp_health(value, max);
    }

    /// Whether the character has no health left.
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Take everything the character carries and drops, leaving it empty.
    pub fn spill(&mut self) -> Vec<Item> {
        let mut items = std::mem::take(&mut self.inventory);
        items.append(&mut self.drops);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_never_exceeds_initial() {
        let mut spider = Character::new("night spider", "creatures", "spiders", 10, 3);
        spider.set_health(50);
        assert_eq!(spider.health, 10);
        spider.set_health(-4);
        assert_eq!(spider.health, 0);
        assert!(spider.is_dead());
    }

    #[test]
    fn missing_max_health_is_captured_on_first_change() {
        let json = r#"{"type":"Giant","module":"creatures","filename":"giant","health":30,"damage":6}"#;
        let mut giant: Character = serde_json::from_str(json).unwrap();
        assert_eq!(giant.max_health, None);
        giant.set_health(24);
        assert_eq!(giant.max_health, Some(30));
        giant.set_health(40);
        assert_eq!(giant.health, 30);
    }

    #[test]
    fn spill_moves_inventory_then_drops() {
        let mut spider = Character::new("night spider", "creatures", "spiders", 4, 2)
            .with_item(Item::new("silk", "loot", "silk"))
            .with_drop(Item::new("fang", "loot", "fangs"));
        let spilled = spider.spill();
        let kinds: Vec<_> = spilled.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, ["silk", "fang"]);
        assert!(spider.inventory.is_empty());
        assert!(spider.drops.is_empty());
    }

    #[test]
    fn clamp_floors_at_zero() {
        assert_eq!(clamp_health(-100, 20), 0);
        assert_eq!(clamp_health(7, 20), 7);
        assert_eq!(clamp_health(i64::MAX, 20), 20);
    }
}
