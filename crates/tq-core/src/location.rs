use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::item::Item;

/// The visited-set key for a coordinate: `"x_y"`.
pub fn location_key(x: i32, y: i32) -> String {
    format!("{x}_{y}")
}

/// Terrain of a map location, backed by an environment plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Catalog type key, e.g. `"forest"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Plugin module that defines the environment.
    #[serde(default)]
    pub module: String,
    /// Plugin file within the module.
    #[serde(default)]
    pub filename: String,
}

impl Environment {
    /// Create an environment of the given type.
    pub fn new(
        kind: impl Into<String>,
        module: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            module: module.into(),
            filename: filename.into(),
        }
    }
}

/// One grid cell of a realm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Terrain.
    pub environment: Environment,
    /// Items lying here.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Characters standing here.
    #[serde(default)]
    pub characters: Vec<Character>,
}

impl MapLocation {
    /// Create an empty location.
    pub fn new(x: i32, y: i32, environment: Environment) -> Self {
        Self {
            x,
            y,
            environment,
            items: Vec::new(),
            characters: Vec::new(),
        }
    }

    /// Place an item here.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Place a character here.
    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    /// This location's visited-set key.
    pub fn key(&self) -> String {
        location_key(self.x, self.y)
    }

    /// Whether this location sits at `(x, y)`.
    pub fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}
