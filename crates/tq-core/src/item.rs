use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// How an item came to be in its current container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceReason {
    /// Picked up from the ground.
    #[serde(rename = "take")]
    Take,
    /// Taken from a character, either freely or by winning a fight for it.
    #[serde(rename = "take from")]
    TakeFrom,
    /// Bought from a character.
    #[serde(rename = "buy from")]
    BuyFrom,
    /// Handed over by the player.
    #[serde(rename = "give")]
    Give,
}

impl SourceReason {
    /// The wire name of this reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::TakeFrom => "take from",
            Self::BuyFrom => "buy from",
            Self::Give => "give",
        }
    }
}

impl fmt::Display for SourceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "take" => Ok(Self::Take),
            "take from" => Ok(Self::TakeFrom),
            "buy from" => Ok(Self::BuyFrom),
            "give" => Ok(Self::Give),
            other => Err(format!("unknown source reason \"{other}\"")),
        }
    }
}

/// Provenance of an item: why it moved and who it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Why the item moved.
    pub reason: SourceReason,
    /// Name of the counterpart it came from.
    pub from: String,
}

impl Source {
    /// Create a provenance record.
    pub fn new(reason: SourceReason, from: impl Into<String>) -> Self {
        Self {
            reason,
            from: from.into(),
        }
    }
}

/// One item instance. Lives in exactly one container at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Instance identity. Generated when a document omits it.
    #[serde(default)]
    pub id: ItemId,
    /// Catalog type key, e.g. `"short sword"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Plugin module that defines this item's defaults and handlers.
    pub module: String,
    /// Plugin file within the module.
    pub filename: String,
    /// Per-instance display name override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Per-instance description override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Per-instance damage override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    /// How the item reached its current container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl Item {
    /// Create an item of the given type defined by `module`/`filename`.
    pub fn new(
        kind: impl Into<String>,
        module: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            kind: kind.into(),
            module: module.into(),
            filename: filename.into(),
            name: None,
            description: None,
            damage: None,
            source: None,
        }
    }

    /// Set a per-instance damage override.
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }

    /// Set a per-instance display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name: the override if present, otherwise the type.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    /// Whether the item's provenance matches `reason` and `from`.
    pub fn acquired(&self, reason: SourceReason, from: &str) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.reason == reason && s.from == from)
    }
}
