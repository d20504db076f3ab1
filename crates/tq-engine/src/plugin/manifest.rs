//! The plugin manifest: which behaviors each module binds, and its catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use super::{
    Accept, AcquireFrom, AcquireItem, Combat, NavigateTo, PluginError, PluginKey, PluginResult,
    Refuse, Sell, SharedHandler, SharedObjectiveHandler,
};

/// What kind of entity a module defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Items.
    Item,
    /// Characters.
    Character,
    /// Terrain.
    Environment,
    /// Quest objectives.
    Objective,
}

/// Catalog defaults for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Catalog type key.
    #[serde(rename = "type")]
    pub kind: String,
    /// Default display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Default description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default damage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    /// Default health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
}

impl Attributes {
    /// Attributes with only a type key.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            description: None,
            damage: None,
            health: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the damage.
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = Some(damage);
        self
    }
}

/// Names of the statically compiled behaviors a manifest can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorName {
    /// Always agree.
    Accept,
    /// Always decline.
    Refuse,
    /// Agree in exchange for a payment item.
    Sell,
    /// Trade blows.
    Combat,
    /// Objective: reach a coordinate.
    NavigateTo,
    /// Objective: carry a number of items of one type.
    AcquireItem,
    /// Objective: carry an item with a given provenance.
    AcquireFrom,
}

impl BehaviorName {
    /// The manifest name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Refuse => "refuse",
            Self::Sell => "sell",
            Self::Combat => "combat",
            Self::NavigateTo => "navigate-to",
            Self::AcquireItem => "acquire-item",
            Self::AcquireFrom => "acquire-from",
        }
    }
}

impl fmt::Display for BehaviorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A behavior binding with its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorSpec {
    /// Which behavior.
    pub behavior: BehaviorName,
    /// Custom player-facing message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payment item type (`sell` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<String>,
}

impl BehaviorSpec {
    /// A binding with no settings.
    pub fn new(behavior: BehaviorName) -> Self {
        Self {
            behavior,
            message: None,
            payment: None,
        }
    }

    /// A `sell` binding asking for `payment`.
    pub fn sell(payment: impl Into<String>) -> Self {
        Self {
            payment: Some(payment.into()),
            ..Self::new(BehaviorName::Sell)
        }
    }

    /// Set a custom message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub(crate) fn handler(&self, module: &PluginKey) -> PluginResult<SharedHandler> {
        let message = self.message.clone();
        let handler: SharedHandler = match self.behavior {
            BehaviorName::Accept => Arc::new(Accept { message }),
            BehaviorName::Refuse => Arc::new(Refuse { message }),
            BehaviorName::Sell => {
                let payment = self.payment.clone().ok_or(PluginError::MissingSetting {
                    behavior: self.behavior,
                    setting: "payment",
                })?;
                Arc::new(Sell { payment, message })
            }
            BehaviorName::Combat => Arc::new(Combat),
            BehaviorName::NavigateTo | BehaviorName::AcquireItem | BehaviorName::AcquireFrom => {
                return Err(PluginError::MisplacedBehavior {
                    module: module.clone(),
                    behavior: self.behavior,
                });
            }
        };
        Ok(handler)
    }

    pub(crate) fn objective_handler(&self, module: &PluginKey) -> PluginResult<SharedObjectiveHandler> {
        let handler: SharedObjectiveHandler = match self.behavior {
            BehaviorName::NavigateTo => Arc::new(NavigateTo),
            BehaviorName::AcquireItem => Arc::new(AcquireItem),
            BehaviorName::AcquireFrom => Arc::new(AcquireFrom),
            _ => {
                return Err(PluginError::MisplacedBehavior {
                    module: module.clone(),
                    behavior: self.behavior,
                });
            }
        };
        Ok(handler)
    }
}

/// One module entry in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Module name.
    pub module: String,
    /// File within the module.
    pub filename: String,
    /// What the module defines.
    pub category: Category,
    /// Catalog entries; a single object or an array.
    #[serde(default, deserialize_with = "one_or_many")]
    pub attributes: Vec<Attributes>,
    /// Action handlers keyed by action name (`"give"`, `"take from"`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, BehaviorSpec>,
    /// Completion predicate for objective modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<BehaviorSpec>,
}

impl ModuleSpec {
    /// An empty module entry.
    pub fn new(module: impl Into<String>, filename: impl Into<String>, category: Category) -> Self {
        Self {
            module: module.into(),
            filename: filename.into(),
            category,
            attributes: Vec::new(),
            handlers: BTreeMap::new(),
            objective: None,
        }
    }

    /// The module's key.
    pub fn key(&self) -> PluginKey {
        PluginKey::new(&self.module, &self.filename)
    }

    /// Add a catalog entry.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.push(attributes);
        self
    }

    /// Bind a behavior to an action name.
    pub fn with_handler(mut self, action: &str, spec: BehaviorSpec) -> Self {
        self.handlers.insert(action.to_string(), spec);
        self
    }

    /// Bind the completion predicate.
    pub fn with_objective(mut self, spec: BehaviorSpec) -> Self {
        self.objective = Some(spec);
        self
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Attributes>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Attributes),
        Many(Vec<Attributes>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(one) => vec![one],
        OneOrMany::Many(many) => many,
    })
}

/// The startup manifest listing every plugin module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Module entries.
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> PluginResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> PluginResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Render as pretty JSON.
    pub fn to_json_pretty(&self) -> PluginResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a module entry.
    pub fn with_module(mut self, module: ModuleSpec) -> Self {
        self.modules.push(module);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_accept_single_object() {
        let manifest = Manifest::from_json(
            r#"{"modules":[{"module":"creatures","filename":"giant","category":"character",
                "attributes":{"type":"Giant","health":30,"damage":6}}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.modules[0].attributes.len(), 1);
        assert_eq!(manifest.modules[0].attributes[0].damage, Some(6));
    }

    #[test]
    fn attributes_accept_array() {
        let manifest = Manifest::from_json(
            r#"{"modules":[{"module":"loot","filename":"misc","category":"item",
                "attributes":[{"type":"coin"},{"type":"food"}]}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.modules[0].attributes.len(), 2);
    }

    #[test]
    fn handlers_are_optional() {
        let manifest = Manifest::from_json(
            r#"{"modules":[{"module":"terrain","filename":"open","category":"environment"}]}"#,
        )
        .unwrap();
        assert!(manifest.modules[0].handlers.is_empty());
        assert!(manifest.modules[0].attributes.is_empty());
    }

    #[test]
    fn unknown_behavior_is_a_load_error() {
        let err = Manifest::from_json(
            r#"{"modules":[{"module":"m","filename":"f","category":"item",
                "handlers":{"use":{"behavior":"run-script"}}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PluginError::Manifest(_)));
    }

    #[test]
    fn sell_requires_payment() {
        let key = PluginKey::new("m", "f");
        let err = BehaviorSpec::new(BehaviorName::Sell).handler(&key).unwrap_err();
        assert!(matches!(
            err,
            PluginError::MissingSetting {
                setting: "payment",
                ..
            }
        ));
        assert!(BehaviorSpec::sell("coin").handler(&key).is_ok());
    }

    #[test]
    fn objective_behaviors_are_not_action_handlers() {
        let key = PluginKey::new("quests", "travel");
        assert!(
            BehaviorSpec::new(BehaviorName::NavigateTo)
                .handler(&key)
                .is_err()
        );
        assert!(
            BehaviorSpec::new(BehaviorName::Accept)
                .objective_handler(&key)
                .is_err()
        );
        assert!(
            BehaviorSpec::new(BehaviorName::NavigateTo)
                .objective_handler(&key)
                .is_ok()
        );
    }

    #[test]
    fn round_trips_through_json() {
        let manifest = Manifest::default().with_module(
            ModuleSpec::new("traders", "merchant", Category::Character)
                .with_attributes(Attributes::new("merchant"))
                .with_handler("buy from", BehaviorSpec::sell("coin")),
        );
        let text = manifest.to_json_pretty().unwrap();
        assert_eq!(Manifest::from_json(&text).unwrap(), manifest);
    }
}
