use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};
use crate::id::RealmId;
use crate::location::MapLocation;

/// Completion state of an objective.
///
/// Saved documents use the legacy string `"true"` for a satisfied objective,
/// so this type carries its own serde shim: `"true"`/`true` read as
/// [`Satisfied`](Self::Satisfied), `"false"`/`false` (or any other string) as
/// [`Unsatisfied`](Self::Unsatisfied), and an absent or `null` field as
/// [`Unevaluated`](Self::Unevaluated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Never checked.
    #[default]
    Unevaluated,
    /// Checked, not yet met.
    Unsatisfied,
    /// Met. Never reset.
    Satisfied,
}

impl Completion {
    /// Whether the objective has been met.
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// Whether the objective was never checked.
    pub fn is_unevaluated(&self) -> bool {
        matches!(self, Self::Unevaluated)
    }
}

impl Serialize for Completion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unevaluated => serializer.serialize_none(),
            Self::Unsatisfied => serializer.serialize_str("false"),
            Self::Satisfied => serializer.serialize_str("true"),
        }
    }
}

impl<'de> Deserialize<'de> for Completion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Self::Unevaluated,
            Some(Raw::Flag(true)) => Self::Satisfied,
            Some(Raw::Flag(false)) => Self::Unsatisfied,
            Some(Raw::Text(s)) if s == "true" => Self::Satisfied,
            Some(Raw::Text(_)) => Self::Unsatisfied,
        })
    }
}

/// A named objective parameter, e.g. `{name: "count", value: "2"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveParam {
    /// Parameter name.
    pub name: String,
    /// Parameter value, always textual on the wire.
    pub value: String,
}

/// A quest goal with a type-specific completion predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Objective type key, e.g. `"Acquire item"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Plugin module that supplies the predicate.
    pub module: String,
    /// Plugin file within the module.
    pub filename: String,
    /// Ordered parameters.
    #[serde(default)]
    pub params: Vec<ObjectiveParam>,
    /// Completion state.
    #[serde(default, skip_serializing_if = "Completion::is_unevaluated")]
    pub completed: Completion,
}

impl Objective {
    /// The implicit objective satisfied by starting the game.
    pub const START_AT: &'static str = "Start at";

    /// Create an unevaluated objective.
    pub fn new(
        kind: impl Into<String>,
        module: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            module: module.into(),
            filename: filename.into(),
            params: Vec::new(),
            completed: Completion::Unevaluated,
        }
    }

    /// Append a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(ObjectiveParam {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Look up a parameter value by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Whether this is the implicit start objective.
    pub fn is_start(&self) -> bool {
        self.kind == Self::START_AT
    }
}

/// A bounded grid-based world section: the second persisted aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    /// Document identifier.
    pub id: RealmId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Grid cells, unique by coordinate.
    #[serde(default)]
    pub locations: Vec<MapLocation>,
    /// Quest objectives, evaluated in order.
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl Realm {
    /// Create an empty realm.
    pub fn new(id: RealmId, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            locations: Vec::new(),
            objectives: Vec::new(),
        }
    }

    /// Add a location.
    pub fn with_location(mut self, location: MapLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Add an objective.
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    /// The location at `(x, y)`, if any.
    pub fn location_at(&self, x: i32, y: i32) -> Option<&MapLocation> {
        self.locations.iter().find(|l| l.is_at(x, y))
    }

    /// Mutable access to the location at `(x, y)`.
    pub fn location_at_mut(&mut self, x: i32, y: i32) -> Option<&mut MapLocation> {
        self.locations.iter_mut().find(|l| l.is_at(x, y))
    }

    /// Check coordinate uniqueness and bounds.
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for loc in &self.locations {
            let in_x = u32::try_from(loc.x).is_ok_and(|x| x < self.width);
            let in_y = u32::try_from(loc.y).is_ok_and(|y| y < self.height);
            if !in_x || !in_y {
                return Err(CoreError::OutOfBounds {
                    x: loc.x,
                    y: loc.y,
                    width: self.width,
                    height: self.height,
                });
            }
            if !seen.insert((loc.x, loc.y)) {
                return Err(CoreError::DuplicateCoordinate {
                    realm: self.name.clone(),
                    x: loc.x,
                    y: loc.y,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Environment;

    fn plains(x: i32, y: i32) -> MapLocation {
        MapLocation::new(x, y, Environment::new("plains", "terrain", "open"))
    }

    #[test]
    fn completion_reads_legacy_string() {
        let json = r#"{"type":"Acquire item","module":"quests","filename":"items","completed":"true"}"#;
        let obj: Objective = serde_json::from_str(json).unwrap();
        assert_eq!(obj.completed, Completion::Satisfied);
    }

    #[test]
    fn completion_reads_booleans_and_absence() {
        let absent: Objective =
            serde_json::from_str(r#"{"type":"t","module":"m","filename":"f"}"#).unwrap();
        assert_eq!(absent.completed, Completion::Unevaluated);

        let flag: Objective = serde_json::from_str(
            r#"{"type":"t","module":"m","filename":"f","completed":true}"#,
        )
        .unwrap();
        assert_eq!(flag.completed, Completion::Satisfied);

        let no: Objective = serde_json::from_str(
            r#"{"type":"t","module":"m","filename":"f","completed":"false"}"#,
        )
        .unwrap();
        assert_eq!(no.completed, Completion::Unsatisfied);
    }

    #[test]
    fn completion_writes_legacy_string() {
        let mut obj = Objective::new("Navigate to", "quests", "travel");
        let json = serde_json::to_value(&obj).unwrap();
        assert!(json.get("completed").is_none());

        obj.completed = Completion::Satisfied;
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["completed"], "true");
    }

    #[test]
    fn param_lookup() {
        let obj = Objective::new("Acquire item", "quests", "items")
            .with_param("item", "coin")
            .with_param("count", "2");
        assert_eq!(obj.param("count"), Some("2"));
        assert_eq!(obj.param("from"), None);
    }

    #[test]
    fn validate_rejects_duplicates() {
        let realm = Realm::new(RealmId::from_u128(1), "Vale", 2, 2)
            .with_location(plains(0, 0))
            .with_location(plains(0, 0));
        assert!(matches!(
            realm.validate(),
            Err(CoreError::DuplicateCoordinate { x: 0, y: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_bounds() {
        let realm = Realm::new(RealmId::from_u128(1), "Vale", 2, 2).with_location(plains(2, 0));
        assert!(matches!(realm.validate(), Err(CoreError::OutOfBounds { .. })));
        let realm = Realm::new(RealmId::from_u128(1), "Vale", 2, 2).with_location(plains(-1, 0));
        assert!(realm.validate().is_err());
    }

    #[test]
    fn location_lookup() {
        let realm = Realm::new(RealmId::from_u128(1), "Vale", 2, 2)
            .with_location(plains(0, 0))
            .with_location(plains(0, 1));
        assert!(realm.location_at(0, 1).is_some());
        assert!(realm.location_at(1, 1).is_none());
    }
}
