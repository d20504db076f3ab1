//! Result envelopes delivered to the caller.
//!
//! ```text
//! Success: { error: false, responseData: { player, description: { action, success?, message? }, data } }
//! Failure: { error: true, message }
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tq_core::Player;

use crate::error::EngineError;

/// What happened, in words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// The action name, e.g. `"give"` or `"objectives"`.
    pub action: String,
    /// Whether the action succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Player-facing text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Description {
    /// A successful description with a message.
    pub fn succeeded(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            success: Some(true),
            message: Some(message.into()),
        }
    }

    /// A failed description with a message.
    pub fn failed(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            success: Some(false),
            message: Some(message.into()),
        }
    }
}

/// Payload of a successful result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseData {
    /// The player after the command.
    pub player: Player,
    /// What happened.
    pub description: Description,
    /// Action-specific details.
    pub data: Value,
}

/// Outcome of one command or one objective pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// The action went through.
    Success(ResponseData),
    /// The action failed; nothing the player sees changed.
    Failure {
        /// Player-facing reason.
        message: String,
    },
}

impl ActionResult {
    /// Build a failure envelope from an engine error.
    pub fn failure(err: &EngineError) -> Self {
        Self::Failure {
            message: err.to_string(),
        }
    }

    /// Whether this is a failure envelope.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// The player-facing message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(data) => data.description.message.as_deref(),
            Self::Failure { message } => Some(message),
        }
    }

    /// The success payload, if any.
    pub fn response(&self) -> Option<&ResponseData> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

impl Serialize for ActionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            Self::Success(data) => {
                s.serialize_field("error", &false)?;
                s.serialize_field("responseData", data)?;
            }
            Self::Failure { message } => {
                s.serialize_field("error", &true)?;
                s.serialize_field("message", message)?;
            }
        }
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tq_core::{PlayerLocation, RealmId};

    #[test]
    fn failure_shape() {
        let result = ActionResult::failure(&EngineError::TargetNotFound("short sword".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({"error": true, "message": "There is no short sword."})
        );
    }

    #[test]
    fn success_shape() {
        let player = Player::new(
            "Ayla",
            10,
            1,
            PlayerLocation {
                realm_id: RealmId::from_u128(1),
                x: 0,
                y: 0,
            },
        );
        let result = ActionResult::Success(ResponseData {
            player,
            description: Description::succeeded("drop", "You drop the food."),
            data: json!({}),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["responseData"]["player"]["name"], "Ayla");
        assert_eq!(json["responseData"]["description"]["action"], "drop");
        assert_eq!(json["responseData"]["description"]["success"], true);
        assert_eq!(result.message(), Some("You drop the food."));
    }
}
