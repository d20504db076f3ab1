//! Built-in action behaviors a manifest can bind to a module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Action, Handler, HandlerContext, HandlerResponse, PluginError, PluginResult};

fn counterpart_name<'a>(ctx: &'a HandlerContext<'_>) -> &'a str {
    match &ctx.counterpart {
        Some(counterpart) => counterpart.display_name(),
        None => "it",
    }
}

/// Agrees to whatever is asked.
#[derive(Debug, Clone, Default)]
pub struct Accept {
    /// Overrides the default message.
    pub message: Option<String>,
}

impl Accept {
    fn default_message(ctx: &HandlerContext<'_>) -> String {
        let entity = ctx.entity.display_name();
        let other = counterpart_name(ctx);
        match ctx.action {
            Action::Give => format!("The {entity} accepts the {other}."),
            Action::TakeFrom => format!("The {entity} hands over the {other}."),
            Action::BuyFrom => format!("The {entity} sells you the {other}."),
            Action::Use => format!("You are now using the {entity}."),
            Action::Fight | Action::FightFor => format!("The {entity} yields."),
        }
    }
}

#[async_trait]
impl Handler for Accept {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> PluginResult<HandlerResponse> {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| Self::default_message(ctx));
        Ok(HandlerResponse::accepted(ctx.action, message))
    }
}

/// Declines every request.
#[derive(Debug, Clone, Default)]
pub struct Refuse {
    /// Overrides the default message.
    pub message: Option<String>,
}

#[async_trait]
impl Handler for Refuse {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> PluginResult<HandlerResponse> {
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("The {} refuses.", ctx.entity.display_name()));
        Ok(HandlerResponse::rejected(ctx.action, message))
    }
}

/// Hands over an item in exchange for one item of the `payment` type.
///
/// The response carries `data.payment`; the engine moves the payment.
#[derive(Debug, Clone)]
pub struct Sell {
    /// Item type the seller wants.
    pub payment: String,
    /// Overrides the default message.
    pub message: Option<String>,
}

#[async_trait]
impl Handler for Sell {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> PluginResult<HandlerResponse> {
        if ctx.game.player.count_of(&self.payment) == 0 {
            return Ok(HandlerResponse::rejected(
                ctx.action,
                format!("You have no {} to pay with.", self.payment),
            ));
        }
        let message = self.message.clone().unwrap_or_else(|| {
            format!(
                "The {} takes a {} for the {}.",
                ctx.entity.display_name(),
                self.payment,
                counterpart_name(ctx)
            )
        });
        Ok(HandlerResponse::accepted(ctx.action, message)
            .with_data("payment", Value::String(self.payment.clone())))
    }
}

/// Result of one exchange of blows.
///
/// Health values come from the handler and are clamped again when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightOutcome {
    /// Player health after the exchange.
    pub player_health: i64,
    /// Opponent health after the exchange.
    pub character_health: i64,
    /// The opponent died and the player did not.
    pub player_won: bool,
    /// The player's health reached zero.
    pub player_died: bool,
    /// The opponent's health reached zero.
    pub character_died: bool,
}

impl FightOutcome {
    /// Both sides strike at once.
    pub fn exchange(player_health: u32, player_damage: u32, npc_health: u32, npc_damage: u32) -> Self {
        let player_health = (i64::from(player_health) - i64::from(npc_damage)).max(0);
        let character_health = (i64::from(npc_health) - i64::from(player_damage)).max(0);
        let player_died = player_health == 0;
        let character_died = character_health == 0;
        Self {
            player_health,
            character_health,
            player_won: character_died && !player_died,
            player_died,
            character_died,
        }
    }

    fn message(&self, npc: &str) -> String {
        match (self.player_died, self.character_died) {
            (false, true) => format!("You defeat the {npc}."),
            (true, false) => format!("The {npc} defeats you."),
            (true, true) => format!("You and the {npc} strike each other down."),
            (false, false) => format!("You trade blows with the {npc}."),
        }
    }
}

/// The default fight behavior: one simultaneous exchange of blows.
///
/// The player hits with the equipped item's damage, or bare-handed damage
/// when nothing is equipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combat;

#[async_trait]
impl Handler for Combat {
    async fn handle(&self, ctx: &HandlerContext<'_>) -> PluginResult<HandlerResponse> {
        let npc = ctx.entity.as_character().ok_or_else(|| {
            PluginError::Handler(format!("cannot fight the {}", ctx.entity.display_name()))
        })?;
        let player = &ctx.game.player;
        let player_damage = player
            .equipped()
            .and_then(|item| ctx.registry.item_damage(item))
            .unwrap_or(player.damage);

        let outcome = FightOutcome::exchange(player.health, player_damage, npc.health, npc.damage);
        let mut response = HandlerResponse::accepted(ctx.action, outcome.message(npc.display_name()));
        match serde_json::to_value(outcome) {
            Ok(Value::Object(fields)) => response.data = fields,
            Ok(_) => return Err(PluginError::Handler("fight outcome is not an object".into())),
            Err(e) => return Err(PluginError::Handler(e.to_string())),
        }
        Ok(response)
    }
}
