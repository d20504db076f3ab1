use serde_json::{Value, json};
use tq_core::{Item, Source, SourceReason};
use tracing::{debug, warn};

use super::{
    ActionContext, Outcome, character_mut, consult_character, describe_character, location_mut,
    message_or, restore, return_to_character, take_from_character,
};
use crate::error::{EngineError, EngineResult};
use crate::parser::Target;
use crate::plugin::{Action, FightOutcome, HandlerResponse, Subject};

/// `fight <npc> [for <item>]`: one round of combat, optionally for a prize.
pub(super) async fn do_fight(
    ctx: &mut ActionContext<'_>,
    target: &Target,
    prize: Option<&Target>,
) -> EngineResult<Outcome> {
    let action = if prize.is_some() {
        Action::FightFor
    } else {
        Action::Fight
    };
    let (x, y) = ctx.position()?;
    let slot = ctx.character_slot(x, y, target)?;
    let (key, npc_name) = describe_character(ctx.realm, x, y, slot)?;

    // The contested item leaves the character before the fight
    let contested = match prize {
        Some(prize) => Some(take_from_character(ctx.realm, x, y, slot, prize)?),
        None => None,
    };

    let Some(handler) = ctx
        .registry
        .resolve_handler(&key, action, action.allows_default_fallback())
    else {
        give_back(ctx, (x, y, slot), contested);
        return Err(EngineError::HandlerAbsent(format!(
            "The {npc_name} will not fight."
        )));
    };

    let verdict = consult_character(
        ctx,
        &handler,
        action,
        (x, y, slot),
        contested.as_ref().map(|(_, item)| Subject::Item(item)),
    )
    .await
    .and_then(|response| Ok((parse_outcome(&response)?, response)));
    let (outcome, response) = match verdict {
        Ok(verdict) => verdict,
        Err(e) => {
            give_back(ctx, (x, y, slot), contested);
            return Err(e);
        }
    };

    ctx.game.player.set_health(outcome.player_health);

    let npc = character_mut(ctx.realm, x, y, slot)?;
    npc.set_health(outcome.character_health);
    let mut won = None;
    if let Some((item_slot, mut item)) = contested {
        if outcome.player_won {
            item.source = Some(Source::new(SourceReason::TakeFrom, npc_name.clone()));
            won = Some(item);
        } else {
            restore(&mut npc.inventory, item_slot, item);
        }
    }

    // A dead character leaves everything it had on the ground
    let mut spilled = 0;
    if outcome.character_died {
        let here = location_mut(ctx.realm, x, y)?;
        let mut dead = here.characters.remove(slot);
        let items = dead.spill();
        spilled = items.len();
        here.items.extend(items);
        debug!(character = %npc_name, spilled, "character died");
    }
    if outcome.player_died {
        debug!(player = %ctx.player_name, "player died");
    }

    let message = message_or(&response, || format!("You fight the {npc_name}."));
    let mut data = match serde_json::to_value(outcome) {
        Ok(value) => value,
        Err(e) => return Err(EngineError::ContractViolation(e.to_string())),
    };
    if let Value::Object(fields) = &mut data {
        fields.insert("spilled".to_string(), json!(spilled));
        if let Some(item) = &won {
            fields.insert("prize".to_string(), json!(item));
        }
    }
    if let Some(item) = won {
        ctx.game.player.inventory.push(item);
    }
    Ok(Outcome::new(action.as_str(), message, data).with_handler_data(response.data))
}

/// All five fields are required; anything less breaks the fight contract.
fn parse_outcome(response: &HandlerResponse) -> EngineResult<FightOutcome> {
    serde_json::from_value(Value::Object(response.data.clone())).map_err(|e| {
        warn!(error = %e, "fight handler returned an incomplete outcome");
        EngineError::ContractViolation(format!("incomplete fight result: {e}"))
    })
}

fn give_back(ctx: &mut ActionContext<'_>, (x, y, slot): (i32, i32, usize), contested: Option<(usize, Item)>) {
    if let Some((item_slot, item)) = contested {
        return_to_character(ctx.realm, x, y, slot, item_slot, item);
    }
}
