use serde_json::json;
use tq_core::{Source, SourceReason, find_by_type};

use super::{
    ActionContext, Outcome, consult_character, describe_character, location_mut, message_or,
    return_to_character, take_from_character,
};
use crate::error::{EngineError, EngineResult};
use crate::parser::Target;
use crate::plugin::{Action, Subject};

/// `take <item>`: pick an item up off the ground. No handler is consulted.
pub(super) fn do_take(ctx: &mut ActionContext<'_>, item: &Target) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let here = location_mut(ctx.realm, x, y)?;
    let slot = find_by_type(&here.items, &item.kind, item.occurrence)
        .ok_or_else(|| EngineError::TargetNotFound(item.kind.clone()))?;

    let mut taken = here.items.remove(slot);
    taken.source = Some(Source::new(SourceReason::Take, here.environment.kind.clone()));

    let message = format!("You take the {}.", ctx.registry.item_name(&taken));
    let data = json!({ "item": taken });
    ctx.game.player.inventory.push(taken);
    Ok(Outcome::new("take", message, data))
}

/// `take <item> from <npc>`: ask the character to hand an item over.
pub(super) async fn do_take_from(
    ctx: &mut ActionContext<'_>,
    item: &Target,
    npc: &Target,
) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let npc_slot = ctx.character_slot(x, y, npc)?;
    let (key, npc_name) = describe_character(ctx.realm, x, y, npc_slot)?;

    // The item leaves the character before the handler runs
    let (item_slot, mut taken) = take_from_character(ctx.realm, x, y, npc_slot, item)?;
    let item_name = ctx.registry.item_name(&taken);

    let Some(handler) = ctx.registry.resolve_handler(&key, Action::TakeFrom, false) else {
        return_to_character(ctx.realm, x, y, npc_slot, item_slot, taken);
        return Err(EngineError::HandlerAbsent(format!(
            "The {npc_name} won't give you the {item_name}."
        )));
    };

    let verdict = consult_character(
        ctx,
        &handler,
        Action::TakeFrom,
        (x, y, npc_slot),
        Some(Subject::Item(&taken)),
    )
    .await;
    let response = match verdict {
        Ok(response) => response,
        Err(e) => {
            return_to_character(ctx.realm, x, y, npc_slot, item_slot, taken);
            return Err(e);
        }
    };

    taken.source = Some(Source::new(SourceReason::TakeFrom, npc_name.clone()));
    let message = message_or(&response, || {
        format!("You take the {item_name} from the {npc_name}.")
    });
    let data = json!({ "item": taken, "from": npc_name });
    ctx.game.player.inventory.push(taken);
    Ok(Outcome::new(Action::TakeFrom.as_str(), message, data).with_handler_data(response.data))
}
