use serde_json::json;

use super::{ActionContext, Outcome, consult, location_mut, message_or};
use crate::error::{EngineError, EngineResult};
use crate::parser::Target;
use crate::plugin::{Action, PluginKey, Subject};

/// `drop <item>`: leave a carried item at the current location.
pub(super) fn do_drop(ctx: &mut ActionContext<'_>, item: &Target) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let slot = ctx.inventory_slot(item)?;
    let here = location_mut(ctx.realm, x, y)?;

    let dropped = ctx.game.player.inventory.remove(slot);
    ctx.game.player.unequip_if(dropped.id);

    let message = format!("You drop the {}.", ctx.registry.item_name(&dropped));
    let data = json!({ "item": dropped });
    here.items.push(dropped);
    Ok(Outcome::new("drop", message, data))
}

/// `use <item>`: equip a carried item if its plugin allows it.
pub(super) async fn do_use(ctx: &mut ActionContext<'_>, item: &Target) -> EngineResult<Outcome> {
    ctx.position()?;
    let slot = ctx.inventory_slot(item)?;
    let chosen = ctx
        .game
        .player
        .inventory
        .get(slot)
        .ok_or_else(|| EngineError::NotInInventory(item.kind.clone()))?;
    let (key, id, name) = (
        PluginKey::of_item(chosen),
        chosen.id,
        ctx.registry.item_name(chosen),
    );

    let handler = ctx
        .registry
        .resolve_handler(&key, Action::Use, false)
        .ok_or_else(|| EngineError::HandlerAbsent(format!("You can't use the {name}.")))?;

    let response = {
        let hctx = ctx.handler_context(Action::Use, Subject::Item(chosen), None);
        consult(&handler, &hctx).await?
    };

    ctx.game.player.using = Some(id);
    let message = message_or(&response, || format!("You are now using the {name}."));
    Ok(Outcome::new(Action::Use.as_str(), message, json!({ "using": id }))
        .with_handler_data(response.data))
}
