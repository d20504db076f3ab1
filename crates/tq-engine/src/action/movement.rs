use serde_json::json;
use tracing::debug;

use super::{ActionContext, Outcome};
use crate::error::{EngineError, EngineResult};
use crate::parser::Direction;

pub(super) fn do_move(ctx: &mut ActionContext<'_>, direction: Direction) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let (dx, dy) = direction.delta();
    let boundary =
        || EngineError::LocationNotFound(format!("You can't go {} from here.", direction.name()));

    // The map edge is wherever there is no location
    let (to_x, to_y) = x
        .checked_add(dx)
        .zip(y.checked_add(dy))
        .ok_or_else(boundary)?;
    let destination = ctx.realm.location_at(to_x, to_y).ok_or_else(boundary)?;
    let description = ctx
        .registry
        .environment_description(&destination.environment)
        .map(str::to_owned);

    ctx.game.player.location.x = to_x;
    ctx.game.player.location.y = to_y;
    let first_visit = ctx.game.player.visit(ctx.realm.id, to_x, to_y);
    debug!(x = to_x, y = to_y, first_visit, "player moved");

    let mut message = format!("You go {}.", direction.name());
    if let Some(description) = description {
        message.push(' ');
        message.push_str(&description);
    }
    Ok(Outcome::new(
        "move",
        message,
        json!({ "x": to_x, "y": to_y, "firstVisit": first_visit }),
    ))
}
