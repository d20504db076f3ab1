//! Action pipelines: resolve targets, consult the handler, commit the result.
//!
//! Every pipeline that moves an item out of a container does so before it
//! asks the handler (pessimistic removal) and puts the item back in its
//! original slot if the handler is absent, fails, or breaks its contract.

mod equip;
mod fight;
mod movement;
mod take;
mod trade;

use serde_json::{Map, Value};
use tq_core::{Character, Game, Item, MapLocation, Realm, find_by_type};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::parser::{Command, Target};
use crate::plugin::{
    Action, HandlerContext, HandlerResponse, PluginKey, PluginRegistry, SharedHandler, Subject,
};

/// Mutable view of the world for one command.
pub(crate) struct ActionContext<'a> {
    pub game: &'a mut Game,
    pub realm: &'a mut Realm,
    pub registry: &'a PluginRegistry,
    pub player_name: &'a str,
}

/// What a successful action did. Every successful action mutated the world.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    /// Action name for the envelope.
    pub action: &'static str,
    /// Player-facing message.
    pub message: String,
    /// Action-specific details.
    pub data: Value,
}

impl Outcome {
    fn new(action: &'static str, message: impl Into<String>, data: Value) -> Self {
        Self {
            action,
            message: message.into(),
            data,
        }
    }

    /// Merge handler-supplied data under the action's own fields.
    fn with_handler_data(mut self, extra: Map<String, Value>) -> Self {
        if let Value::Object(fields) = &mut self.data {
            for (key, value) in extra {
                fields.entry(key).or_insert(value);
            }
        }
        self
    }
}

/// Run a parsed command against the world.
pub(crate) async fn execute(ctx: &mut ActionContext<'_>, command: Command) -> EngineResult<Outcome> {
    match command {
        Command::Move { direction } => movement::do_move(ctx, direction),
        Command::Take { item, from: None } => take::do_take(ctx, &item),
        Command::Take {
            item,
            from: Some(npc),
        } => take::do_take_from(ctx, &item, &npc).await,
        Command::Buy { item, from } => trade::do_buy(ctx, &item, &from).await,
        Command::Give { item, to } => trade::do_give(ctx, &item, &to).await,
        Command::Drop { item } => equip::do_drop(ctx, &item),
        Command::Use { item } => equip::do_use(ctx, &item).await,
        Command::Fight { target, prize } => fight::do_fight(ctx, &target, prize.as_ref()).await,
        Command::Incomplete { usage } => Err(EngineError::InvalidCommand(usage)),
        Command::Unknown { verb } => Err(EngineError::UnknownCommand(verb)),
    }
}

impl ActionContext<'_> {
    /// The player's coordinates, checked against the loaded realm.
    fn position(&self) -> EngineResult<(i32, i32)> {
        let at = self.game.player.location;
        if at.realm_id != self.realm.id || self.realm.location_at(at.x, at.y).is_none() {
            return Err(EngineError::LocationNotFound(
                "You are nowhere on the map.".to_string(),
            ));
        }
        Ok((at.x, at.y))
    }

    /// Slot of a carried item.
    fn inventory_slot(&self, target: &Target) -> EngineResult<usize> {
        find_by_type(&self.game.player.inventory, &target.kind, target.occurrence)
            .ok_or_else(|| EngineError::NotInInventory(target.kind.clone()))
    }

    /// Slot of a character at the player's location.
    fn character_slot(&self, x: i32, y: i32, target: &Target) -> EngineResult<usize> {
        let here = location(self.realm, x, y)?;
        find_by_type(&here.characters, &target.kind, target.occurrence)
            .ok_or_else(|| EngineError::TargetNotFound(target.kind.clone()))
    }

    /// A read-only handler context over the current world.
    fn handler_context<'c>(
        &'c self,
        action: Action,
        entity: Subject<'c>,
        counterpart: Option<Subject<'c>>,
    ) -> HandlerContext<'c> {
        HandlerContext {
            action,
            entity,
            counterpart,
            game: &*self.game,
            realm: &*self.realm,
            player_name: self.player_name,
            registry: self.registry,
        }
    }
}

fn location(realm: &Realm, x: i32, y: i32) -> EngineResult<&MapLocation> {
    realm
        .location_at(x, y)
        .ok_or_else(|| EngineError::LocationNotFound(format!("There is no place at ({x}, {y}).")))
}

fn location_mut(realm: &mut Realm, x: i32, y: i32) -> EngineResult<&mut MapLocation> {
    realm
        .location_at_mut(x, y)
        .ok_or_else(|| EngineError::LocationNotFound(format!("There is no place at ({x}, {y}).")))
}

fn character(realm: &Realm, x: i32, y: i32, slot: usize) -> EngineResult<&Character> {
    location(realm, x, y)?
        .characters
        .get(slot)
        .ok_or_else(|| EngineError::TargetNotFound("character".to_string()))
}

fn character_mut(realm: &mut Realm, x: i32, y: i32, slot: usize) -> EngineResult<&mut Character> {
    location_mut(realm, x, y)?
        .characters
        .get_mut(slot)
        .ok_or_else(|| EngineError::TargetNotFound("character".to_string()))
}

/// Plugin key and display name of a character.
fn describe_character(realm: &Realm, x: i32, y: i32, slot: usize) -> EngineResult<(PluginKey, String)> {
    let npc = character(realm, x, y, slot)?;
    Ok((PluginKey::of_character(npc), npc.display_name().to_string()))
}

/// Remove the `target` item from a character's inventory, returning its slot.
fn take_from_character(
    realm: &mut Realm,
    x: i32,
    y: i32,
    slot: usize,
    target: &Target,
) -> EngineResult<(usize, Item)> {
    let npc = character_mut(realm, x, y, slot)?;
    let item_slot = find_by_type(&npc.inventory, &target.kind, target.occurrence).ok_or_else(|| {
        EngineError::NotCarried {
            holder: npc.display_name().to_string(),
            item: target.kind.clone(),
        }
    })?;
    Ok((item_slot, npc.inventory.remove(item_slot)))
}

/// Undo [`take_from_character`].
fn return_to_character(realm: &mut Realm, x: i32, y: i32, slot: usize, item_slot: usize, item: Item) {
    match character_mut(realm, x, y, slot) {
        Ok(npc) => restore(&mut npc.inventory, item_slot, item),
        Err(e) => warn!(item = %item.kind, error = %e, "could not return item to its owner"),
    }
}

/// Put an item back where it was taken from.
fn restore(container: &mut Vec<Item>, slot: usize, item: Item) {
    let slot = slot.min(container.len());
    container.insert(slot, item);
}

/// Run a handler and turn anything but an explicit success into an error.
async fn consult(handler: &SharedHandler, ctx: &HandlerContext<'_>) -> EngineResult<HandlerResponse> {
    let response = handler.handle(ctx).await?;
    match response.description.success {
        Some(true) => Ok(response),
        Some(false) => {
            let message = response
                .description
                .message
                .unwrap_or_else(|| format!("The {} refuses.", ctx.entity.display_name()));
            Err(EngineError::HandlerRejected(message))
        }
        None => {
            warn!(action = %ctx.action, "handler response has no success flag");
            Err(EngineError::ContractViolation(format!(
                "the {} handler did not report success or failure",
                ctx.action
            )))
        }
    }
}

/// Ask a character's handler about `action`.
async fn consult_character(
    ctx: &ActionContext<'_>,
    handler: &SharedHandler,
    action: Action,
    (x, y, slot): (i32, i32, usize),
    counterpart: Option<Subject<'_>>,
) -> EngineResult<HandlerResponse> {
    let npc = character(ctx.realm, x, y, slot)?;
    let hctx = ctx.handler_context(action, Subject::Character(npc), counterpart);
    consult(handler, &hctx).await
}

/// The handler's message, or `fallback` when it gave none.
fn message_or(response: &HandlerResponse, fallback: impl FnOnce() -> String) -> String {
    response
        .description
        .message
        .clone()
        .unwrap_or_else(fallback)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::parser::parse_command;

    async fn run(game: &mut Game, realm: &mut Realm, line: &str) -> EngineResult<Outcome> {
        let registry = registry();
        let mut ctx = ActionContext {
            game,
            realm,
            registry: &registry,
            player_name: PLAYER,
        };
        execute(&mut ctx, parse_command(line)).await
    }

    #[tokio::test]
    async fn unknown_and_incomplete_commands_fail() {
        let (mut game, mut realm) = (game(), realm());
        assert!(matches!(
            run(&mut game, &mut realm, "dance").await,
            Err(EngineError::UnknownCommand(_))
        ));
        assert!(matches!(
            run(&mut game, &mut realm, "give food").await,
            Err(EngineError::InvalidCommand(_))
        ));
    }

    #[tokio::test]
    async fn player_off_the_map_cannot_act() {
        let (mut game, mut realm) = (game(), realm());
        game.player.location.x = 2;
        game.player.location.y = 2;
        assert!(matches!(
            run(&mut game, &mut realm, "take coin").await,
            Err(EngineError::LocationNotFound(_))
        ));
    }

    #[test]
    fn restore_clamps_to_container_length() {
        let mut items = vec![Item::new("a", "m", "f")];
        restore(&mut items, 5, Item::new("b", "m", "f"));
        assert_eq!(items[1].kind, "b");
        restore(&mut items, 0, Item::new("c", "m", "f"));
        assert_eq!(items[0].kind, "c");
    }
}
