use serde_json::json;
use tq_core::{Source, SourceReason, find_by_type};

use super::{
    ActionContext, Outcome, character_mut, consult_character, describe_character, message_or,
    restore, return_to_character, take_from_character,
};
use crate::error::{EngineError, EngineResult};
use crate::parser::Target;
use crate::plugin::{Action, Subject};

/// `buy <item> from <npc>`: the seller hands over the item for a payment.
pub(super) async fn do_buy(
    ctx: &mut ActionContext<'_>,
    item: &Target,
    seller: &Target,
) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let seller_slot = ctx.character_slot(x, y, seller)?;
    let (key, seller_name) = describe_character(ctx.realm, x, y, seller_slot)?;

    let (item_slot, mut bought) = take_from_character(ctx.realm, x, y, seller_slot, item)?;
    let item_name = ctx.registry.item_name(&bought);

    let Some(handler) = ctx.registry.resolve_handler(&key, Action::BuyFrom, false) else {
        return_to_character(ctx.realm, x, y, seller_slot, item_slot, bought);
        return Err(EngineError::HandlerAbsent(format!(
            "The {seller_name} won't sell you the {item_name}."
        )));
    };

    let verdict = consult_character(
        ctx,
        &handler,
        Action::BuyFrom,
        (x, y, seller_slot),
        Some(Subject::Item(&bought)),
    )
    .await;
    let response = match verdict {
        Ok(response) => response,
        Err(e) => {
            return_to_character(ctx.realm, x, y, seller_slot, item_slot, bought);
            return Err(e);
        }
    };

    // Settle the payment the seller asked for, if any
    let payment = match response.data.get("payment") {
        None => None,
        Some(value) => match value.as_str() {
            Some(kind) => Some(kind.to_string()),
            None => {
                return_to_character(ctx.realm, x, y, seller_slot, item_slot, bought);
                return Err(EngineError::ContractViolation(
                    "payment must name an item type".to_string(),
                ));
            }
        },
    };
    if let Some(kind) = &payment {
        let Some(pay_slot) = find_by_type(&ctx.game.player.inventory, kind, 1) else {
            return_to_character(ctx.realm, x, y, seller_slot, item_slot, bought);
            return Err(EngineError::HandlerRejected(format!(
                "You have no {kind} to pay with."
            )));
        };
        let mut coin = ctx.game.player.inventory.remove(pay_slot);
        ctx.game.player.unequip_if(coin.id);
        coin.source = Some(Source::new(SourceReason::Give, ctx.player_name));
        character_mut(ctx.realm, x, y, seller_slot)?.inventory.push(coin);
    }

    bought.source = Some(Source::new(SourceReason::BuyFrom, seller_name.clone()));
    let message = message_or(&response, || {
        format!("You buy the {item_name} from the {seller_name}.")
    });
    let data = json!({ "item": bought, "from": seller_name, "payment": payment });
    ctx.game.player.inventory.push(bought);
    Ok(Outcome::new(Action::BuyFrom.as_str(), message, data).with_handler_data(response.data))
}

/// `give <item> to <npc>`: hand a carried item to a character.
pub(super) async fn do_give(
    ctx: &mut ActionContext<'_>,
    item: &Target,
    recipient: &Target,
) -> EngineResult<Outcome> {
    let (x, y) = ctx.position()?;
    let npc_slot = ctx.character_slot(x, y, recipient)?;
    let (key, npc_name) = describe_character(ctx.realm, x, y, npc_slot)?;

    // The item leaves the player before the handler runs
    let item_slot = ctx.inventory_slot(item)?;
    let mut given = ctx.game.player.inventory.remove(item_slot);
    let item_name = ctx.registry.item_name(&given);

    let Some(handler) = ctx.registry.resolve_handler(&key, Action::Give, false) else {
        restore(&mut ctx.game.player.inventory, item_slot, given);
        return Err(EngineError::HandlerAbsent(format!(
            "The {npc_name} doesn't want the {item_name}."
        )));
    };

    let verdict = consult_character(
        ctx,
        &handler,
        Action::Give,
        (x, y, npc_slot),
        Some(Subject::Item(&given)),
    )
    .await;
    let response = match verdict {
        Ok(response) => response,
        Err(e) => {
            restore(&mut ctx.game.player.inventory, item_slot, given);
            return Err(e);
        }
    };

    let given_id = given.id;
    given.source = Some(Source::new(SourceReason::Give, ctx.player_name));
    let data = json!({ "item": given, "to": npc_name });
    match character_mut(ctx.realm, x, y, npc_slot) {
        Ok(npc) => npc.inventory.push(given),
        Err(e) => {
            restore(&mut ctx.game.player.inventory, item_slot, given);
            return Err(e);
        }
    }
    ctx.game.player.unequip_if(given_id);

    let message = message_or(&response, || {
        format!("You give the {item_name} to the {npc_name}.")
    });
    Ok(Outcome::new(Action::Give.as_str(), message, data).with_handler_data(response.data))
}

#[cfg(test)]
mod tests {
    use super::super::execute;
    use super::super::fixtures::*;
    use super::*;
    use crate::parser::parse_command;
    use crate::plugin::PluginRegistry;
    use tq_core::{Game, Item, Realm};

    async fn run(
        game: &mut Game,
        realm: &mut Realm,
        registry: &PluginRegistry,
        line: &str,
    ) -> EngineResult<Outcome> {
        let mut ctx = ActionContext {
            game,
            realm,
            registry,
            player_name: PLAYER,
        };
        execute(&mut ctx, parse_command(line)).await
    }

    fn giant(realm: &Realm) -> &tq_core::Character {
        &realm.location_at(0, 0).unwrap().characters[0]
    }

    fn merchant(realm: &Realm) -> &tq_core::Character {
        &realm.location_at(0, 0).unwrap().characters[2]
    }

    #[tokio::test]
    async fn give_moves_item_and_clears_using() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        let food = Item::new("food", "loot", "misc");
        game.player.using = Some(food.id);
        game.player.inventory.push(food);

        let outcome = run(&mut game, &mut realm, &registry, "give food to Giant")
            .await
            .unwrap();

        assert_eq!(outcome.message, "The Giant accepts the food.");
        assert!(game.player.inventory.is_empty());
        assert_eq!(game.player.using, None);
        let received = giant(&realm).inventory.last().unwrap();
        assert_eq!(received.kind, "food");
        assert!(received.acquired(SourceReason::Give, PLAYER));
    }

    #[tokio::test]
    async fn give_without_handler_keeps_item() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        let food = Item::new("food", "loot", "misc");
        let food_id = food.id;
        game.player.using = Some(food_id);
        game.player.inventory.push(food);
        let game_before = game.clone();

        let err = run(&mut game, &mut realm, &registry, "give food to night spider")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The night spider doesn't want the food.");
        assert_eq!(game, game_before);
        assert_eq!(game.player.using, Some(food_id));
    }

    #[tokio::test]
    async fn give_unknown_item() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        let err = run(&mut game, &mut realm, &registry, "give food to Giant")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You have no food.");
    }

    #[tokio::test]
    async fn buy_exchanges_item_for_payment() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        game.player.inventory.push(Item::new("coin", "loot", "misc"));

        let outcome = run(
            &mut game,
            &mut realm,
            &registry,
            "buy healing potion from merchant",
        )
        .await
        .unwrap();

        assert_eq!(outcome.data["payment"], "coin");
        assert_eq!(game.player.inventory.len(), 1);
        let potion = &game.player.inventory[0];
        assert!(potion.acquired(SourceReason::BuyFrom, "merchant"));
        let seller = merchant(&realm);
        assert_eq!(seller.inventory.len(), 1);
        assert_eq!(seller.inventory[0].kind, "coin");
    }

    #[tokio::test]
    async fn buy_without_payment_is_rolled_back() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        let realm_before = realm.clone();
        let err = run(
            &mut game,
            &mut realm,
            &registry,
            "buy healing potion from merchant",
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "You have no coin to pay with.");
        assert_eq!(realm, realm_before);
        assert!(game.player.inventory.is_empty());
    }

    #[tokio::test]
    async fn buy_from_character_who_does_not_sell() {
        let (mut game, mut realm, registry) = (game(), realm(), registry());
        let realm_before = realm.clone();
        let err = run(&mut game, &mut realm, &registry, "buy club from Giant")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The Giant won't sell you the club.");
        assert_eq!(realm, realm_before);
    }
}
