//! Built-in objective predicates.

use async_trait::async_trait;
use tq_core::{Completion, Game, Objective, Realm, SourceReason};

use super::{ObjectiveHandler, PluginError, PluginResult};

fn required<'a>(objective: &'a Objective, name: &str) -> PluginResult<&'a str> {
    objective.param(name).ok_or_else(|| {
        PluginError::Handler(format!(
            "objective \"{}\" is missing parameter \"{name}\"",
            objective.kind
        ))
    })
}

fn satisfied(objective: &Objective, met: bool) -> Option<Objective> {
    met.then(|| Objective {
        completed: Completion::Satisfied,
        ..objective.clone()
    })
}

/// Met once the player has visited the `location` parameter (`"x_y"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigateTo;

#[async_trait]
impl ObjectiveHandler for NavigateTo {
    async fn evaluate(
        &self,
        objective: &Objective,
        game: &Game,
        realm: &Realm,
        _player_name: &str,
    ) -> PluginResult<Option<Objective>> {
        let key = required(objective, "location")?;
        Ok(satisfied(objective, game.player.has_visited(realm.id, key)))
    }
}

/// Met while the player carries at least `count` (default 1) items of type `item`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcquireItem;

#[async_trait]
impl ObjectiveHandler for AcquireItem {
    async fn evaluate(
        &self,
        objective: &Objective,
        game: &Game,
        _realm: &Realm,
        _player_name: &str,
    ) -> PluginResult<Option<Objective>> {
        let kind = required(objective, "item")?;
        let count = match objective.param("count") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                PluginError::Handler(format!("objective count \"{raw}\" is not a number"))
            })?,
            None => 1,
        };
        Ok(satisfied(objective, game.player.count_of(kind) >= count))
    }
}

/// Met while the player carries an `item` acquired by `reason` from `from`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcquireFrom;

#[async_trait]
impl ObjectiveHandler for AcquireFrom {
    async fn evaluate(
        &self,
        objective: &Objective,
        game: &Game,
        _realm: &Realm,
        _player_name: &str,
    ) -> PluginResult<Option<Objective>> {
        let kind = required(objective, "item")?;
        let reason: SourceReason = required(objective, "reason")?
            .parse()
            .map_err(PluginError::Handler)?;
        let from = required(objective, "from")?;
        let met = game
            .player
            .inventory
            .iter()
            .any(|item| item.kind == kind && item.acquired(reason, from));
        Ok(satisfied(objective, met))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tq_core::{GameId, Item, Player, PlayerLocation, RealmId, Source};

    fn setup() -> (Game, Realm) {
        let realm = Realm::new(RealmId::from_u128(7), "Vale", 3, 3);
        let player = Player::new(
            "Ayla",
            10,
            1,
            PlayerLocation {
                realm_id: realm.id,
                x: 0,
                y: 0,
            },
        );
        let game = Game::new(GameId::from_u128(1), "Test", player).with_realm(realm.id, "Vale");
        (game, realm)
    }

    #[tokio::test]
    async fn navigate_to_checks_visited_set() {
        let (mut game, realm) = setup();
        let goal = Objective::new("Reach the tower", "quests", "travel").with_param("location", "2_2");
        assert!(
            NavigateTo
                .evaluate(&goal, &game, &realm, "Ayla")
                .await
                .unwrap()
                .is_none()
        );

        game.player.visit(realm.id, 2, 2);
        let done = NavigateTo
            .evaluate(&goal, &game, &realm, "Ayla")
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed.is_satisfied());
    }

    #[tokio::test]
    async fn acquire_item_counts_inventory() {
        let (mut game, realm) = setup();
        let goal = Objective::new("Hoard", "quests", "items")
            .with_param("item", "coin")
            .with_param("count", "2");
        game.player.inventory.push(Item::new("coin", "loot", "misc"));
        assert!(
            AcquireItem
                .evaluate(&goal, &game, &realm, "Ayla")
                .await
                .unwrap()
                .is_none()
        );
        game.player.inventory.push(Item::new("coin", "loot", "misc"));
        assert!(
            AcquireItem
                .evaluate(&goal, &game, &realm, "Ayla")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn acquire_from_matches_provenance() {
        let (mut game, realm) = setup();
        let goal = Objective::new("Giant's club", "quests", "provenance")
            .with_param("item", "club")
            .with_param("reason", "take from")
            .with_param("from", "Giant");

        let mut found = Item::new("club", "arms", "clubs");
        found.source = Some(Source::new(SourceReason::Take, "open"));
        game.player.inventory.push(found);
        assert!(
            AcquireFrom
                .evaluate(&goal, &game, &realm, "Ayla")
                .await
                .unwrap()
                .is_none()
        );

        let mut earned = Item::new("club", "arms", "clubs");
        earned.source = Some(Source::new(SourceReason::TakeFrom, "Giant"));
        game.player.inventory.push(earned);
        assert!(
            AcquireFrom
                .evaluate(&goal, &game, &realm, "Ayla")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn missing_parameter_is_an_error() {
        let (game, realm) = setup();
        let goal = Objective::new("Broken", "quests", "items");
        assert!(AcquireItem.evaluate(&goal, &game, &realm, "Ayla").await.is_err());
    }
}
