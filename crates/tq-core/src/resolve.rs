//! Type-based entity lookup.
//!
//! Commands name targets by catalog type (`take coin`, `fight night spider`),
//! never by instance. Lookup is an exact, case-sensitive match on the type
//! key over a container's slots in order; several instances of one type are
//! told apart only by their ordinal position.

use crate::character::Character;
use crate::game::{Game, Player};
use crate::item::Item;

/// Anything addressable by catalog type.
pub trait Typed {
    /// The catalog type key.
    fn kind(&self) -> &str;
}

impl Typed for Item {
    fn kind(&self) -> &str {
        &self.kind
    }
}

impl Typed for Character {
    fn kind(&self) -> &str {
        &self.kind
    }
}

/// Find the slot of the `occurrence`-th entity (1-based) whose type is `kind`.
pub fn find_by_type<T: Typed>(entities: &[T], kind: &str, occurrence: usize) -> Option<usize> {
    if occurrence == 0 {
        return None;
    }
    entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind() == kind)
        .nth(occurrence - 1)
        .map(|(idx, _)| idx)
}

/// Find the game's player by exact name.
pub fn find_player_by_name<'a>(game: &'a Game, name: &str) -> Option<&'a Player> {
    (game.player.name == name).then_some(&game.player)
}
