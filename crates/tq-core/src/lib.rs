//! Core types for Tilequest: games, realms, and everything that lives on the map.
//!
//! This crate defines the two persisted aggregates ([`Game`] and [`Realm`])
//! and the entities they own. It is independent of the command engine: you
//! can construct a world programmatically or deserialize one from JSON.

/// Non-player characters and their stats.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// The game aggregate: the player and the realms they may enter.
pub mod game;
/// Identifier newtypes.
pub mod id;
/// Items and their acquisition provenance.
pub mod item;
/// Grid cells of a realm.
pub mod location;
/// The realm aggregate and its quest objectives.
pub mod realm;
/// Type-based lookup of entities inside containers.
pub mod resolve;

/// Re-export character types.
pub use character::Character;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export game aggregate types.
pub use game::{Game, Player, PlayerLocation, RealmRef};
/// Re-export identifiers.
pub use id::{CharacterId, GameId, ItemId, RealmId};
/// Re-export item types.
pub use item::{Item, Source, SourceReason};
/// Re-export location types.
pub use location::{Environment, MapLocation, location_key};
/// Re-export realm aggregate types.
pub use realm::{Completion, Objective, ObjectiveParam, Realm};
/// Re-export resolver entry points.
pub use resolve::{Typed, find_by_type, find_player_by_name};
