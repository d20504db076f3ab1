//! Command parsing and verb suggestions.

mod command;
mod suggest;

pub use command::{Command, Direction, Target, VERBS, parse_command};
pub use suggest::suggest_verb;
