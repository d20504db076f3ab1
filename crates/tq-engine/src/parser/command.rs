//! Command parsing for player input.
//!
//! The first whitespace-separated token is the verb. Each verb has its own
//! small sub-grammar over the remaining tokens:
//!
//! ```text
//! move <direction>
//! take <item> [from <npc>]
//! buy <item> from <npc>
//! drop <item>
//! give <item> to <npc>
//! use <item>
//! fight <npc> [for <item>]
//! ```
//!
//! Entity names are catalog types and are kept verbatim (case-sensitive).
//! A leading numeric ordinal (`2nd coin`) picks a later instance of a type.

/// Direction for movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// North.
    North,
    /// Northeast.
    Northeast,
    /// East.
    East,
    /// Southeast.
    Southeast,
    /// South.
    South,
    /// Southwest.
    Southwest,
    /// West.
    West,
    /// Northwest.
    Northwest,
}

impl Direction {
    /// All eight compass directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::Northeast,
        Self::East,
        Self::Southeast,
        Self::South,
        Self::Southwest,
        Self::West,
        Self::Northwest,
    ];

    /// Parse a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "ne" | "northeast" => Some(Self::Northeast),
            "e" | "east" => Some(Self::East),
            "se" | "southeast" => Some(Self::Southeast),
            "s" | "south" => Some(Self::South),
            "sw" | "southwest" => Some(Self::Southwest),
            "w" | "west" => Some(Self::West),
            "nw" | "northwest" => Some(Self::Northwest),
            _ => None,
        }
    }

    /// Get the display name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::Northeast => "northeast",
            Self::East => "east",
            Self::Southeast => "southeast",
            Self::South => "south",
            Self::Southwest => "southwest",
            Self::West => "west",
            Self::Northwest => "northwest",
        }
    }

    /// Coordinate delta `(dx, dy)`. North increases `y`.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::Northeast => (1, 1),
            Self::East => (1, 0),
            Self::Southeast => (1, -1),
            Self::South => (0, -1),
            Self::Southwest => (-1, -1),
            Self::West => (-1, 0),
            Self::Northwest => (-1, 1),
        }
    }
}

/// An entity named in a command: a catalog type plus a 1-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Catalog type key.
    pub kind: String,
    /// Which matching instance, counting from 1.
    pub occurrence: usize,
}

impl Target {
    /// The first instance of `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            occurrence: 1,
        }
    }

    /// The `occurrence`-th instance of `kind`.
    pub fn nth(kind: impl Into<String>, occurrence: usize) -> Self {
        Self {
            kind: kind.into(),
            occurrence,
        }
    }

    fn from_words(words: &[&str]) -> Option<Self> {
        let (first, rest) = words.split_first()?;
        if let Some(n) = parse_ordinal(first)
            && !rest.is_empty()
        {
            return Some(Self::nth(rest.join(" "), n));
        }
        Some(Self::new(words.join(" ")))
    }
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Step one cell in a compass direction.
    Move {
        /// The direction to move.
        direction: Direction,
    },
    /// Pick up an item from the ground or from a character.
    Take {
        /// The item.
        item: Target,
        /// The character to take it from, if any.
        from: Option<Target>,
    },
    /// Buy an item from a character.
    Buy {
        /// The item.
        item: Target,
        /// The seller.
        from: Target,
    },
    /// Put an item down at the current location.
    Drop {
        /// The item.
        item: Target,
    },
    /// Hand an item to a character.
    Give {
        /// The item.
        item: Target,
        /// The recipient.
        to: Target,
    },
    /// Equip an item.
    Use {
        /// The item.
        item: Target,
    },
    /// Fight a character, optionally for an item it carries.
    Fight {
        /// The opponent.
        target: Target,
        /// The contested item.
        prize: Option<Target>,
    },
    /// A known verb whose arguments do not fit its grammar.
    Incomplete {
        /// What the player should have typed.
        usage: String,
    },
    /// An unrecognized verb.
    Unknown {
        /// The verb as typed.
        verb: String,
    },
}

impl Command {
    /// The verb this command was parsed from, if it was recognized.
    pub fn verb(&self) -> Option<&'static str> {
        match self {
            Self::Move { .. } => Some("move"),
            Self::Take { .. } => Some("take"),
            Self::Buy { .. } => Some("buy"),
            Self::Drop { .. } => Some("drop"),
            Self::Give { .. } => Some("give"),
            Self::Use { .. } => Some("use"),
            Self::Fight { .. } => Some("fight"),
            Self::Incomplete { .. } | Self::Unknown { .. } => None,
        }
    }
}

/// Verbs the engine recognizes.
pub const VERBS: &[&str] = &["move", "take", "buy", "drop", "give", "use", "fight"];

/// Parse a player input string into a command.
pub fn parse_command(input: &str) -> Command {
    let words: Vec<&str> = input.split_whitespace().collect();
    let Some((verb, rest)) = words.split_first() else {
        return Command::Unknown {
            verb: String::new(),
        };
    };

    match verb.to_lowercase().as_str() {
        "move" => parse_move(rest),
        "take" => parse_take(rest),
        "buy" => parse_buy(rest),
        "drop" => parse_single(rest, "Drop what?", |item| Command::Drop { item }),
        "give" => parse_give(rest),
        "use" => parse_single(rest, "Use what?", |item| Command::Use { item }),
        "fight" => parse_fight(rest),
        _ => Command::Unknown {
            verb: (*verb).to_string(),
        },
    }
}

/// Accepts `1st`, `2nd`, `3rd`, `4th`, ... (any numeric prefix with a suffix).
fn parse_ordinal(word: &str) -> Option<usize> {
    let lower = word.to_ascii_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

/// Split `words` at the first occurrence of `keyword`.
fn split_at_keyword<'a>(words: &'a [&'a str], keyword: &str) -> Option<(&'a [&'a str], &'a [&'a str])> {
    let pos = words.iter().position(|w| w.eq_ignore_ascii_case(keyword))?;
    Some((&words[..pos], &words[pos + 1..]))
}

fn incomplete(usage: &str) -> Command {
    Command::Incomplete {
        usage: usage.to_string(),
    }
}

fn parse_move(rest: &[&str]) -> Command {
    match rest {
        [word] => match Direction::parse(word) {
            Some(direction) => Command::Move { direction },
            None => incomplete(&format!("\"{word}\" is not a direction.")),
        },
        _ => incomplete("Move where? Try a compass direction such as north or southwest."),
    }
}

fn parse_take(rest: &[&str]) -> Command {
    let (item_words, from) = match split_at_keyword(rest, "from") {
        Some((item, npc)) => match Target::from_words(npc) {
            Some(npc) => (item, Some(npc)),
            None => return incomplete("Take it from whom?"),
        },
        None => (rest, None),
    };
    match Target::from_words(item_words) {
        Some(item) => Command::Take { item, from },
        None => incomplete("Take what?"),
    }
}

fn parse_buy(rest: &[&str]) -> Command {
    let Some((item_words, npc_words)) = split_at_keyword(rest, "from") else {
        return incomplete("Buy it from whom? Try: buy <item> from <character>.");
    };
    match (Target::from_words(item_words), Target::from_words(npc_words)) {
        (Some(item), Some(from)) => Command::Buy { item, from },
        (None, _) => incomplete("Buy what?"),
        (_, None) => incomplete("Buy it from whom?"),
    }
}

fn parse_give(rest: &[&str]) -> Command {
    let Some((item_words, npc_words)) = split_at_keyword(rest, "to") else {
        return incomplete("Give it to whom? Try: give <item> to <character>.");
    };
    match (Target::from_words(item_words), Target::from_words(npc_words)) {
        (Some(item), Some(to)) => Command::Give { item, to },
        (None, _) => incomplete("Give what?"),
        (_, None) => incomplete("Give it to whom?"),
    }
}

fn parse_fight(rest: &[&str]) -> Command {
    let (npc_words, prize) = match split_at_keyword(rest, "for") {
        Some((npc, item)) => match Target::from_words(item) {
            Some(item) => (npc, Some(item)),
            None => return incomplete("Fight for what?"),
        },
        None => (rest, None),
    };
    match Target::from_words(npc_words) {
        Some(target) => Command::Fight { target, prize },
        None => incomplete("Fight whom?"),
    }
}

fn parse_single(rest: &[&str], usage: &str, build: impl FnOnce(Target) -> Command) -> Command {
    match Target::from_words(rest) {
        Some(item) => build(item),
        None => incomplete(usage),
    }
}
