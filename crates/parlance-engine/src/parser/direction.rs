//! Direction words and their synonyms.

use crate::verbs::MOVE_VERBS;

/// A direction the player can travel in.
///
/// `Unknown` is a legitimate "did not express a direction" result, not an
/// error; callers branch on it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
    /// North-east.
    Northeast,
    /// North-west.
    Northwest,
    /// South-east.
    Southeast,
    /// South-west.
    Southwest,
    /// Upward.
    Up,
    /// Downward.
    Down,
    /// Inward.
    In,
    /// Outward.
    Out,
    /// The text did not express a direction.
    Unknown,
}

impl Direction {
    /// Parse free text into a direction.
    ///
    /// Case-insensitive; trims whitespace and strips one leading movement
    /// verb ("go north", "walk east"). The whole remaining string is tried
    /// against the synonym table before falling back to its first word, so
    /// "south west" resolves the same as "south-west" and "sw".
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_lowercase();
        let text = match text.split_once(' ') {
            Some((first, rest)) if MOVE_VERBS.contains(&first) => rest.trim(),
            _ => text.as_str(),
        };

        if let Some(direction) = Self::from_word(text) {
            return direction;
        }
        text.split_whitespace()
            .next()
            .and_then(Self::from_word)
            .unwrap_or(Self::Unknown)
    }

    /// Whether the text is nothing but a direction.
    pub fn is_direction(text: &str) -> bool {
        Self::parse(text) != Self::Unknown
    }

    /// The canonical name, matching the vocabulary the parsing oracle is
    /// instructed to use.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Northeast => "north-east",
            Self::Northwest => "north-west",
            Self::Southeast => "south-east",
            Self::Southwest => "south-west",
            Self::Up => "up",
            Self::Down => "down",
            Self::In => "in",
            Self::Out => "out",
            Self::Unknown => "unknown",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word {
            "n" | "north" | "fore" => Some(Self::North),
            "s" | "south" | "aft" => Some(Self::South),
            "e" | "east" | "starboard" => Some(Self::East),
            "w" | "west" | "port" => Some(Self::West),
            "ne" | "north-east" | "north east" | "northeast" => Some(Self::Northeast),
            "nw" | "north-west" | "north west" | "northwest" => Some(Self::Northwest),
            "se" | "south-east" | "south east" | "southeast" => Some(Self::Southeast),
            "sw" | "south-west" | "south west" | "southwest" => Some(Self::Southwest),
            "u" | "up" | "climb" => Some(Self::Up),
            "d" | "down" => Some(Self::Down),
            "in" | "enter" => Some(Self::In),
            "out" | "exit" => Some(Self::Out),
            _ => None,
        }
    }
}
