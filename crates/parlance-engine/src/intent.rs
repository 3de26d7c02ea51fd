//! The structured command model.
//!
//! Every player turn distills to exactly one [`Intent`]. The enum is closed
//! on purpose: the dispatcher matches exhaustively, so a new variant forces
//! every dispatch arm to be revisited at compile time.

use crate::parser::Direction;
use crate::verbs;

/// What the player wants to do this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Travel in a direction.
    Move {
        /// Where to go.
        direction: Direction,
    },
    /// Pick an item up.
    Take {
        /// The item named by the player.
        noun: String,
        /// The raw input, kept for fallback narration.
        original: String,
    },
    /// Put a carried item down.
    Drop {
        /// The item named by the player.
        noun: String,
        /// The raw input, kept for fallback narration.
        original: String,
    },
    /// Board or climb into something here.
    Enter {
        /// The vehicle or space named by the player.
        noun: String,
    },
    /// Climb out of or leave something.
    Exit {
        /// The first thing named, usually the vehicle.
        noun_one: String,
        /// The last thing named, which may equal the first.
        noun_two: String,
    },
    /// Look around the current location.
    Look,
    /// List carried items.
    Inventory,
    /// A verb applied to a single noun.
    Simple {
        /// The normalized verb.
        verb: String,
        /// The noun acted on.
        noun: String,
        /// Trailing qualifier such as "on" or "off", when one was heard.
        adverb: Option<String>,
        /// Adjective qualifying the noun, used for disambiguation.
        adjective: Option<String>,
        /// The raw input, kept for fallback narration.
        original: String,
    },
    /// A verb connecting two nouns ("tie rope to railing").
    MultiNoun {
        /// The normalized verb.
        verb: String,
        /// The first noun.
        noun_one: String,
        /// The second noun.
        noun_two: String,
        /// The connecting preposition. Defaults to "with" when none was heard.
        preposition: String,
        /// The raw input, kept for fallback narration.
        original: String,
    },
    /// The input expressed no recognizable goal.
    Null,
}

impl Intent {
    /// Whether this is a simple or two-noun action whose verb appears in a
    /// vocabulary table.
    pub fn uses_verb(&self, table: &[&str]) -> bool {
        match self {
            Self::Simple { verb, .. } | Self::MultiNoun { verb, .. } => {
                verbs::verb_in(verb, table)
            }
            _ => false,
        }
    }

    /// The primary noun the intent acts on, when it has one.
    pub fn noun(&self) -> Option<&str> {
        match self {
            Self::Take { noun, .. }
            | Self::Drop { noun, .. }
            | Self::Enter { noun }
            | Self::Simple { noun, .. } => Some(noun),
            Self::Exit { noun_one, .. } | Self::MultiNoun { noun_one, .. } => Some(noun_one),
            _ => None,
        }
    }
}
