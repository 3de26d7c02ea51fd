//! Failure narration: what the player reads when a turn goes nowhere.
//!
//! Every dead end in the dispatch pipeline is described by a
//! [`NarrationRequest`]. The [`Narrator`] either forwards the request to a
//! text-generation oracle for fresh prose or falls back to a fixed line, so
//! a session behaves the same with or without an oracle configured.

use std::sync::Arc;

use parlance_oracle::Oracle;

use crate::error::EngineResult;

/// The persona handed to the generation oracle as its system prompt.
const NARRATOR_PERSONA: &str = "You are the narrator of a classic text adventure game. \
Your voice is dry, economical and lightly sarcastic, always in the second person. \
Respond to each event in one or two short sentences. Never alter the state of the \
game, never invent new objects or exits, and never break character.";

/// A game event in need of narration.
///
/// Each variant carries just enough of the scene for the oracle to stay
/// grounded; [`NarrationRequest::fallback`] is the fixed line used when no
/// oracle is configured or the oracle returns nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationRequest {
    /// The player pressed enter without typing anything.
    EmptyInput,
    /// The player tried a direction with no exit.
    CannotGoThatWay {
        /// Description of where the player is standing.
        location: String,
        /// The direction they tried.
        direction: String,
    },
    /// The player tried to board something that cannot be boarded here.
    CannotEnter {
        /// Description of where the player is standing.
        location: String,
        /// What they tried to get into.
        vessel: String,
    },
    /// The player tried to get out of something they are not in.
    CannotExit {
        /// Description of where the player is standing.
        location: String,
        /// What they tried to get out of.
        vessel: String,
    },
    /// A verb aimed at a present noun that has no reaction to it.
    VerbHasNoEffect {
        /// Description of where the player is standing.
        location: String,
        /// The verb they used.
        verb: String,
        /// The noun they aimed it at.
        noun: String,
    },
    /// A verb aimed at a person, who is unimpressed.
    VerbHasNoEffectOnPerson {
        /// The verb they used.
        verb: String,
        /// The person they aimed it at.
        person: String,
    },
    /// Input that names nothing the story knows about.
    CommandHasNoEffect {
        /// Description of where the player is standing.
        location: String,
        /// The input as typed.
        input: String,
    },
    /// A noun that exists in the story but is nowhere in sight.
    NounNotPresent {
        /// Description of where the player is standing.
        location: String,
        /// The absent noun.
        noun: String,
    },
    /// The player tried to drop something they are not carrying.
    DropMissing {
        /// The input as typed.
        input: String,
    },
    /// A two-noun action where one of the nouns is absent.
    MissingNoun {
        /// Description of where the player is standing.
        location: String,
        /// The noun that is not here.
        absent: String,
        /// The noun that is.
        other: String,
        /// The verb they used.
        verb: String,
        /// The preposition joining the nouns.
        preposition: String,
    },
    /// A two-noun action where both nouns are absent.
    MissingBothNouns {
        /// Description of where the player is standing.
        location: String,
        /// The verb they used.
        verb: String,
        /// The first noun.
        noun_one: String,
        /// The second noun.
        noun_two: String,
    },
    /// A two-noun action with both nouns present that no rule claims.
    MultiNounNoEffect {
        /// Description of where the player is standing.
        location: String,
        /// The verb they used.
        verb: String,
        /// The first noun.
        noun_one: String,
        /// The second noun.
        noun_two: String,
        /// The preposition joining the nouns.
        preposition: String,
    },
    /// "take all" with nothing portable in reach.
    NothingToTake,
    /// "drop all" with an empty inventory.
    NothingToDrop,
    /// The player asked what time it is.
    AskedForTime,
    /// A save is about to be written.
    BeforeSave {
        /// Description of where the player is standing.
        location: String,
    },
    /// A save was just restored.
    AfterRestore {
        /// Description of where the player is standing.
        location: String,
    },
}

impl NarrationRequest {
    /// The user message sent to the generation oracle for this event.
    pub fn prompt(&self) -> String {
        match self {
            Self::EmptyInput => "The player entered an empty command. Provide the \
                narrator's very succinct but sarcastic response asking what they meant \
                to say. Do not alter the state of the game or provide additional \
                information."
                .to_string(),
            Self::CannotGoThatWay {
                location,
                direction,
            } => format!(
                "The player is in this location: \"{location}\". They tried to go \
                 {direction}, but that is not possible from this location. Respond with \
                 a very short, sarcastic and simple message telling them that they \
                 cannot go that way. Do not be creative about why or what is preventing \
                 them, and do not alter the state of the game or provide additional \
                 information."
            ),
            Self::CannotEnter { location, vessel } => format!(
                "The player is in this location: \"{location}\". They tried to enter \
                 some kind of sub-location called {vessel}, but that is not available \
                 from this location. Respond with a very short, sarcastic and simple \
                 message telling them that they cannot do this. Do not be creative \
                 about why, and do not alter the state of the game or provide \
                 additional information."
            ),
            Self::CannotExit { location, vessel } => format!(
                "The player is in this location: \"{location}\". They tried to leave \
                 some kind of sub-location called {vessel}, but they are not inside it. \
                 Respond with a very short, sarcastic and simple message telling them \
                 that they cannot do this. Do not be creative about why, and do not \
                 alter the state of the game or provide additional information."
            ),
            Self::VerbHasNoEffect {
                location,
                verb,
                noun,
            } => format!(
                "The player is in this location: \"{location}\". They tried to \
                 \"{verb}\" the {noun}, which is here, but that action has no effect in \
                 this story. Respond with a very short, sarcastic and simple message \
                 telling them that nothing happens. Do not be creative about why, and \
                 do not alter the state of the game or provide additional information."
            ),
            Self::VerbHasNoEffectOnPerson { verb, person } => format!(
                "The player tried to \"{verb}\" a person called {person}, which has no \
                 effect on them. Respond with a very short, simple message in which the \
                 {person} politely ignores the attempt. Do not alter the state of the \
                 game or provide additional information."
            ),
            Self::CommandHasNoEffect { location, input } => format!(
                "The player is in this location: \"{location}\". They said \"{input}\", \
                 which refers to nothing that exists in this story. Provide the \
                 narrator's very succinct but sarcastic response. Do not alter the \
                 state of the game or provide additional information."
            ),
            Self::NounNotPresent { location, noun } => format!(
                "The player is in this location: \"{location}\". They referred to a \
                 {noun}. It exists somewhere in this story, but it is not here. Respond \
                 with a very short, simple message telling them they don't see that \
                 here. Do not reveal where it actually is, and do not alter the state \
                 of the game."
            ),
            Self::DropMissing { input } => format!(
                "The player said '{input}', but the thing or things they asked to drop \
                 is/are not in their inventory. Provide the narrator's very succinct \
                 but sarcastic response. Do not alter the state of the game or provide \
                 additional information."
            ),
            Self::MissingNoun {
                location,
                absent,
                other,
                verb,
                preposition,
            } => format!(
                "The player is in this location: \"{location}\". They said \"{verb} the \
                 {absent} {preposition} the {other}\", but there is no {absent} here. \
                 Respond with a very short, simple message telling them they don't see \
                 any {absent} here. Do not alter the state of the game or provide \
                 additional information."
            ),
            Self::MissingBothNouns {
                location,
                verb,
                noun_one,
                noun_two,
            } => format!(
                "The player is in this location: \"{location}\". They tried to \
                 \"{verb}\" a {noun_one} and a {noun_two}, but neither of those things \
                 is here. Respond with a very short, simple message telling them so. Do \
                 not alter the state of the game or provide additional information."
            ),
            Self::MultiNounNoEffect {
                location,
                verb,
                noun_one,
                noun_two,
                preposition,
            } => format!(
                "The player is in this location: \"{location}\". They said \"{verb} the \
                 {noun_one} {preposition} the {noun_two}\", but that has no effect in \
                 this story. Respond with a very short, sarcastic and simple message \
                 telling them that nothing happens. Do not be creative about why, and \
                 do not alter the state of the game or provide additional information."
            ),
            Self::NothingToTake => "The player asked to take everything, but there is \
                nothing here that can be taken. Provide the narrator's very succinct \
                but sarcastic response. Do not alter the state of the game or provide \
                additional information."
                .to_string(),
            Self::NothingToDrop => "The player asked to drop everything, but they are \
                not carrying anything. Provide the narrator's very succinct but \
                sarcastic response. Do not alter the state of the game or provide \
                additional information."
                .to_string(),
            Self::AskedForTime => "The player asked what time it is, but time is a \
                concept that has no meaning in this game. Provide the narrator's very \
                succinct but sarcastic response. Do not alter the state of the game or \
                provide additional information."
                .to_string(),
            Self::BeforeSave { location } => format!(
                "The adventurer is about to save their game in this location: \
                 \"{location}.\" Tell them in a funny sentence or two that their \
                 progress is being preserved. Never mention files or computers."
            ),
            Self::AfterRestore { location } => format!(
                "The adventurer has restored their game from a previous saved game and \
                 is now in this location: \"{location}.\" Tell them in a funny sentence \
                 or two that their game restored successfully, and wish them better \
                 luck this time."
            ),
        }
    }

    /// The fixed line used when no oracle is available.
    pub fn fallback(&self) -> String {
        match self {
            Self::EmptyInput => "I beg your pardon? ".to_string(),
            Self::CannotGoThatWay { .. } => "You cannot go that way. ".to_string(),
            Self::CannotEnter { vessel, .. } => {
                format!("You can't get into the {vessel}. ")
            }
            Self::CannotExit { vessel, .. } => format!("You're not in the {vessel}. "),
            Self::VerbHasNoEffect { .. } | Self::MultiNounNoEffect { .. } => {
                "Nothing happens. ".to_string()
            }
            Self::VerbHasNoEffectOnPerson { person, .. } => {
                format!("The {person} doesn't react. ")
            }
            Self::CommandHasNoEffect { .. } => "That would be pointless. ".to_string(),
            Self::NounNotPresent { noun, .. } => {
                format!("You don't see any {noun} here. ")
            }
            Self::DropMissing { .. } => "You don't have that!".to_string(),
            Self::MissingNoun { absent, .. } => {
                format!("You don't see any {absent} here. ")
            }
            Self::MissingBothNouns { .. } => "Neither of those things is here. ".to_string(),
            Self::NothingToTake => "There's nothing here you can take. ".to_string(),
            Self::NothingToDrop => "You're not carrying anything. ".to_string(),
            Self::AskedForTime => "Time has little meaning here. ".to_string(),
            Self::BeforeSave { .. } => "Saved. ".to_string(),
            Self::AfterRestore { .. } => "Restored. ".to_string(),
        }
    }
}

/// Turns narration requests into player-facing text.
#[derive(Clone, Default)]
pub struct Narrator {
    oracle: Option<Arc<dyn Oracle>>,
}

impl Narrator {
    /// A narrator that only ever uses the fixed fallback lines.
    pub fn offline() -> Self {
        Self { oracle: None }
    }

    /// A narrator that asks the given oracle for fresh prose.
    pub fn with_oracle(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// Whether this narrator has an oracle behind it.
    pub fn is_offline(&self) -> bool {
        self.oracle.is_none()
    }

    /// Narrate one event. A blank oracle reply degrades to the fixed line
    /// rather than surfacing an empty turn.
    pub async fn narrate(&self, request: &NarrationRequest) -> EngineResult<String> {
        let Some(oracle) = &self.oracle else {
            return Ok(request.fallback());
        };
        let reply = oracle.complete(NARRATOR_PERSONA, &request.prompt()).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            Ok(request.fallback())
        } else {
            Ok(reply.to_string())
        }
    }
}
