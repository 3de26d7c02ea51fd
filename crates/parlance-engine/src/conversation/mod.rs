//! Dialogue-shaped command recognition.
//!
//! "ask bob about the key" does not fit the verb/noun/preposition grammar
//! the oracle parser uses, so a fixed, ordered list of text patterns gets
//! first crack at every turn. Each pattern either recognizes the input and
//! names the addressed entity plus the message that should reach it, or
//! passes. The first hit wins; when none hits, the turn falls through to
//! the general parsing tiers.

mod ask;
mod say;
mod whisper;

use parlance_core::{EntityId, World};

use crate::parser::resolver;

/// A dialogue command aimed at a talkable entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Who is being addressed.
    pub target: EntityId,
    /// What reaches them, after pattern normalization.
    pub message: String,
}

type Pattern = fn(&str, &str, &World, &[EntityId]) -> Option<Utterance>;

/// Patterns in priority order. Ordering is load-bearing: the ask forms must
/// run before the generic say-verb forms or "ask bob about bob" would be
/// swallowed as reported speech.
const PATTERNS: &[Pattern] = &[
    ask::ask_about,
    ask::ask_for,
    ask::ask_quoted,
    say::comma_address,
    say::talk_to,
    say::greet,
    ask::query_for,
    ask::interrogate,
    say::show_item,
    say::say_prefix,
    say::say_trailing,
    whisper::whisper,
];

/// Try every dialogue pattern against the input, in priority order.
///
/// `talkables` is the set of entities that can be addressed this turn, in
/// resolution priority order (inventory before location contents).
pub fn check_for_conversation(
    world: &World,
    input: &str,
    talkables: &[EntityId],
) -> Option<Utterance> {
    if talkables.is_empty() {
        return None;
    }
    let input_lower = input.to_lowercase();
    PATTERNS
        .iter()
        .find_map(|pattern| pattern(input, &input_lower, world, talkables))
}

/// Resolve a character name against the talkables: exact alias equality
/// first, then bidirectional substring containment.
fn find_talkable(world: &World, name: &str, talkables: &[EntityId]) -> Option<EntityId> {
    resolver::find_match(world, name, talkables)
}

/// Resolve a character name by exact alias equality only. The ask-for
/// grammar is deliberately strict: "ask guard for the key" must not latch
/// onto a "guard dog" halfway across the room.
fn find_talkable_exact(world: &World, name: &str, talkables: &[EntityId]) -> Option<EntityId> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    talkables.iter().copied().find(|&id| {
        world
            .entity(id)
            .is_some_and(|entity| entity.nouns().any(|alias| alias.to_lowercase() == name))
    })
}

/// Strip one symmetric pair of outer quotes, double or single.
fn strip_outer_quotes(text: &str) -> &str {
    if text.len() >= 2 {
        let bytes = text.as_bytes();
        let first = bytes[0];
        let last = bytes[text.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Slice the original-case input past a prefix measured on the lowercased
/// copy. Returns `None` when the byte offset is not a char boundary in the
/// original, which only happens for inputs whose lowercasing changed byte
/// lengths.
fn after_prefix<'a>(input: &'a str, prefix_len: usize) -> Option<&'a str> {
    input.get(prefix_len..)
}
