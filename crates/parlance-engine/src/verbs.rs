//! Verb vocabulary shared by the parsing and dispatch tiers.
//!
//! The tables are deliberately small. The parsing oracle is instructed to
//! normalize exotic phrasings ("put on the hat" becomes "don"), so the
//! engine only has to recognize canonical forms plus a few synonyms the
//! oracle is known to emit anyway.

/// Verbs that prefix a bare direction ("go north", "walk east").
pub const MOVE_VERBS: &[&str] = &["go", "walk", "run", "head", "travel", "move"];

/// Verbs that introduce reported speech ("tell bob hello").
pub const SAY_VERBS: &[&str] = &["say", "tell", "yell", "shout", "scream"];

/// Greeting words that open a conversation ("hello bob").
pub const GREET_VERBS: &[&str] = &["greet", "hello", "hi"];

/// Verbs for striking up a conversation ("talk to bob").
pub const TALK_VERBS: &[&str] = &["talk", "speak"];

/// Verbs for presenting an item to a character ("show the map to bob").
pub const SHOW_VERBS: &[&str] = &["show", "present", "display"];

/// Violent verbs. The engine recognizes them only to refuse them.
pub const KILL_VERBS: &[&str] = &[
    "kill", "attack", "murder", "stab", "slay", "fight", "hit", "strike",
];

/// Verbs that switch a device or light source on.
pub const ACTIVATE_VERBS: &[&str] = &["activate", "turn on", "light", "enable"];

/// Verbs that switch a device or light source off.
pub const DEACTIVATE_VERBS: &[&str] = &[
    "deactivate",
    "turn off",
    "extinguish",
    "blow out",
    "disable",
];

/// Verbs that open a container.
pub const OPEN_VERBS: &[&str] = &["open", "unlatch"];

/// Verbs that close a container.
pub const CLOSE_VERBS: &[&str] = &["close", "shut", "latch"];

/// Verbs for handing an item to a character.
pub const GIVE_VERBS: &[&str] = &["give", "hand", "offer"];

/// Verbs for hurling an item.
pub const THROW_VERBS: &[&str] = &["throw", "toss", "hurl", "chuck"];

/// Verbs for placing one thing inside or on top of another.
pub const PUT_VERBS: &[&str] = &["put", "place", "shove", "push"];

/// Examination verbs answered with the entity's description.
pub const EXAMINE_VERBS: &[&str] = &["examine", "inspect", "read", "look"];

/// Prepositions that direct a put verb into or onto a container.
pub const INSERT_PREPOSITIONS: &[&str] = &["in", "into", "inside", "on", "onto"];

/// Case-insensitive membership test against a verb table.
pub fn verb_in(verb: &str, table: &[&str]) -> bool {
    let verb = verb.trim().to_lowercase();
    table.contains(&verb.as_str())
}
