//! Question-shaped grammars aimed at a character.

use std::sync::LazyLock;

use parlance_core::{EntityId, World};
use regex::Regex;

use super::{Utterance, find_talkable, find_talkable_exact};

static ASK_ABOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ask\s+(.+?)\s+about\s+(.+)$").expect("valid regex"));

static ASK_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ask\s+(\w+)\s+for\s+(.+)$").expect("valid regex"));

static ASK_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^ask\s+(.+?)\s+["'](.+)["']\s*$"#).expect("valid regex"));

static QUERY_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^query\s+(.+?)\s+for\s+(.+)$").expect("valid regex"));

/// "ask X about Y" becomes "what about {Y}?".
pub(super) fn ask_about(
    input: &str,
    _input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let captures = ASK_ABOUT.captures(input)?;
    let character = captures.get(1)?.as_str().trim();
    let topic = captures.get(2)?.as_str().trim();
    if character.is_empty() || topic.is_empty() {
        return None;
    }
    let target = find_talkable(world, character, talkables)?;
    Some(Utterance {
        target,
        message: format!("what about {topic}?"),
    })
}

/// "ask X for Y" becomes "can I have {Y}?".
///
/// The character name must equal an alias exactly; a request aimed at a
/// half-matching bystander should fall through to the general parser
/// instead of landing on the wrong ear.
pub(super) fn ask_for(
    input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    if !input_lower.starts_with("ask ") || input_lower.contains(" about ") {
        return None;
    }
    let captures = ASK_FOR.captures(input)?;
    let character = captures.get(1)?.as_str().trim();
    let item = captures.get(2)?.as_str().trim();
    if character.is_empty() || item.is_empty() {
        return None;
    }
    let target = find_talkable_exact(world, character, talkables)?;
    Some(Utterance {
        target,
        message: format!("can I have {item}?"),
    })
}

/// `ask X "quoted text"` forwards the quoted text verbatim, quotes removed.
pub(super) fn ask_quoted(
    input: &str,
    _input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let captures = ASK_QUOTED.captures(input)?;
    let character = captures.get(1)?.as_str().trim();
    let message = captures.get(2)?.as_str();
    if character.is_empty() || message.is_empty() {
        return None;
    }
    let target = find_talkable(world, character, talkables)?;
    Some(Utterance {
        target,
        message: message.to_string(),
    })
}

/// "query X for Y" becomes "can you tell me about {Y}?".
///
/// Y may arrive wrapped: "query X for information about Y" and
/// "query X for Y about Z" both reduce to Y.
pub(super) fn query_for(
    input: &str,
    _input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let captures = QUERY_FOR.captures(input)?;
    let character = captures.get(1)?.as_str().trim();
    let mut topic = captures.get(2)?.as_str().trim();

    let topic_lower = topic.to_lowercase();
    const INFO_PREFIX: &str = "information about ";
    if topic_lower.starts_with(INFO_PREFIX) {
        topic = topic.get(INFO_PREFIX.len()..).unwrap_or(topic).trim();
    } else if let Some(split) = topic_lower.find(" about ") {
        topic = topic.get(..split).unwrap_or(topic).trim();
    }

    if character.is_empty() || topic.is_empty() {
        return None;
    }
    let target = find_talkable(world, character, talkables)?;
    Some(Utterance {
        target,
        message: format!("can you tell me about {topic}?"),
    })
}

/// "interrogate X" forwards a fixed demand.
pub(super) fn interrogate(
    _input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let name = input_lower.strip_prefix("interrogate ")?;
    let name = name.trim().trim_end_matches(['.', '!', '?']);
    let target = find_talkable(world, name, talkables)?;
    Some(Utterance {
        target,
        message: "Tell me everything you know.".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::talkable_world;
    use super::*;

    fn try_pattern(
        pattern: fn(&str, &str, &World, &[EntityId]) -> Option<Utterance>,
        input: &str,
    ) -> Option<String> {
        let (world, bob, parrot) = talkable_world();
        pattern(input, &input.to_lowercase(), &world, &[bob, parrot])
            .map(|utterance| utterance.message)
    }

    #[test]
    fn ask_about_reformats_the_topic() {
        assert_eq!(
            try_pattern(ask_about, "ask bob about the key"),
            Some("what about the key?".to_string())
        );
        assert_eq!(
            try_pattern(ask_about, "Ask the old sailor about the storm"),
            Some("what about the storm?".to_string())
        );
    }

    #[test]
    fn ask_about_needs_a_known_character() {
        assert_eq!(try_pattern(ask_about, "ask gerald about the key"), None);
    }

    #[test]
    fn ask_for_reformats_the_request() {
        assert_eq!(
            try_pattern(ask_for, "ask bob for the key"),
            Some("can I have the key?".to_string())
        );
    }

    #[test]
    fn ask_for_defers_to_ask_about() {
        assert_eq!(try_pattern(ask_for, "ask bob for facts about the key"), None);
    }

    #[test]
    fn ask_for_requires_an_exact_alias() {
        // "sailor" is only a fragment of the "old sailor" alias.
        assert_eq!(try_pattern(ask_for, "ask sailor for the key"), None);
        assert_eq!(
            try_pattern(ask_for, "ask bob for directions"),
            Some("can I have directions?".to_string())
        );
    }

    #[test]
    fn ask_quoted_forwards_the_quoted_text() {
        assert_eq!(
            try_pattern(ask_quoted, "ask bob \"where is the key\""),
            Some("where is the key".to_string())
        );
        assert_eq!(
            try_pattern(ask_quoted, "ask bob 'any news?'"),
            Some("any news?".to_string())
        );
    }

    #[test]
    fn query_reduces_every_wrapping_to_the_topic() {
        assert_eq!(
            try_pattern(query_for, "query bob for the password"),
            Some("can you tell me about the password?".to_string())
        );
        assert_eq!(
            try_pattern(query_for, "query bob for information about the vault"),
            Some("can you tell me about the vault?".to_string())
        );
        assert_eq!(
            try_pattern(query_for, "query bob for details about the vault"),
            Some("can you tell me about details?".to_string())
        );
    }

    #[test]
    fn interrogate_sends_the_fixed_demand() {
        assert_eq!(
            try_pattern(interrogate, "interrogate bob"),
            Some("Tell me everything you know.".to_string())
        );
        assert_eq!(try_pattern(interrogate, "interrogate the mayor"), None);
    }
}
