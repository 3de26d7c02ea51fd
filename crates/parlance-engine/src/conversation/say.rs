//! Addressed-speech grammars: naming a character and saying something.

use std::sync::LazyLock;

use parlance_core::{EntityId, World};
use regex::Regex;

use super::{Utterance, after_prefix, find_talkable, strip_outer_quotes};
use crate::verbs::{GREET_VERBS, SAY_VERBS, SHOW_VERBS, TALK_VERBS};

static SHOW: LazyLock<Regex> = LazyLock::new(|| {
    let verbs = SHOW_VERBS.join("|");
    Regex::new(&format!(r"(?i)^(?:{verbs})\s+(.+?)\s+(?:to|at)\s+(.+)$")).expect("valid regex")
});

/// "X, text" addresses X with the text verbatim, casing intact.
pub(super) fn comma_address(
    input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    for &id in talkables {
        let Some(entity) = world.entity(id) else {
            continue;
        };
        for noun in entity.nouns() {
            let prefix = format!("{},", noun.to_lowercase());
            if input_lower.starts_with(&prefix)
                && let Some(text) = after_prefix(input, prefix.len())
            {
                return Some(Utterance {
                    target: id,
                    message: text.trim().to_string(),
                });
            }
        }
    }
    None
}

/// "talk to X" and "speak with X" forward a literal greeting.
pub(super) fn talk_to(
    _input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    for verb in TALK_VERBS {
        for prep in ["to", "with"] {
            let prefix = format!("{verb} {prep} ");
            if let Some(name) = input_lower.strip_prefix(&prefix) {
                let name = name.trim().trim_end_matches(['.', '!', '?']);
                if let Some(target) = find_talkable(world, name, talkables) {
                    return Some(Utterance {
                        target,
                        message: "hello".to_string(),
                    });
                }
            }
        }
    }
    None
}

/// "greet X", "hello X", "hi X" forward a literal greeting.
pub(super) fn greet(
    _input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    for verb in GREET_VERBS {
        let prefix = format!("{verb} ");
        if let Some(name) = input_lower.strip_prefix(&prefix) {
            let name = name.trim().trim_end_matches(['.', '!', '?']);
            if let Some(target) = find_talkable(world, name, talkables) {
                return Some(Utterance {
                    target,
                    message: "hello".to_string(),
                });
            }
        }
    }
    None
}

/// "show ITEM to CHARACTER" becomes "look at this {ITEM}".
pub(super) fn show_item(
    input: &str,
    _input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let captures = SHOW.captures(input)?;
    let item = strip_article(captures.get(1)?.as_str().trim());
    let character = captures.get(2)?.as_str().trim();
    if item.is_empty() {
        return None;
    }
    let target = find_talkable(world, character, talkables)?;
    Some(Utterance {
        target,
        message: format!("look at this {item}"),
    })
}

/// "[verb] [character] [text]" and "[verb] to|at [character] [text]" where
/// the verb reports speech. The forwarded text keeps the player's casing.
pub(super) fn say_prefix(
    input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    for &id in talkables {
        let Some(entity) = world.entity(id) else {
            continue;
        };
        for noun in entity.nouns() {
            let noun_lower = noun.to_lowercase();
            for verb in SAY_VERBS {
                let prefix = format!("{verb} {noun_lower}");
                if input_lower.starts_with(&prefix)
                    && let Some(rest) = after_prefix(input, prefix.len())
                {
                    let mut text =
                        strip_outer_quotes(rest.trim_start_matches([' ', '.', ',', ':']).trim());
                    // "tell bob to wait" relays the instruction, not the
                    // literal words "to wait".
                    if *verb == "tell"
                        && let Some(instruction) = text.strip_prefix("to ")
                    {
                        text = instruction.trim();
                    }
                    return Some(Utterance {
                        target: id,
                        message: text.to_string(),
                    });
                }

                for prep in ["to", "at"] {
                    let prefix = format!("{verb} {prep} {noun_lower}");
                    if input_lower.starts_with(&prefix)
                        && let Some(rest) = after_prefix(input, prefix.len())
                    {
                        let text = strip_outer_quotes(
                            rest.trim_start_matches([' ', '.', ',', ':']).trim(),
                        );
                        return Some(Utterance {
                            target: id,
                            message: text.to_string(),
                        });
                    }
                }
            }
        }
    }
    None
}

/// "[verb] [text] to|at [character]" with the character named last.
///
/// The message is rebuilt from lowercased tokens, so its casing is lost;
/// only the single final token is compared against aliases, which keeps
/// multi-word names out of this grammar.
pub(super) fn say_trailing(
    _input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    let words: Vec<&str> = input_lower.split_whitespace().collect();
    if words.len() < 2 || !SAY_VERBS.contains(&words[0]) {
        return None;
    }
    let last = words[words.len() - 1].trim_end_matches(['.', '!', '?', '\'', '"']);

    for &id in talkables {
        let Some(entity) = world.entity(id) else {
            continue;
        };
        for noun in entity.nouns() {
            if noun.to_lowercase() != last {
                continue;
            }
            let mut middle = &words[1..words.len() - 1];
            if let Some((&tail, rest)) = middle.split_last()
                && (tail == "to" || tail == "at")
            {
                middle = rest;
            }
            let text = middle.join(" ");
            let text = strip_outer_quotes(text.trim_start_matches([' ', '.', ',', ':']).trim());
            return Some(Utterance {
                target: id,
                message: text.to_string(),
            });
        }
    }
    None
}

/// Strip one leading article off an item phrase.
fn strip_article(noun: &str) -> &str {
    for article in ["the ", "a ", "an "] {
        if let Some(head) = noun.get(..article.len())
            && head.eq_ignore_ascii_case(article)
            && let Some(rest) = noun.get(article.len()..)
        {
            return rest.trim_start();
        }
    }
    noun
}
