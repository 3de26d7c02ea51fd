//! Whispered speech, in both word orders.

use std::sync::LazyLock;

use parlance_core::{EntityId, World};
use regex::Regex;

use super::{Utterance, after_prefix, find_talkable};

static WHISPER_TRAILING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^whisper\s+(.*?)\s+to\s+(.*)$").expect("valid regex"));

/// "whisper to X text" and "whisper text to X".
///
/// The forwarded message is prefixed with "(whispered) " and keeps any
/// quote characters; a whisper arrives exactly as breathed. In the
/// trailing-name order the first " to " splits message from name.
pub(super) fn whisper(
    input: &str,
    input_lower: &str,
    world: &World,
    talkables: &[EntityId],
) -> Option<Utterance> {
    if !input_lower.starts_with("whisper ") {
        return None;
    }

    // Leading-name order: "whisper to bob the plan".
    if input_lower.starts_with("whisper to ") {
        let rest = after_prefix(input, "whisper to ".len())?;
        let space = rest.find(' ')?;
        if space == 0 {
            return None;
        }
        let character = rest[..space].trim();
        let text = rest[space + 1..].trim();
        if character.is_empty() || text.is_empty() {
            return None;
        }
        if let Some(target) = find_talkable(world, character, talkables) {
            return Some(Utterance {
                target,
                message: format!("(whispered) {text}"),
            });
        }
        // An unrecognized leading name still gets a second reading below.
    }

    let captures = WHISPER_TRAILING.captures(input)?;
    let text = captures.get(1)?.as_str().trim();
    let character = captures.get(2)?.as_str().trim();
    if text.is_empty() || character.is_empty() {
        return None;
    }
    let target = find_talkable(world, character, talkables)?;
    Some(Utterance {
        target,
        message: format!("(whispered) {text}"),
    })
}
