//! Tagged-field extraction from oracle replies.
//!
//! The parsing oracle is asked to wrap its answers in markup tags
//! (`<intent>take</intent>`), but nothing enforces that it does. The
//! extractor tolerates anything: missing tags yield no fields, unclosed
//! tags end the scan, and garbage around the tags is ignored.

/// All values wrapped in `<tag>..</tag>` pairs, in document order, trimmed.
pub fn extract_tags(reply: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut values = Vec::new();
    let mut rest = reply;
    while let Some(start) = rest.find(&open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(&close) else {
            break;
        };
        values.push(after_open[..end].trim().to_string());
        rest = &after_open[end + close.len()..];
    }
    values
}

/// The value of a tag that appears exactly once and is non-empty.
///
/// Zero occurrences, several occurrences, or a blank body all yield `None`;
/// a contradictory reply never produces a half-extracted field.
pub fn single_tag(reply: &str, tag: &str) -> Option<String> {
    let mut values = extract_tags(reply, tag);
    if values.len() != 1 {
        return None;
    }
    values.pop().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_yields_nothing() {
        assert!(extract_tags("", "tag").is_empty());
        assert_eq!(single_tag("", "tag"), None);
    }

    #[test]
    fn unclosed_tag_ends_the_scan() {
        let reply = "<intent>move</intent><verb>go<verb>";
        assert_eq!(extract_tags(reply, "intent"), vec!["move"]);
        assert!(extract_tags(reply, "verb").is_empty());
    }

    #[test]
    fn nested_tags_resolve_by_name() {
        let reply = "<outer><inner>nested content</inner></outer>";
        assert_eq!(extract_tags(reply, "inner"), vec!["nested content"]);
    }

    #[test]
    fn duplicate_tags_come_back_in_order() {
        let reply = "<tag>first</tag><something>else</something><tag>second</tag><tag>third</tag>";
        assert_eq!(extract_tags(reply, "tag"), vec!["first", "second", "third"]);
    }

    #[test]
    fn values_are_trimmed() {
        let reply = "<noun>\n  brass lantern \t</noun>";
        assert_eq!(extract_tags(reply, "noun"), vec!["brass lantern"]);
    }

    #[test]
    fn single_requires_exactly_one_nonempty_occurrence() {
        assert_eq!(single_tag("<verb>take</verb>", "verb"), Some("take".to_string()));
        assert_eq!(single_tag("<verb></verb>", "verb"), None);
        assert_eq!(single_tag("<verb>a</verb><verb>b</verb>", "verb"), None);
        assert_eq!(single_tag("no tags at all", "verb"), None);
    }

    #[test]
    fn prose_around_tags_is_ignored() {
        let reply = "Sure! The player wants to <intent>take</intent> the <noun>sword</noun>.";
        assert_eq!(single_tag(reply, "intent"), Some("take".to_string()));
        assert_eq!(single_tag(reply, "noun"), Some("sword".to_string()));
    }

    proptest::proptest! {
        #[test]
        fn extraction_never_panics_and_always_trims(reply in ".{0,200}", tag in "[a-z]{1,8}") {
            for value in extract_tags(&reply, &tag) {
                proptest::prop_assert_eq!(value.trim(), value.as_str());
            }
        }
    }
}
