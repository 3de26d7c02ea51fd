//! Pronoun memory: binding "it" and "them" to the last mentioned noun.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// The clarification question asked when a pronoun has no referent.
pub const CLARIFY: &str = "What item are you referring to?\n";

static IT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bit\b").expect("valid regex"));
static THEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bthem\b").expect("valid regex"));

/// Which pronoun the input used. "it" is checked first when both appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pronoun {
    /// The singular pronoun.
    It,
    /// The plural pronoun.
    Them,
}

/// The outcome of scanning input for a bare pronoun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PronounCheck {
    /// No pronoun present; the input passes through untouched.
    Untouched,
    /// The pronoun was bound to the remembered noun; process this instead.
    Resolved(String),
    /// A pronoun with no usable referent; ask which item is meant.
    NeedsClarification(Pronoun),
}

/// Scan input for "it"/"them" and bind against the remembered noun.
///
/// "it" binds whenever a noun is remembered. "them" additionally requires
/// the referent to be plural; a singular referent asks for clarification
/// rather than guessing.
pub fn check(input: &str, last_noun: &str, noun_is_plural: bool) -> PronounCheck {
    let pronoun = if IT.is_match(input) {
        Pronoun::It
    } else if THEM.is_match(input) {
        Pronoun::Them
    } else {
        return PronounCheck::Untouched;
    };

    if last_noun.is_empty() || (pronoun == Pronoun::Them && !noun_is_plural) {
        return PronounCheck::NeedsClarification(pronoun);
    }

    PronounCheck::Resolved(substitute(input, pronoun, last_noun))
}

/// Replace every occurrence of the pronoun with a noun phrase, verbatim.
pub fn substitute(text: &str, pronoun: Pronoun, replacement: &str) -> String {
    let regex = match pronoun {
        Pronoun::It => &*IT,
        Pronoun::Them => &*THEM,
    };
    regex.replace_all(text, NoExpand(replacement)).into_owned()
}

/// A noun reads as plural when it ends in "s" without the doubled or
/// latinate endings that usually mark singulars ("glass", "walrus").
pub fn looks_plural(noun: &str) -> bool {
    let noun = noun.trim().to_lowercase();
    noun.ends_with('s') && !noun.ends_with("ss") && !noun.ends_with("us")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pronoun_passes_through() {
        assert_eq!(check("take the lantern", "sword", false), PronounCheck::Untouched);
        assert_eq!(check("", "sword", false), PronounCheck::Untouched);
    }

    #[test]
    fn word_boundaries_protect_embedded_letters() {
        assert_eq!(check("sit on the chair", "sword", false), PronounCheck::Untouched);
        assert_eq!(check("examine the item", "sword", false), PronounCheck::Untouched);
        assert_eq!(check("check the theme", "coins", true), PronounCheck::Untouched);
    }

    #[test]
    fn it_binds_to_the_remembered_noun() {
        assert_eq!(
            check("take it", "lantern", false),
            PronounCheck::Resolved("take lantern".to_string())
        );
        assert_eq!(
            check("Take It", "lantern", false),
            PronounCheck::Resolved("Take lantern".to_string())
        );
    }

    #[test]
    fn it_without_a_referent_asks_for_clarification() {
        assert_eq!(
            check("take it", "", false),
            PronounCheck::NeedsClarification(Pronoun::It)
        );
    }

    #[test]
    fn them_requires_a_plural_referent() {
        assert_eq!(
            check("polish them", "coins", true),
            PronounCheck::Resolved("polish coins".to_string())
        );
        assert_eq!(
            check("polish them", "coin", false),
            PronounCheck::NeedsClarification(Pronoun::Them)
        );
    }

    #[test]
    fn it_wins_when_both_pronouns_appear() {
        assert_eq!(
            check("put it on them", "lantern", false),
            PronounCheck::Resolved("put lantern on them".to_string())
        );
    }

    #[test]
    fn substitution_replaces_every_occurrence() {
        assert_eq!(
            substitute("take it and rub it", Pronoun::It, "lamp"),
            "take lamp and rub lamp"
        );
    }

    #[test]
    fn substitution_is_verbatim() {
        assert_eq!(
            substitute("take it", Pronoun::It, "$100 bill"),
            "take $100 bill"
        );
    }

    #[test]
    fn plural_heuristic() {
        assert!(looks_plural("coins"));
        assert!(looks_plural("LEAVES"));
        assert!(!looks_plural("glass"));
        assert!(!looks_plural("walrus"));
        assert!(!looks_plural("lantern"));
        assert!(!looks_plural(""));
    }
}
