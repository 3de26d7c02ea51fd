//! Free-text command parsing.
//!
//! Bare compass input is handled locally by [`Direction`]; everything else
//! is sent to the language oracle with [`parser_prompt`] as its standing
//! instructions. The tagged reply comes back through [`resolve_reply`],
//! which applies a fixed precedence ladder to produce exactly one
//! [`Intent`]. Malformed replies never fail the turn; they degrade to
//! [`Intent::Null`].

pub mod direction;
pub mod resolver;
pub mod tags;

pub use direction::Direction;
pub use resolver::{find_match, find_matches};
pub use tags::{extract_tags, single_tag};

use crate::intent::Intent;

/// Standing instructions for the parsing oracle.
///
/// The player's sentence travels as the user message; this system prompt
/// teaches the tag vocabulary and the verb normalizations the engine
/// expects. The worked examples pin the output format better than the
/// rules alone do.
pub fn parser_prompt(location: &str) -> String {
    format!(
        r#"You are the command parser for an interactive fiction game. The player is currently in this location: "{location}"

Classify the player's sentence and answer only in markup tags.

1. In <intent> tags, put exactly one of:
    a) "take" if the player wants to pick something up
    b) "drop" if the player wants to put something down
    c) "board" if the player wants to get into a vehicle or sub-location
    d) "disembark" if the player wants to get out of a vehicle or sub-location
    e) "move" if the player wants to walk, travel, or otherwise go somewhere
    f) "inventory" if the player asks what they are carrying
    g) "look" if the player wants to look around the location
    h) "act" for anything else

2. In <verb> tags, put the single verb that best expresses the player's intention. Prefer a simpler, more common synonym when one exists. If the player wants to turn something on, use the verb "activate"; to turn something off, use "deactivate". If the player wants to wear or put on clothing, use the verb "don"; to remove clothing, use "doff".

3. For each noun in the sentence that relates to the main verb, put the noun in its own <noun> tags. When an adjective immediately precedes a noun, keep it in front of the noun inside the tags.

4. If there are two nouns, put the preposition that connects them in <preposition> tags outside any other tags. Otherwise omit the preposition tags.

5. If the sentence expresses a desire to move in a certain direction, put in <direction> tags the one word from this list that best describes where the player wants to go: "in, out, enter, exit, up, down, east, west, north, south, north-west, north-east, south-west, or south-east". If the sentence uses a phrase like "follow" or "go towards" together with something described in the player's current location, choose the matching direction. If no word from the list fits, put "other".

Do not provide any analysis or explanation, just the tags.

Examples:

"pull the lever" => <intent>act</intent><verb>pull</verb><noun>lever</noun>
"take the brass lantern" => <intent>take</intent><verb>take</verb><noun>brass lantern</noun>
"put on the hat" => <intent>act</intent><verb>don</verb><noun>hat</noun>
"inflate the pile of plastic with the air pump" => <intent>act</intent><verb>inflate</verb><noun>pile of plastic</noun><noun>air pump</noun><preposition>with</preposition>
"turn on lamp" => <intent>act</intent><verb>activate</verb><noun>lamp</noun>
"exit the boat" => <intent>disembark</intent><verb>exit</verb><noun>boat</noun>
"take off the jacket" => <intent>act</intent><verb>doff</verb><noun>jacket</noun>
"tie the rope to the railing" => <intent>act</intent><verb>tie</verb><noun>rope</noun><noun>railing</noun><preposition>to</preposition>
"what am i carrying?" => <intent>inventory</intent>
"#
    )
}

/// Resolve an oracle reply into exactly one intent.
///
/// The rules run in fixed precedence: take, drop, board, disembark, move,
/// inventory, look, act. The first rule that yields an intent wins; when
/// none does, the result is [`Intent::Null`]. `input` is the player's raw
/// sentence, carried through for fallback narration with its case intact.
pub fn resolve_reply(input: &str, reply: &str) -> Intent {
    let reply = reply.to_lowercase();

    resolve_take(input, &reply)
        .or_else(|| resolve_drop(input, &reply))
        .or_else(|| resolve_board(&reply))
        .or_else(|| resolve_disembark(&reply))
        .or_else(|| resolve_move(&reply))
        .or_else(|| resolve_bare(&reply, "inventory", Intent::Inventory))
        .or_else(|| resolve_bare(&reply, "look", Intent::Look))
        .or_else(|| resolve_act(input, &reply))
        .unwrap_or(Intent::Null)
}

/// Whether the reply names exactly this intent, once.
fn intent_is(reply: &str, expected: &str) -> bool {
    tags::single_tag(reply, "intent").is_some_and(|tag| tag == expected)
}

/// Non-empty values of a tag, in document order.
fn nonempty_tags(reply: &str, tag: &str) -> Vec<String> {
    tags::extract_tags(reply, tag)
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect()
}

fn resolve_take(input: &str, reply: &str) -> Option<Intent> {
    if !intent_is(reply, "take") {
        return None;
    }
    let noun = nonempty_tags(reply, "noun").into_iter().next()?;
    Some(Intent::Take {
        noun,
        original: input.to_string(),
    })
}

fn resolve_drop(input: &str, reply: &str) -> Option<Intent> {
    if !intent_is(reply, "drop") {
        return None;
    }
    let noun = nonempty_tags(reply, "noun").into_iter().next()?;
    Some(Intent::Drop {
        noun,
        original: input.to_string(),
    })
}

fn resolve_board(reply: &str) -> Option<Intent> {
    if !intent_is(reply, "board") {
        return None;
    }
    let noun = nonempty_tags(reply, "noun").into_iter().next()?;
    Some(Intent::Enter { noun })
}

fn resolve_disembark(reply: &str) -> Option<Intent> {
    if !intent_is(reply, "disembark") {
        return None;
    }
    let nouns = nonempty_tags(reply, "noun");
    let noun_one = nouns.first()?.clone();
    let noun_two = nouns.last()?.clone();
    Some(Intent::Exit { noun_one, noun_two })
}

fn resolve_move(reply: &str) -> Option<Intent> {
    if !intent_is(reply, "move") {
        return None;
    }
    // The oracle sometimes puts the direction word in the verb tag instead.
    let word = tags::single_tag(reply, "direction").or_else(|| tags::single_tag(reply, "verb"))?;
    let direction = Direction::parse(&word);
    (direction != Direction::Unknown).then_some(Intent::Move { direction })
}

fn resolve_bare(reply: &str, expected: &str, intent: Intent) -> Option<Intent> {
    intent_is(reply, expected).then_some(intent)
}

fn resolve_act(input: &str, reply: &str) -> Option<Intent> {
    if !intent_is(reply, "act") {
        return None;
    }
    let verb = tags::single_tag(reply, "verb")?;
    let preposition = tags::single_tag(reply, "preposition");
    let nouns = nonempty_tags(reply, "noun");

    match nouns.len() {
        1 => {
            let adjective = nonempty_tags(reply, "adjective").into_iter().next();
            let mut nouns = nouns.into_iter();
            Some(Intent::Simple {
                verb,
                noun: nouns.next()?,
                adverb: preposition,
                adjective,
                original: input.to_string(),
            })
        }
        2 => {
            let mut nouns = nouns.into_iter();
            Some(Intent::MultiNoun {
                verb,
                noun_one: nouns.next()?,
                noun_two: nouns.next()?,
                // The oracle is inconsistent about emitting prepositions;
                // "with" is by far the most common one it drops.
                preposition: preposition.unwrap_or_else(|| "with".to_string()),
                original: input.to_string(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVE_REPLY: &str = "<intent>move</intent>\n<verb>go</verb>\n<direction>north</direction>";
    const TAKE_REPLY: &str = "<intent>take</intent>\n<verb>take</verb>\n<noun>sword</noun>";
    const DROP_REPLY: &str = "<intent>drop</intent>\n<verb>drop</verb>\n<noun>book</noun>";
    const BOARD_REPLY: &str = "<intent>board</intent>\n<verb>enter</verb>\n<noun>boat</noun>";
    const DISEMBARK_REPLY: &str = "<intent>disembark</intent>\n<verb>exit</verb>\n<noun>car</noun>";
    const ACT_REPLY: &str = "<intent>act</intent>\n<verb>pull</verb>\n<noun>lever</noun>";
    const MULTI_REPLY: &str =
        "<intent>act</intent>\n<verb>tie</verb>\n<noun>rope</noun>\n<noun>railing</noun>\n<preposition>to</preposition>";

    #[test]
    fn move_reply_resolves_to_move() {
        assert_eq!(
            resolve_reply("go north", MOVE_REPLY),
            Intent::Move {
                direction: Direction::North
            }
        );
    }

    #[test]
    fn take_reply_resolves_with_original_input() {
        assert_eq!(
            resolve_reply("take the sword", TAKE_REPLY),
            Intent::Take {
                noun: "sword".to_string(),
                original: "take the sword".to_string(),
            }
        );
    }

    #[test]
    fn take_outranks_act_shaped_tag_sets() {
        // Everything a two-noun act resolution needs is present, but the
        // take rule sits higher in the ladder and claims the reply first.
        let reply = "<intent>take</intent>\n<verb>grab</verb>\n<noun>lantern</noun>\n<noun>hook</noun>\n<preposition>with</preposition>";
        assert_eq!(
            resolve_reply("grab the lantern with the hook", reply),
            Intent::Take {
                noun: "lantern".to_string(),
                original: "grab the lantern with the hook".to_string(),
            }
        );
    }

    #[test]
    fn drop_reply_resolves_to_drop() {
        assert_eq!(
            resolve_reply("drop the book", DROP_REPLY),
            Intent::Drop {
                noun: "book".to_string(),
                original: "drop the book".to_string(),
            }
        );
    }

    #[test]
    fn board_reply_resolves_to_enter() {
        assert_eq!(
            resolve_reply("enter the boat", BOARD_REPLY),
            Intent::Enter {
                noun: "boat".to_string()
            }
        );
    }

    #[test]
    fn disembark_reply_with_one_noun_uses_it_twice() {
        assert_eq!(
            resolve_reply("exit the car", DISEMBARK_REPLY),
            Intent::Exit {
                noun_one: "car".to_string(),
                noun_two: "car".to_string(),
            }
        );
    }

    #[test]
    fn disembark_reply_with_two_nouns_takes_first_and_last() {
        let reply = "<intent>disembark</intent>\n<verb>exit</verb>\n<noun>out</noun>\n<noun>boat</noun>";
        assert_eq!(
            resolve_reply("get out of boat", reply),
            Intent::Exit {
                noun_one: "out".to_string(),
                noun_two: "boat".to_string(),
            }
        );
    }

    #[test]
    fn act_reply_with_one_noun_resolves_to_simple() {
        assert_eq!(
            resolve_reply("pull the lever", ACT_REPLY),
            Intent::Simple {
                verb: "pull".to_string(),
                noun: "lever".to_string(),
                adverb: None,
                adjective: None,
                original: "pull the lever".to_string(),
            }
        );
    }

    #[test]
    fn act_reply_with_two_nouns_resolves_to_multi_noun() {
        assert_eq!(
            resolve_reply("tie the rope to the railing", MULTI_REPLY),
            Intent::MultiNoun {
                verb: "tie".to_string(),
                noun_one: "rope".to_string(),
                noun_two: "railing".to_string(),
                preposition: "to".to_string(),
                original: "tie the rope to the railing".to_string(),
            }
        );
    }

    #[test]
    fn missing_preposition_defaults_to_with() {
        let reply = "<intent>act</intent>\n<verb>unlock</verb>\n<noun>door</noun>\n<noun>key</noun>";
        let intent = resolve_reply("unlock door key", reply);
        let Intent::MultiNoun { preposition, .. } = intent else {
            panic!("expected a two-noun intent, got {intent:?}");
        };
        assert_eq!(preposition, "with");
    }

    #[test]
    fn adjective_tag_is_carried_on_simple_intents() {
        let reply = "<intent>act</intent>\n<verb>take</verb>\n<adjective>red</adjective>\n<noun>sword</noun>";
        let Intent::Simple { adjective, .. } = resolve_reply("take red sword", reply) else {
            panic!("expected a simple intent");
        };
        assert_eq!(adjective.as_deref(), Some("red"));
    }

    #[test]
    fn preposition_doubles_as_adverb_on_simple_intents() {
        let reply = "<intent>act</intent>\n<verb>look</verb>\n<noun>rug</noun>\n<preposition>under</preposition>";
        let Intent::Simple { adverb, .. } = resolve_reply("look under rug", reply) else {
            panic!("expected a simple intent");
        };
        assert_eq!(adverb.as_deref(), Some("under"));
    }

    #[test]
    fn inventory_and_look_need_only_the_intent_tag() {
        assert_eq!(
            resolve_reply("what am I carrying?", "<intent>inventory</intent>"),
            Intent::Inventory
        );
        assert_eq!(resolve_reply("look around", "<intent>look</intent>"), Intent::Look);
    }

    #[test]
    fn move_reply_falls_back_to_the_verb_tag() {
        let reply = "<intent>move</intent>\n<verb>north</verb>";
        assert_eq!(
            resolve_reply("go north", reply),
            Intent::Move {
                direction: Direction::North
            }
        );
    }

    #[test]
    fn unknown_direction_degrades_to_null() {
        let reply = "<intent>move</intent>\n<direction>sideways</direction>";
        assert_eq!(resolve_reply("go sideways", reply), Intent::Null);
    }

    #[test]
    fn act_without_nouns_degrades_to_null() {
        let reply = "<intent>act</intent>\n<verb>dance</verb>";
        assert_eq!(resolve_reply("dance", reply), Intent::Null);
    }

    #[test]
    fn act_without_a_verb_degrades_to_null() {
        let reply = "<intent>act</intent>\n<noun>sword</noun>";
        assert_eq!(resolve_reply("sword", reply), Intent::Null);
    }

    #[test]
    fn act_with_three_nouns_degrades_to_null() {
        let reply = "<intent>act</intent>\n<verb>juggle</verb>\n<noun>a</noun>\n<noun>b</noun>\n<noun>c</noun>";
        assert_eq!(resolve_reply("juggle a b c", reply), Intent::Null);
    }

    #[test]
    fn board_and_disembark_without_nouns_degrade_to_null() {
        assert_eq!(
            resolve_reply("board", "<intent>board</intent>\n<verb>board</verb>"),
            Intent::Null
        );
        assert_eq!(
            resolve_reply("exit", "<intent>disembark</intent>\n<verb>exit</verb>"),
            Intent::Null
        );
    }

    #[test]
    fn empty_and_garbage_replies_degrade_to_null() {
        assert_eq!(resolve_reply("nonsense command", ""), Intent::Null);
        assert_eq!(
            resolve_reply("invalid command", "<invalid>xml</invalid>"),
            Intent::Null
        );
    }

    #[test]
    fn duplicate_intent_tags_degrade_to_null() {
        let reply = "<intent>take</intent>\n<intent>drop</intent>\n<noun>sword</noun>";
        assert_eq!(resolve_reply("take sword", reply), Intent::Null);
    }

    #[test]
    fn tag_values_are_trimmed() {
        let reply = "<intent>  take  </intent>\n<verb>  take  </verb>\n<noun>  sword  </noun>";
        let Intent::Take { noun, .. } = resolve_reply("take sword", reply) else {
            panic!("expected a take intent");
        };
        assert_eq!(noun, "sword");
    }

    #[test]
    fn mixed_case_replies_are_lowercased_first() {
        let reply = "<INTENT>take</INTENT>\n<VERB>take</VERB>\n<NOUN>sword</NOUN>";
        assert!(matches!(
            resolve_reply("take sword", reply),
            Intent::Take { .. }
        ));
    }

    #[test]
    fn original_input_keeps_its_case() {
        let Intent::Take { original, .. } = resolve_reply("Take The SWORD", TAKE_REPLY) else {
            panic!("expected a take intent");
        };
        assert_eq!(original, "Take The SWORD");
    }

    #[test]
    fn every_list_direction_resolves() {
        let cases = [
            ("east", Direction::East),
            ("west", Direction::West),
            ("north", Direction::North),
            ("south", Direction::South),
            ("up", Direction::Up),
            ("down", Direction::Down),
            ("north-east", Direction::Northeast),
            ("north-west", Direction::Northwest),
            ("south-east", Direction::Southeast),
            ("south-west", Direction::Southwest),
            ("in", Direction::In),
            ("out", Direction::Out),
        ];
        for (word, expected) in cases {
            let reply = format!("<intent>move</intent>\n<direction>{word}</direction>");
            assert_eq!(
                resolve_reply(&format!("go {word}"), &reply),
                Intent::Move { direction: expected },
                "{word}"
            );
        }
    }

    #[test]
    fn prompt_interpolates_the_location() {
        let prompt = parser_prompt("West of House");
        assert!(prompt.contains("\"West of House\""));
        assert!(prompt.contains("<intent>"));
        assert!(prompt.contains("\"don\""));
    }

    proptest::proptest! {
        #[test]
        fn arbitrary_replies_never_panic(input in ".{0,40}", reply in ".{0,200}") {
            let _ = resolve_reply(&input, &reply);
        }
    }
}
