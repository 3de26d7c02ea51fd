//! Noun-to-entity resolution.
//!
//! Player nouns rarely match entity names letter for letter, so resolution
//! runs two passes: exact alias equality first, then bidirectional substring
//! containment ("lantern" finds "brass lantern" and the other way round).
//! Within a pass the first candidate in list order wins; there is no
//! ranking by alias specificity.

use parlance_core::{EntityId, World};

/// Resolve a noun against candidate entities. Empty nouns never match.
pub fn find_match(world: &World, noun: &str, candidates: &[EntityId]) -> Option<EntityId> {
    let noun = noun.trim().to_lowercase();
    if noun.is_empty() {
        return None;
    }

    let exact = candidates.iter().copied().find(|&id| {
        world
            .entity(id)
            .is_some_and(|entity| entity.nouns().any(|alias| alias.to_lowercase() == noun))
    });
    if exact.is_some() {
        return exact;
    }

    candidates.iter().copied().find(|&id| {
        world.entity(id).is_some_and(|entity| {
            entity.nouns().any(|alias| {
                let alias = alias.to_lowercase();
                alias.contains(&noun) || noun.contains(&alias)
            })
        })
    })
}

/// Every candidate the noun could refer to, in candidate order. Used for
/// disambiguation prompts when a bare noun matches several entities.
pub fn find_matches(world: &World, noun: &str, candidates: &[EntityId]) -> Vec<EntityId> {
    let noun = noun.trim().to_lowercase();
    if noun.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for &id in candidates {
        let Some(entity) = world.entity(id) else {
            continue;
        };
        let hit = entity.nouns().any(|alias| {
            let alias = alias.to_lowercase();
            alias == noun || alias.contains(&noun) || noun.contains(&alias)
        });
        if hit && !matches.contains(&id) {
            matches.push(id);
        }
    }
    matches
}
