//! JSON-loadable world definitions.
//!
//! A definition document names entities by their display names; [`WorldDef::build`]
//! resolves those references into a [`World`] and reports any dangling ones.

use serde::{Deserialize, Serialize};

use crate::entity::{Capabilities, Entity, EntityKind};
use crate::error::{CoreError, CoreResult};
use crate::world::{World, WorldMeta};

/// A world definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDef {
    /// Display name of the world.
    pub name: String,
    /// Free-text description shown when a session begins.
    #[serde(default)]
    pub description: String,
    /// Name of the location the player starts in.
    pub start: String,
    /// Entities in the world.
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    /// Directional connections between locations.
    #[serde(default)]
    pub exits: Vec<ExitDef>,
}

/// One entity in a definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    /// Display name. Must be unique within the document.
    pub name: String,
    /// Entity kind ("location", "character", "item", or a custom word).
    pub kind: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Additional nouns the player may use.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Name of the entity this one starts inside. Locations leave this unset.
    #[serde(default)]
    pub location: Option<String>,
    /// Whether the entity starts in the player's inventory.
    #[serde(default)]
    pub carried: bool,
    /// Capability flags.
    #[serde(flatten)]
    pub caps: Capabilities,
    /// Whether a container entity starts out open.
    #[serde(default)]
    pub open: bool,
    /// Refusal message shown when a non-portable entity is taken.
    #[serde(default)]
    pub refusal: Option<String>,
}

/// One directional connection in a definition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitDef {
    /// Name of the location the exit leads out of.
    pub from: String,
    /// Direction name ("north", "up", "in", ...).
    pub direction: String,
    /// Name of the location the exit leads to.
    pub to: String,
}

impl WorldDef {
    /// Parse a definition document from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve the document into a live world.
    pub fn build(self) -> CoreResult<World> {
        let mut meta = WorldMeta::new(self.name);
        meta.description = self.description;
        let mut world = World::new(meta);

        for def in &self.entities {
            let mut entity = Entity::new(EntityKind::parse(&def.kind), def.name.clone());
            entity.description = def.description.clone();
            entity.aliases = def.aliases.clone();
            entity.caps = def.caps.clone();
            entity.open = def.open;
            entity.refusal = def.refusal.clone();
            world.add_entity(entity)?;
        }

        // Second pass: containment, once every name can resolve.
        for def in &self.entities {
            let id = world
                .find_id_by_name(&def.name)
                .ok_or_else(|| CoreError::Validation(format!("entity vanished: {}", def.name)))?;
            if def.carried {
                let player = world.player();
                world.place(id, player)?;
            } else if let Some(location) = &def.location {
                let holder = world.find_id_by_name(location).ok_or_else(|| {
                    CoreError::InvalidReference {
                        name: location.clone(),
                        expected_kind: None,
                    }
                })?;
                world.place(id, holder)?;
            }
        }

        for exit in &self.exits {
            let from = world
                .find_id_by_name(&exit.from)
                .ok_or_else(|| CoreError::InvalidReference {
                    name: exit.from.clone(),
                    expected_kind: Some(EntityKind::Location),
                })?;
            let to = world
                .find_id_by_name(&exit.to)
                .ok_or_else(|| CoreError::InvalidReference {
                    name: exit.to.clone(),
                    expected_kind: Some(EntityKind::Location),
                })?;
            world.set_exit(from, exit.direction.clone(), to)?;
        }

        let start = world
            .find_id_by_name(&self.start)
            .ok_or_else(|| CoreError::InvalidReference {
                name: self.start.clone(),
                expected_kind: Some(EntityKind::Location),
            })?;
        world.set_start(start)?;

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARBOR: &str = r#"{
        "name": "Harbor",
        "description": "Salt air and gull cries.",
        "start": "dock",
        "entities": [
            { "name": "dock", "kind": "location", "description": "Weathered planks." },
            { "name": "bait shed", "kind": "location", "dark": true },
            { "name": "lantern", "kind": "item", "location": "dock",
              "portable": true, "light_source": true, "aliases": ["lamp"] },
            { "name": "harbormaster", "kind": "character", "location": "dock",
              "talkable": true },
            { "name": "ticket", "kind": "item", "carried": true, "portable": true }
        ],
        "exits": [
            { "from": "dock", "direction": "north", "to": "bait shed" },
            { "from": "bait shed", "direction": "south", "to": "dock" }
        ]
    }"#;

    #[test]
    fn builds_a_world_from_json() {
        let world = WorldDef::from_json(HARBOR).unwrap().build().unwrap();

        let dock = world.find_id_by_name("dock").unwrap();
        assert_eq!(world.start(), Some(dock));
        assert_eq!(world.meta.description, "Salt air and gull cries.");

        let lantern = world.find_by_name("lantern").unwrap();
        assert!(lantern.caps.portable);
        assert!(lantern.caps.light_source);
        assert_eq!(lantern.aliases, vec!["lamp"]);
        assert_eq!(world.holder(lantern.id), Some(dock));

        let shed = world.find_by_name("bait shed").unwrap();
        assert!(shed.caps.dark);

        assert_eq!(world.inventory().len(), 1);
    }

    #[test]
    fn dangling_location_reference_fails() {
        let json = r#"{
            "name": "Broken",
            "start": "dock",
            "entities": [
                { "name": "dock", "kind": "location" },
                { "name": "gull", "kind": "character", "location": "lighthouse" }
            ]
        }"#;
        let err = WorldDef::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidReference { .. }));
    }

    #[test]
    fn missing_start_fails() {
        let json = r#"{ "name": "Broken", "start": "nowhere", "entities": [] }"#;
        let err = WorldDef::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, CoreError::InvalidReference { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorldDef::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
