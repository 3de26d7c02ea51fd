use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{CoreError, CoreResult};

/// Metadata about the world itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMeta {
    /// Display name of the world.
    pub name: String,
    /// Free-text description shown when a session begins.
    pub description: String,
    /// Version of the definition schema this world was built from.
    pub schema_version: u32,
    /// Timestamp when the world was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the world was last modified.
    pub updated_at: DateTime<Utc>,
}

impl WorldMeta {
    /// Create metadata with the given name and empty description.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: String::new(),
            schema_version: 1,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The central world registry. Owns all entities, their containment, and
/// the directional exits between locations.
///
/// The player is represented by a reserved [`EntityId`] that is not itself an
/// entity; the player's inventory is the containment list under that ID.
/// Exits are keyed by lowercase direction names so the registry stays
/// independent of any particular direction vocabulary.
#[derive(Debug, Clone)]
pub struct World {
    /// Metadata about the world.
    pub meta: WorldMeta,
    player: EntityId,
    start: Option<EntityId>,
    entities: HashMap<EntityId, Entity>,

    // Indexes
    by_name_lower: HashMap<String, EntityId>,
    contents: HashMap<EntityId, Vec<EntityId>>,
    held_by: HashMap<EntityId, EntityId>,
    exits: HashMap<EntityId, Vec<(String, EntityId)>>,
}

impl World {
    /// Create an empty world.
    pub fn new(meta: WorldMeta) -> Self {
        Self {
            meta,
            player: EntityId::new(),
            start: None,
            entities: HashMap::new(),
            by_name_lower: HashMap::new(),
            contents: HashMap::new(),
            held_by: HashMap::new(),
            exits: HashMap::new(),
        }
    }

    /// The reserved ID representing the player.
    pub fn player(&self) -> EntityId {
        self.player
    }

    /// The location a fresh session should start in, if one was declared.
    pub fn start(&self) -> Option<EntityId> {
        self.start
    }

    /// Declare the starting location.
    pub fn set_start(&mut self, id: EntityId) -> CoreResult<()> {
        if !self.entities.contains_key(&id) {
            return Err(CoreError::EntityNotFound(id));
        }
        self.start = Some(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Entity CRUD
    // -----------------------------------------------------------------------

    /// Add an entity to the world. Returns the entity's ID.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<EntityId> {
        let name_lower = entity.name.to_lowercase();
        if self.by_name_lower.contains_key(&name_lower) {
            return Err(CoreError::DuplicateName(entity.name.clone()));
        }

        let id = entity.id;
        self.by_name_lower.insert(name_lower, id);
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Get a reference to an entity by ID.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Find an entity by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name_lower
            .get(&name.to_lowercase())
            .and_then(|id| self.entities.get(id))
    }

    /// Find an entity ID by name (case-insensitive).
    pub fn find_id_by_name(&self, name: &str) -> Option<EntityId> {
        self.by_name_lower.get(&name.to_lowercase()).copied()
    }

    /// Iterate over every entity in the world. Order is unspecified.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All location entities, sorted by name for stable listings.
    pub fn locations(&self) -> Vec<&Entity> {
        let mut locations: Vec<&Entity> = self
            .entities
            .values()
            .filter(|e| e.kind == EntityKind::Location)
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        locations
    }

    // -----------------------------------------------------------------------
    // Containment
    // -----------------------------------------------------------------------

    /// Place an entity inside a container (a location, a container entity,
    /// or the player's inventory). Removes it from any previous holder.
    pub fn place(&mut self, id: EntityId, container: EntityId) -> CoreResult<()> {
        if !self.entities.contains_key(&id) {
            return Err(CoreError::EntityNotFound(id));
        }
        if container != self.player && !self.entities.contains_key(&container) {
            return Err(CoreError::EntityNotFound(container));
        }

        if let Some(previous) = self.held_by.remove(&id)
            && let Some(children) = self.contents.get_mut(&previous)
        {
            children.retain(|child| *child != id);
        }

        self.contents.entry(container).or_default().push(id);
        self.held_by.insert(id, container);
        Ok(())
    }

    /// The container currently holding an entity, if any.
    pub fn holder(&self, id: EntityId) -> Option<EntityId> {
        self.held_by.get(&id).copied()
    }

    /// The entities directly inside a container, in placement order.
    pub fn contents(&self, container: EntityId) -> &[EntityId] {
        self.contents
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The player's inventory, in the order items were acquired.
    pub fn inventory(&self) -> &[EntityId] {
        self.contents(self.player)
    }

    /// Whether the player is carrying an entity.
    pub fn is_carried(&self, id: EntityId) -> bool {
        self.holder(id) == Some(self.player)
    }

    /// Every entity visible from a location: its direct contents plus,
    /// recursively, the contents of open containers and enterable things
    /// there. Closed containers keep their contents hidden.
    pub fn visible_from(&self, location: EntityId) -> Vec<EntityId> {
        let mut seen = Vec::new();
        let mut queue: Vec<EntityId> = self.contents(location).to_vec();
        while let Some(id) = queue.pop() {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(entity) = self.entities.get(&id)
                && ((entity.caps.container && entity.open) || entity.caps.enterable)
            {
                queue.extend_from_slice(self.contents(id));
            }
        }
        seen
    }

    // -----------------------------------------------------------------------
    // Exits
    // -----------------------------------------------------------------------

    /// Connect one location to another in a named direction. Replaces any
    /// existing exit in that direction.
    pub fn set_exit(
        &mut self,
        from: EntityId,
        direction: impl Into<String>,
        to: EntityId,
    ) -> CoreResult<()> {
        if !self.entities.contains_key(&from) {
            return Err(CoreError::EntityNotFound(from));
        }
        if !self.entities.contains_key(&to) {
            return Err(CoreError::EntityNotFound(to));
        }

        let direction = direction.into().to_lowercase();
        let edges = self.exits.entry(from).or_default();
        if let Some(existing) = edges.iter_mut().find(|(name, _)| *name == direction) {
            existing.1 = to;
        } else {
            edges.push((direction, to));
        }
        Ok(())
    }

    /// The destination of an exit, if one exists in that direction.
    pub fn exit(&self, from: EntityId, direction: &str) -> Option<EntityId> {
        let direction = direction.to_lowercase();
        self.exits
            .get(&from)?
            .iter()
            .find(|(name, _)| *name == direction)
            .map(|(_, to)| *to)
    }

    /// All exits leading out of a location, in declaration order.
    pub fn exits_from(&self, from: EntityId) -> &[(String, EntityId)] {
        self.exits.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }
}
