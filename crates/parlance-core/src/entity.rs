use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The kind of an entity. Extensible via `Custom(String)` for user-defined types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A place the player can stand in.
    Location,
    /// A person or creature.
    Character,
    /// A physical object.
    Item,
    /// A user-defined entity type not covered by built-in kinds.
    Custom(String),
}

impl EntityKind {
    /// Parse a kind from a definition document string.
    pub fn parse(s: &str) -> Self {
        match s {
            "location" | "room" => Self::Location,
            "character" | "person" | "creature" => Self::Character,
            "item" | "object" => Self::Item,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::Character => write!(f, "character"),
            Self::Item => write!(f, "item"),
            Self::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// Capability flags describing what an entity can do or have done to it.
///
/// Flags compose freely: a rowboat is `enterable` and `container`, a lantern
/// is `portable` and `light_source`, a parrot is `portable` and `talkable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// The entity can be picked up and carried.
    #[serde(default)]
    pub portable: bool,
    /// The entity responds when spoken to.
    #[serde(default)]
    pub talkable: bool,
    /// The player can board or climb into the entity.
    #[serde(default)]
    pub enterable: bool,
    /// Other entities can be placed inside this one.
    #[serde(default)]
    pub container: bool,
    /// The entity emits light when active.
    #[serde(default)]
    pub light_source: bool,
    /// The entity is a machine the player can switch on and off.
    #[serde(default)]
    pub device: bool,
    /// The entity's noun is grammatically plural ("them" can refer to it).
    #[serde(default)]
    pub plural: bool,
    /// The location has no ambient light of its own.
    #[serde(default)]
    pub dark: bool,
}

/// Core entity struct. Every world object is an Entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// The kind (type) of this entity.
    pub kind: EntityKind,
    /// Display name of the entity.
    pub name: String,
    /// Additional nouns the player may use to refer to this entity.
    pub aliases: Vec<String>,
    /// Free-text description of the entity.
    pub description: String,
    /// Capability flags.
    pub caps: Capabilities,
    /// Whether the entity is currently switched on (lanterns, machines).
    pub active: bool,
    /// Whether a container entity is currently open. Contents of a closed
    /// container are hidden from the player.
    pub open: bool,
    /// Message shown when a non-portable entity is taken. `None` uses the
    /// stock refusal.
    pub refusal: Option<String>,
    /// Timestamp when the entity was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the entity was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Create a new entity with a random ID.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::with_id(EntityId::new(), kind, name)
    }

    /// Create an entity with a pre-assigned ID.
    pub fn with_id(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            caps: Capabilities::default(),
            active: false,
            open: false,
            refusal: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an extra noun the player may use for this entity.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the refusal message shown when the entity cannot be taken.
    pub fn with_refusal(mut self, refusal: impl Into<String>) -> Self {
        self.refusal = Some(refusal.into());
        self
    }

    /// Mark the entity as portable.
    pub fn portable(mut self) -> Self {
        self.caps.portable = true;
        self
    }

    /// Mark the entity as talkable.
    pub fn talkable(mut self) -> Self {
        self.caps.talkable = true;
        self
    }

    /// Mark the entity as enterable (boats, beds, closets).
    pub fn enterable(mut self) -> Self {
        self.caps.enterable = true;
        self
    }

    /// Mark the entity as a container.
    pub fn container(mut self) -> Self {
        self.caps.container = true;
        self
    }

    /// Mark a container entity as starting out open.
    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    /// Mark the entity as a light source.
    pub fn light_source(mut self) -> Self {
        self.caps.light_source = true;
        self
    }

    /// Mark the entity as a switchable machine.
    pub fn device(mut self) -> Self {
        self.caps.device = true;
        self
    }

    /// Mark the entity's noun as plural.
    pub fn plural(mut self) -> Self {
        self.caps.plural = true;
        self
    }

    /// Mark the location as dark.
    pub fn dark(mut self) -> Self {
        self.caps.dark = true;
        self
    }

    /// All nouns that refer to this entity: the name first, then aliases.
    pub fn nouns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// The longest noun for this entity, used when prompting the player to
    /// disambiguate ("the brass lantern" reads better than "lantern").
    pub fn longest_noun(&self) -> &str {
        self.nouns().max_by_key(|n| n.len()).unwrap_or(&self.name)
    }

    /// Whether the entity sheds light right now.
    pub fn is_lit(&self) -> bool {
        self.caps.light_source && self.active
    }
}
