//! Core types for Parlance: entities, capabilities, and the world registry.
//!
//! This crate defines the data model the command engine runs against. It is
//! independent of any parsing or narration concern — you can construct a
//! [`World`] programmatically or load one from a JSON definition.

/// World definition documents loadable from JSON.
pub mod definition;
/// Entity types, identifiers, and capability flags.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// The central world registry that owns entities, containment, and exits.
pub mod world;

/// Re-export definition document types.
pub use definition::{EntityDef, ExitDef, WorldDef};
/// Re-export core entity types.
pub use entity::{Capabilities, Entity, EntityId, EntityKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export world registry types.
pub use world::{World, WorldMeta};
