use crate::entity::{EntityId, EntityKind};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or manipulating a world.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity ID does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity with the same name already exists.
    #[error("entity already exists: \"{0}\"")]
    DuplicateName(String),

    /// A named reference in a definition could not be resolved.
    #[error("invalid reference: entity \"{name}\" of kind {expected_kind:?} not found")]
    InvalidReference {
        /// The unresolved entity name.
        name: String,
        /// The expected entity kind, if known.
        expected_kind: Option<EntityKind>,
    },

    /// A world definition document failed to parse.
    #[error("definition parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A generic validation error with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
