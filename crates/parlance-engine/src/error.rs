//! Engine error types.

use parlance_core::CoreError;
use parlance_oracle::OracleError;

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The world has no location to start the player in.
    #[error("the world has no locations")]
    NoStartLocation,

    /// A named location could not be found.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// An oracle call failed. Recoverable per turn; session state is intact.
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// A world manipulation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
