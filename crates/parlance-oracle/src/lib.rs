//! Language-model oracle contract and clients.
//!
//! The engine treats the language model as an opaque oracle: a system prompt
//! and a user message go in, completion text comes out. This crate defines
//! that contract ([`Oracle`]), an HTTP client for Claude's Messages API
//! ([`ClaudeOracle`]), and a scripted implementation for tests
//! ([`ScriptedOracle`]).

use async_trait::async_trait;

/// Claude Messages API client.
pub mod claude;
/// Error types used throughout the crate.
pub mod error;
/// Scripted oracle for deterministic tests.
pub mod scripted;

/// Re-export the Claude client.
pub use claude::ClaudeOracle;
/// Re-export error types.
pub use error::{OracleError, OracleResult};
/// Re-export the scripted oracle.
pub use scripted::ScriptedOracle;

/// A text-completion oracle.
///
/// Implementations must be shareable across turns; the engine holds them
/// behind `Arc<dyn Oracle>` and awaits at most one call at a time.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Complete a prompt. `system` sets the oracle's standing instructions,
    /// `user` is the message for this call. Returns the raw completion text.
    async fn complete(&self, system: &str, user: &str) -> OracleResult<String>;
}
