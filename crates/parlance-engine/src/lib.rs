//! The Parlance turn engine.
//!
//! Drives one player's session over a [`parlance_core::World`]: layered
//! input handling (system commands, repeats, directions, global commands,
//! conversation, pronouns), oracle-backed sentence parsing, stock verb
//! behaviors, and templated failure narration. Story logic plugs in
//! through entity handlers and turn actors.

pub mod conversation;
pub mod error;
pub mod globals;
pub mod handler;
pub mod intent;
pub mod narrate;
pub mod observe;
pub mod parser;
pub mod pronoun;
pub mod session;
pub mod verbs;

pub use conversation::{Utterance, check_for_conversation};
pub use error::{EngineError, EngineResult};
pub use handler::{ActorOutcome, EntityHandler, TurnActor};
pub use intent::Intent;
pub use narrate::{NarrationRequest, Narrator};
pub use observe::{NullObserver, Tier, TurnObserver};
pub use parser::Direction;
pub use session::{Session, SessionEvent, TurnOutput, Verbosity};
