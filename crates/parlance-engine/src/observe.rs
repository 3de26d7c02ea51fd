//! Observability hooks at the dispatcher boundary.
//!
//! Instead of tracing sprinkled through the matchers, a session reports the
//! load-bearing moments of every turn to a single [`TurnObserver`]. The
//! default observer ignores everything; a CLI can print oracle traffic, a
//! test can record which tier claimed a turn.

use crate::intent::Intent;

/// The dispatch tier that claimed a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// A pending clarification or confirmation consumed the input.
    Pending,
    /// A system command (save, restore, quit, restart, verbosity).
    System,
    /// A repeated previous input ("again").
    Again,
    /// The current location claimed the raw input.
    Location,
    /// A global command or bare direction.
    Global,
    /// A conversation pattern matched.
    Conversation,
    /// A pronoun needed clarification.
    Pronoun,
    /// A parsed intent was dispatched.
    Intent,
}

/// Hooks called at fixed points of every turn.
///
/// All methods default to no-ops. The session calls them synchronously, so
/// implementations should stay cheap.
pub trait TurnObserver: Send {
    /// The raw input, before any processing.
    fn on_input(&mut self, input: &str) {
        let _ = input;
    }

    /// A conversation pattern produced an utterance.
    fn on_pattern_match(&mut self, target: &str, message: &str) {
        let _ = (target, message);
    }

    /// The prompt pair sent to the parsing oracle.
    fn on_oracle_request(&mut self, system: &str, user: &str) {
        let _ = (system, user);
    }

    /// The parsing oracle's raw reply.
    fn on_oracle_reply(&mut self, reply: &str) {
        let _ = reply;
    }

    /// The intent the reply resolved to.
    fn on_intent(&mut self, intent: &Intent) {
        let _ = intent;
    }

    /// Which tier claimed the turn.
    fn on_tier(&mut self, tier: Tier) {
        let _ = tier;
    }

    /// The final text of the turn.
    fn on_output(&mut self, output: &str) {
        let _ = output;
    }
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TurnObserver for NullObserver {}
