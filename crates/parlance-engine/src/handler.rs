//! Extension points for story content.
//!
//! A world definition is pure data; behavior is attached at session setup by
//! registering [`EntityHandler`]s against entity IDs and [`TurnActor`]s
//! against the session. The dispatcher consults them at fixed points and
//! treats `None` as "not mine, keep going", the same no-match convention the
//! conversation patterns use.

use parlance_core::{EntityId, World};

use crate::intent::Intent;

/// What a turn-based actor did with its chance to act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorOutcome {
    /// The actor claims the whole turn. Dispatch stops and this text is the
    /// turn's result.
    Preempt(String),
    /// The actor has something to append after the turn's main result.
    Note(String),
    /// The actor sat this turn out.
    Idle,
}

/// Something that acts every turn, wherever the player is.
///
/// Actors run before intent dispatch so a time-based hazard can strike,
/// expire or interrupt ahead of normal interaction resolution.
pub trait TurnActor: Send {
    /// Take one turn's worth of action.
    fn act(&mut self, world: &mut World) -> ActorOutcome;
}

/// Story logic attached to a single entity.
///
/// `me` is the entity the handler is registered under, so one implementation
/// can serve many entities. Every method defaults to `None`.
pub trait EntityHandler: Send {
    /// React to raw, unparsed input. Consulted only for the current
    /// location, for phrases that defy sentence analysis ("jump", "pray").
    fn on_raw_input(&mut self, me: EntityId, input: &str, world: &mut World) -> Option<String> {
        let _ = (me, input, world);
        None
    }

    /// React to a parsed intent aimed at this entity.
    fn on_intent(&mut self, me: EntityId, intent: &Intent, world: &mut World) -> Option<String> {
        let _ = (me, intent, world);
        None
    }

    /// React to being spoken to. The message has already been reformatted by
    /// the conversation patterns ("what about the storm?"). Returning `None`
    /// hands the input back to the rest of the pipeline.
    fn on_being_talked_to(
        &mut self,
        me: EntityId,
        message: &str,
        world: &mut World,
    ) -> Option<String> {
        let _ = (me, message, world);
        None
    }

    /// Contribute text ahead of the turn's main result. Consulted only for
    /// the current location.
    fn on_turn_begin(&mut self, me: EntityId, world: &mut World) -> Option<String> {
        let _ = (me, world);
        None
    }
}
