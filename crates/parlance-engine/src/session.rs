//! One player's turn loop over a world.
//!
//! [`Session::process`] takes raw input and walks it through a fixed chain
//! of tiers: a pending question from last turn, system commands, the "again"
//! rewrite, turn actors, the current location's raw-input hook, bare
//! directions and stock global commands, conversation patterns, pronoun
//! resolution, and finally the oracle-parsed intent. The first tier that
//! claims the input ends the turn; everything it did not claim falls
//! through to the next tier. System commands and empty input do not cost
//! a move, everything below them does.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parlance_core::{Entity, EntityId, EntityKind, World};
use parlance_oracle::Oracle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::conversation;
use crate::error::{EngineError, EngineResult};
use crate::globals::{self, GlobalCommand, SystemCommand};
use crate::handler::{ActorOutcome, EntityHandler, TurnActor};
use crate::intent::Intent;
use crate::narrate::{NarrationRequest, Narrator};
use crate::observe::{NullObserver, Tier, TurnObserver};
use crate::parser::{self, Direction, resolver};
use crate::pronoun::{self, Pronoun, PronounCheck};
use crate::verbs;

/// Words that replay the previous turn's input.
const AGAIN_WORDS: &[&str] = &["again", "g", "repeat"];

/// How much of a location's description arrival prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// The full description on every arrival.
    Verbose,
    /// The full description on first arrival, the name alone after that.
    #[default]
    Brief,
    /// The name alone, always.
    SuperBrief,
}

/// A session-level event the host must act on. The session itself never
/// touches files or processes; it reports and the host follows through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The player confirmed they want to leave the game.
    Quit,
    /// The player confirmed they want to start over.
    Restart,
    /// The player asked to save; serialization belongs to the host.
    SaveRequested,
    /// The player asked to restore; deserialization belongs to the host.
    RestoreRequested,
}

/// The result of one processed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    /// Player-facing text, ending in exactly one newline.
    pub text: String,
    /// An event for the host, when this input produced one.
    pub event: Option<SessionEvent>,
}

/// A question from last turn waiting on the player's next input.
enum Pending {
    /// A pronoun had no referent. The answer replaces the pronoun in the
    /// remembered input and the result is dispatched as a fresh command.
    Clarify {
        /// The input as typed, pronoun still in place.
        remembered: String,
        /// Which pronoun needs a referent.
        pronoun: Pronoun,
    },
    /// A noun matched several entities. An answer naming one of them is
    /// folded back into the verb and dispatched as a fresh command.
    Disambiguate {
        /// Accepted answer words, each mapped to the full noun to use.
        options: HashMap<String, String>,
        /// The verb to rebuild the command with.
        verb: String,
    },
    /// "quit" asked for confirmation.
    ConfirmQuit,
    /// "restart" asked for confirmation.
    ConfirmRestart,
}

/// What resuming a pending question did with the new input.
enum Resumed {
    /// The exchange is over; this is the output.
    Done(TurnOutput),
    /// The input was rewritten; run it through the normal tiers.
    Continue(String),
}

/// Where a noun of a two-noun action turned out to be.
enum MultiNounSpot {
    /// A reachable entity.
    Present(EntityId),
    /// Not an entity, but the location's description mentions it.
    Scenery,
    /// Nowhere in reach.
    Absent,
}

/// One player's interactive session: a world, a position in it, and the
/// memory that spans turns (last noun, last input, visited locations).
pub struct Session {
    world: World,
    location: EntityId,
    vehicle: Option<EntityId>,
    parser: Option<Arc<dyn Oracle>>,
    narrator: Narrator,
    actors: Vec<Box<dyn TurnActor>>,
    handlers: HashMap<EntityId, Box<dyn EntityHandler>>,
    observer: Box<dyn TurnObserver>,
    pending: Option<Pending>,
    last_noun: String,
    last_input: String,
    verbosity: Verbosity,
    visited: HashSet<EntityId>,
    score: u32,
    moves: u32,
    rng: StdRng,
}

impl Session {
    /// Start a session at the world's start location, or at its first
    /// location when no start was declared.
    pub fn new(world: World) -> EngineResult<Self> {
        let location = world
            .start()
            .or_else(|| world.locations().first().map(|location| location.id))
            .ok_or(EngineError::NoStartLocation)?;
        Ok(Self {
            world,
            location,
            vehicle: None,
            parser: None,
            narrator: Narrator::offline(),
            actors: Vec::new(),
            handlers: HashMap::new(),
            observer: Box::new(NullObserver),
            pending: None,
            last_noun: String::new(),
            last_input: String::new(),
            verbosity: Verbosity::default(),
            visited: HashSet::new(),
            score: 0,
            moves: 0,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Start a session at a named location instead of the declared start.
    pub fn at_location(world: World, name: &str) -> EngineResult<Self> {
        let location = world
            .find_by_name(name)
            .filter(|entity| entity.kind == EntityKind::Location)
            .map(|entity| entity.id)
            .ok_or_else(|| EngineError::UnknownLocation(name.to_string()))?;
        let mut session = Self::new(world)?;
        session.location = location;
        Ok(session)
    }

    /// Use an oracle to parse free-text commands. Without one, anything the
    /// fixed tiers do not recognize resolves to nothing.
    pub fn with_parser(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.parser = Some(oracle);
        self
    }

    /// Replace the offline narrator.
    pub fn with_narrator(mut self, narrator: Narrator) -> Self {
        self.narrator = narrator;
        self
    }

    /// Attach an observer for the turn pipeline's load-bearing moments.
    pub fn with_observer(mut self, observer: Box<dyn TurnObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Seed the dice used for occasional narration flourishes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an actor that acts at the start of every turn.
    pub fn add_actor(&mut self, actor: Box<dyn TurnActor>) {
        self.actors.push(actor);
    }

    /// Attach story logic to an entity. One handler per entity; a second
    /// registration replaces the first.
    pub fn set_handler(&mut self, entity: EntityId, handler: Box<dyn EntityHandler>) {
        self.handlers.insert(entity, handler);
    }

    /// The world being played.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for hosts that stage scenes between
    /// turns.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Where the player is standing.
    pub fn location(&self) -> EntityId {
        self.location
    }

    /// The name of the current location.
    pub fn location_name(&self) -> String {
        self.entity_name(self.location)
    }

    /// What the player is inside of, when boarded.
    pub fn vehicle(&self) -> Option<EntityId> {
        self.vehicle
    }

    /// The current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Award points.
    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Turns taken so far.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// The most recent turn-consuming input, after pronoun and "again"
    /// rewriting.
    pub fn last_input(&self) -> &str {
        &self.last_input
    }

    /// The text shown before the first turn: the world's preamble plus a
    /// full look at the starting location.
    pub fn intro(&mut self) -> String {
        self.visited.insert(self.location);
        let mut text = String::new();
        if !self.world.meta.description.is_empty() {
            text.push_str(&self.world.meta.description);
            text.push_str("\n\n");
        }
        text.push_str(&self.describe_location(true));
        text.push('\n');
        text
    }

    // -----------------------------------------------------------------------
    // The turn pipeline
    // -----------------------------------------------------------------------

    /// Process one player input and produce the turn's text.
    ///
    /// Oracle failures surface as errors without corrupting the session;
    /// the player can simply try again next turn.
    pub async fn process(&mut self, raw: &str) -> EngineResult<TurnOutput> {
        self.observer.on_input(raw);
        let mut input = raw.trim().to_string();

        // A question from last turn gets first claim on the input.
        if let Some(pending) = self.pending.take() {
            self.observer.on_tier(Tier::Pending);
            match self.resume(pending, &input) {
                Resumed::Done(output) => return Ok(output),
                Resumed::Continue(rewritten) => input = rewritten,
            }
        }

        if input.is_empty() {
            let text = self.narrator.narrate(&NarrationRequest::EmptyInput).await?;
            return Ok(self.finish(text, None));
        }

        // System commands run outside the turn loop and cost no move.
        if let Some(command) = globals::system_command(&input) {
            self.observer.on_tier(Tier::System);
            return self.run_system(command).await;
        }

        // Everything below costs a move.
        self.moves += 1;
        let prepend = self.turn_begin();

        if AGAIN_WORDS.contains(&globals::normalize(&input).as_str()) {
            self.observer.on_tier(Tier::Again);
            if self.last_input.is_empty() {
                return Ok(self.end_of_turn(&input, prepend, "Again what?".to_string(), Vec::new()));
            }
            input = self.last_input.clone();
        }

        // Actors act on every turn, ahead of location and item logic, so a
        // time-based hazard can cut the turn short.
        let mut preempted: Option<String> = None;
        let mut notes: Vec<String> = Vec::new();
        for actor in &mut self.actors {
            match actor.act(&mut self.world) {
                ActorOutcome::Preempt(text) if preempted.is_none() => preempted = Some(text),
                ActorOutcome::Preempt(text) | ActorOutcome::Note(text) => notes.push(text),
                ActorOutcome::Idle => {}
            }
        }
        if let Some(body) = preempted {
            return Ok(self.end_of_turn(&input, prepend, body, notes));
        }

        // Phrases that defy sentence analysis, claimed by the location.
        if let Some(body) = self.location_raw_input(&input) {
            self.observer.on_tier(Tier::Location);
            return Ok(self.end_of_turn(&input, prepend, body, notes));
        }

        // Bare directions and the stock commands that work everywhere.
        let direction = Direction::parse(&input);
        if direction != Direction::Unknown {
            self.observer.on_tier(Tier::Global);
            let body = self.do_move(direction).await?;
            return Ok(self.end_of_turn(&input, prepend, body, notes));
        }
        if let Some(command) = globals::global_command(&input) {
            self.observer.on_tier(Tier::Global);
            let body = self.run_global(command).await?;
            return Ok(self.end_of_turn(&input, prepend, body, notes));
        }

        // Dialogue-shaped input goes to the addressed entity's handler. A
        // silent handler hands the input back to the later tiers.
        let talkables = self.talkables();
        if let Some(utterance) = conversation::check_for_conversation(&self.world, &input, &talkables)
        {
            let target_name = self.entity_name(utterance.target);
            self.observer.on_pattern_match(&target_name, &utterance.message);
            if let Some(handler) = self.handlers.get_mut(&utterance.target)
                && let Some(body) =
                    handler.on_being_talked_to(utterance.target, &utterance.message, &mut self.world)
            {
                self.observer.on_tier(Tier::Conversation);
                return Ok(self.end_of_turn(&input, prepend, body, notes));
            }
        }

        // Pronouns rewrite the input before the oracle sees it.
        let plural = self.last_noun_is_plural();
        match pronoun::check(&input, &self.last_noun, plural) {
            PronounCheck::Untouched => {}
            PronounCheck::Resolved(rewritten) => input = rewritten,
            PronounCheck::NeedsClarification(needed) => {
                self.observer.on_tier(Tier::Pronoun);
                self.pending = Some(Pending::Clarify {
                    remembered: input.clone(),
                    pronoun: needed,
                });
                return Ok(self.end_of_turn(&input, prepend, pronoun::CLARIFY.to_string(), notes));
            }
        }

        let intent = self.parse_intent(&input).await?;
        self.observer.on_intent(&intent);
        self.observer.on_tier(Tier::Intent);
        let body = self.dispatch(intent, &input).await?;
        Ok(self.end_of_turn(&input, prepend, body, notes))
    }

    /// Feed the player's answer back into the question that asked for it.
    fn resume(&mut self, pending: Pending, input: &str) -> Resumed {
        match pending {
            Pending::Clarify { remembered, pronoun } => {
                if input.is_empty() || remembered.is_empty() {
                    return Resumed::Done(self.finish(String::new(), None));
                }
                Resumed::Continue(pronoun::substitute(&remembered, pronoun, input))
            }
            Pending::Disambiguate { options, verb } => {
                let answer = globals::normalize(input);
                let chosen = options.get(&answer).cloned().or_else(|| {
                    // "the brass lantern" still names the brass lantern.
                    options
                        .iter()
                        .filter(|(option, _)| answer.contains(option.as_str()))
                        .max_by_key(|(option, _)| option.len())
                        .map(|(_, full)| full.clone())
                });
                match chosen {
                    Some(full) => Resumed::Continue(format!("{verb} {full}")),
                    None => Resumed::Continue(input.to_string()),
                }
            }
            Pending::ConfirmQuit => {
                if globals::is_affirmative(input) {
                    Resumed::Done(self.finish("Goodbye.".to_string(), Some(SessionEvent::Quit)))
                } else {
                    Resumed::Done(self.finish("Ok".to_string(), None))
                }
            }
            Pending::ConfirmRestart => {
                if globals::is_affirmative(input) {
                    Resumed::Done(self.finish("Restarting.".to_string(), Some(SessionEvent::Restart)))
                } else {
                    Resumed::Done(self.finish("Ok".to_string(), None))
                }
            }
        }
    }

    async fn run_system(&mut self, command: SystemCommand) -> EngineResult<TurnOutput> {
        let output = match command {
            SystemCommand::Verbose => {
                self.verbosity = Verbosity::Verbose;
                self.finish("Maximum verbosity.".to_string(), None)
            }
            SystemCommand::Brief => {
                self.verbosity = Verbosity::Brief;
                self.finish("Brief descriptions.".to_string(), None)
            }
            SystemCommand::SuperBrief => {
                self.verbosity = Verbosity::SuperBrief;
                self.finish("Superbrief descriptions.".to_string(), None)
            }
            SystemCommand::Save => {
                let request = NarrationRequest::BeforeSave {
                    location: self.location_name(),
                };
                let text = self.narrator.narrate(&request).await?;
                self.finish(text, Some(SessionEvent::SaveRequested))
            }
            SystemCommand::Restore => {
                let request = NarrationRequest::AfterRestore {
                    location: self.location_name(),
                };
                let text = self.narrator.narrate(&request).await?;
                self.finish(text, Some(SessionEvent::RestoreRequested))
            }
            SystemCommand::Quit => {
                self.pending = Some(Pending::ConfirmQuit);
                let text = format!(
                    "{}\nDo you wish to leave the game? (Y is affirmative):",
                    self.score_line().trim_end()
                );
                self.finish(text, None)
            }
            SystemCommand::Restart => {
                self.pending = Some(Pending::ConfirmRestart);
                self.finish(
                    "Do you wish to restart? (Y is affirmative):".to_string(),
                    None,
                )
            }
        };
        Ok(output)
    }

    async fn run_global(&mut self, command: GlobalCommand) -> EngineResult<String> {
        match command {
            GlobalCommand::Look => Ok(self.do_look()),
            GlobalCommand::Inventory => Ok(self.do_inventory()),
            GlobalCommand::Wait => Ok("Time passes. ".to_string()),
            GlobalCommand::Score => Ok(self.score_line()),
            GlobalCommand::Time => self.narrator.narrate(&NarrationRequest::AskedForTime).await,
            GlobalCommand::Take => self.take_single().await,
            GlobalCommand::TakeAll => self.take_everything().await,
            GlobalCommand::DropAll => self.drop_everything().await,
        }
    }

    // -----------------------------------------------------------------------
    // Intent dispatch
    // -----------------------------------------------------------------------

    async fn dispatch(&mut self, intent: Intent, input: &str) -> EngineResult<String> {
        match &intent {
            Intent::Move { direction } => self.do_move(*direction).await,
            Intent::Take { noun, original } => self.do_take(noun, original, &intent).await,
            Intent::Drop { noun, original } => self.do_drop(noun, original, &intent).await,
            Intent::Enter { noun } => self.do_enter(noun, input).await,
            Intent::Exit { noun_one, noun_two } => self.do_exit(noun_one, noun_two).await,
            Intent::Look => Ok(self.do_look()),
            Intent::Inventory => Ok(self.do_inventory()),
            Intent::Simple {
                verb,
                noun,
                adverb,
                adjective,
                original,
            } => {
                self.do_simple(
                    verb,
                    noun,
                    adverb.as_deref(),
                    adjective.as_deref(),
                    original,
                    &intent,
                )
                .await
            }
            Intent::MultiNoun {
                verb,
                noun_one,
                noun_two,
                preposition,
                original,
            } => {
                self.do_multi(verb, noun_one, noun_two, preposition, original, &intent)
                    .await
            }
            Intent::Null => {
                let request = NarrationRequest::CommandHasNoEffect {
                    location: self.location_name(),
                    input: input.to_string(),
                };
                self.narrator.narrate(&request).await
            }
        }
    }

    async fn do_move(&mut self, direction: Direction) -> EngineResult<String> {
        if let Some(vehicle) = self.vehicle {
            if direction == Direction::Out {
                return Ok(self.leave_vehicle(vehicle));
            }
            let name = self.entity_name(vehicle);
            return Ok(format!("You'll have to get out of the {name} first. "));
        }

        let destination = self
            .world
            .exits_from(self.location)
            .iter()
            .find(|(name, _)| Direction::parse(name) == direction)
            .map(|(_, to)| *to);

        let Some(destination) = destination else {
            // Most refusals reuse the fixed line; now and then the narrator
            // gets to improvise one.
            if self.rng.random_range(1..=5) == 1 {
                let request = NarrationRequest::CannotGoThatWay {
                    location: self.location_name(),
                    direction: direction.name().to_string(),
                };
                return self.narrator.narrate(&request).await;
            }
            return Ok("You cannot go that way. ".to_string());
        };

        self.location = destination;
        // A new location invalidates "it"; whatever it pointed at is gone.
        self.last_noun.clear();
        let first_visit = self.visited.insert(destination);
        let full = match self.verbosity {
            Verbosity::Verbose => true,
            Verbosity::Brief => first_visit,
            Verbosity::SuperBrief => false,
        };
        Ok(self.describe_location(full))
    }

    fn do_look(&mut self) -> String {
        self.visited.insert(self.location);
        self.describe_location(true)
    }

    fn do_inventory(&self) -> String {
        let carried = self.world.inventory();
        if carried.is_empty() {
            return "You are empty-handed".to_string();
        }
        let mut text = String::from("You are carrying:");
        for id in carried {
            if let Some(entity) = self.world.entity(*id) {
                text.push_str("\n   ");
                text.push_str(&capitalize(&listing_phrase(entity)));
            }
        }
        text
    }

    async fn do_take(&mut self, noun: &str, original: &str, intent: &Intent) -> EngineResult<String> {
        self.last_noun = noun.to_string();

        if let Some(id) = resolver::find_match(&self.world, noun, self.world.inventory()) {
            let name = self.entity_name(id);
            return Ok(format!("You already have the {name}. "));
        }

        let visible = self.world.visible_from(self.location);
        let found = resolver::find_match(&self.world, noun, &visible)
            .and_then(|id| self.world.entity(id))
            .map(|entity| {
                (
                    entity.id,
                    entity.name.clone(),
                    entity.caps.portable,
                    entity.refusal.clone(),
                )
            });
        if let Some((id, name, portable, refusal)) = found {
            if let Some(text) = self.entity_reaction(id, intent) {
                return Ok(text);
            }
            if portable {
                let player = self.world.player();
                self.world.place(id, player)?;
                return Ok("Taken. ".to_string());
            }
            if let Some(refusal) = refusal {
                return Ok(refusal);
            }
            return Ok(format!("You can't take the {name}. "));
        }

        self.absent_noun(noun, original).await
    }

    async fn do_drop(&mut self, noun: &str, original: &str, intent: &Intent) -> EngineResult<String> {
        self.last_noun = noun.to_string();

        let carried: Vec<EntityId> = self.world.inventory().to_vec();
        if let Some(id) = resolver::find_match(&self.world, noun, &carried) {
            if let Some(text) = self.entity_reaction(id, intent) {
                return Ok(text);
            }
            let spot = self.vehicle.unwrap_or(self.location);
            self.world.place(id, spot)?;
            return Ok("Dropped. ".to_string());
        }

        let request = NarrationRequest::DropMissing {
            input: original.to_string(),
        };
        self.narrator.narrate(&request).await
    }

    async fn do_enter(&mut self, noun: &str, input: &str) -> EngineResult<String> {
        if noun.trim().is_empty() {
            let request = NarrationRequest::CommandHasNoEffect {
                location: self.location_name(),
                input: input.to_string(),
            };
            return self.narrator.narrate(&request).await;
        }
        self.last_noun = noun.to_string();

        let visible = self.world.visible_from(self.location);
        let found = resolver::find_match(&self.world, noun, &visible)
            .and_then(|id| self.world.entity(id))
            .map(|entity| (entity.id, entity.name.clone(), entity.caps.enterable));
        let Some((id, name, enterable)) = found else {
            if self.exists_in_story(noun) {
                let request = NarrationRequest::NounNotPresent {
                    location: self.location_name(),
                    noun: noun.to_string(),
                };
                return self.narrator.narrate(&request).await;
            }
            let request = NarrationRequest::CannotEnter {
                location: self.location_name(),
                vessel: noun.to_string(),
            };
            return self.narrator.narrate(&request).await;
        };

        if self.vehicle == Some(id) {
            return Ok(format!("You're already in the {name}. "));
        }
        if let Some(current) = self.vehicle {
            let current_name = self.entity_name(current);
            return Ok(format!("You'll have to get out of the {current_name} first. "));
        }
        if !enterable {
            let request = NarrationRequest::CannotEnter {
                location: self.location_name(),
                vessel: name,
            };
            return self.narrator.narrate(&request).await;
        }

        self.vehicle = Some(id);
        Ok(format!("You get into the {name}. "))
    }

    async fn do_exit(&mut self, noun_one: &str, noun_two: &str) -> EngineResult<String> {
        let noun = if noun_one.trim().is_empty() {
            noun_two
        } else {
            noun_one
        };

        if let Some(vehicle) = self.vehicle
            && (noun.trim().is_empty()
                || resolver::find_match(&self.world, noun, &[vehicle]).is_some())
        {
            return Ok(self.leave_vehicle(vehicle));
        }

        let request = NarrationRequest::CannotExit {
            location: self.location_name(),
            vessel: noun.to_string(),
        };
        self.narrator.narrate(&request).await
    }

    async fn do_simple(
        &mut self,
        verb: &str,
        noun: &str,
        adverb: Option<&str>,
        adjective: Option<&str>,
        original: &str,
        intent: &Intent,
    ) -> EngineResult<String> {
        self.last_noun = noun.to_string();

        let mut reachable: Vec<EntityId> = self.world.inventory().to_vec();
        reachable.extend(self.world.visible_from(self.location));
        let mut candidates = resolver::find_matches(&self.world, noun, &reachable);

        // An adjective narrows the field before anyone gets asked.
        if candidates.len() > 1
            && let Some(adjective) = adjective
        {
            let qualified = format!("{adjective} {noun}").to_lowercase();
            let narrowed = self.matching_alias(&candidates, &qualified);
            if !narrowed.is_empty() {
                candidates = narrowed;
            }
        }
        // Exact alias hits outrank substring hits, the same precedence the
        // single-match resolver applies.
        if candidates.len() > 1 {
            let exact = self.matching_alias(&candidates, &noun.trim().to_lowercase());
            if !exact.is_empty() {
                candidates = exact;
            }
        }
        if candidates.len() > 1 {
            return Ok(self.ask_which_one(&candidates, verb));
        }
        let target = candidates.first().copied();

        let refers_to_light = target
            .and_then(|id| self.world.entity(id))
            .is_some_and(|entity| entity.caps.light_source);
        if self.is_dark_here() && !refers_to_light {
            return Ok("It's too dark to see! ".to_string());
        }

        // Story logic outranks the stock behaviors: the location first,
        // then every item present, first answer wins.
        let location = self.location;
        if let Some(text) = self.entity_reaction(location, intent) {
            return Ok(text);
        }
        if let Some(text) = self.items_reaction(intent) {
            return Ok(text);
        }

        if let Some(id) = target {
            if let Some(text) = self.built_in_action(id, verb, adverb) {
                return Ok(text);
            }
            let is_character = self
                .world
                .entity(id)
                .is_some_and(|entity| entity.kind == EntityKind::Character);
            let request = if is_character {
                NarrationRequest::VerbHasNoEffectOnPerson {
                    verb: verb.to_string(),
                    person: self.entity_name(id),
                }
            } else {
                NarrationRequest::VerbHasNoEffect {
                    location: self.location_name(),
                    verb: verb.to_string(),
                    noun: noun.to_string(),
                }
            };
            return self.narrator.narrate(&request).await;
        }

        self.absent_noun(noun, original).await
    }

    async fn do_multi(
        &mut self,
        verb: &str,
        noun_one: &str,
        noun_two: &str,
        preposition: &str,
        original: &str,
        intent: &Intent,
    ) -> EngineResult<String> {
        if self.is_dark_here() {
            return Ok("It's too dark to see! ".to_string());
        }
        // Two-noun actions leave no single referent for "it" to latch onto.
        self.last_noun.clear();

        let location = self.location;
        if let Some(text) = self.entity_reaction(location, intent) {
            return Ok(text);
        }
        if let Some(text) = self.items_reaction(intent) {
            return Ok(text);
        }

        let one = self.locate_for_multi(noun_one);
        let two = self.locate_for_multi(noun_two);

        match (&one, &two) {
            (MultiNounSpot::Absent, MultiNounSpot::Absent) => {
                let request = if self.exists_in_story(noun_one) || self.exists_in_story(noun_two) {
                    NarrationRequest::MissingBothNouns {
                        location: self.location_name(),
                        verb: verb.to_string(),
                        noun_one: noun_one.to_string(),
                        noun_two: noun_two.to_string(),
                    }
                } else {
                    NarrationRequest::CommandHasNoEffect {
                        location: self.location_name(),
                        input: original.to_string(),
                    }
                };
                return self.narrator.narrate(&request).await;
            }
            (MultiNounSpot::Absent, _) => {
                let request = NarrationRequest::MissingNoun {
                    location: self.location_name(),
                    absent: noun_one.to_string(),
                    other: noun_two.to_string(),
                    verb: verb.to_string(),
                    preposition: preposition.to_string(),
                };
                return self.narrator.narrate(&request).await;
            }
            (_, MultiNounSpot::Absent) => {
                let request = NarrationRequest::MissingNoun {
                    location: self.location_name(),
                    absent: noun_two.to_string(),
                    other: noun_one.to_string(),
                    verb: verb.to_string(),
                    preposition: preposition.to_string(),
                };
                return self.narrator.narrate(&request).await;
            }
            _ => {}
        }

        if let (MultiNounSpot::Present(a), MultiNounSpot::Present(b)) = (one, two)
            && let Some(text) = self.multi_built_in(a, b, verb, preposition)?
        {
            return Ok(text);
        }

        let request = NarrationRequest::MultiNounNoEffect {
            location: self.location_name(),
            verb: verb.to_string(),
            noun_one: noun_one.to_string(),
            noun_two: noun_two.to_string(),
            preposition: preposition.to_string(),
        };
        self.narrator.narrate(&request).await
    }

    // -----------------------------------------------------------------------
    // Stock interactions
    // -----------------------------------------------------------------------

    /// Switches, lids and the other behaviors every story gets for free.
    /// `None` means no stock rule applies and narration takes over.
    fn built_in_action(&mut self, id: EntityId, verb: &str, adverb: Option<&str>) -> Option<String> {
        let entity = self.world.entity(id)?;
        let name = entity.name.clone();
        let description = entity.description.clone();
        let switchable = entity.caps.light_source || entity.caps.device;
        let container = entity.caps.container;
        let is_character = entity.kind == EntityKind::Character;
        let active = entity.active;
        let open = entity.open;

        let turning_on = verbs::verb_in(verb, verbs::ACTIVATE_VERBS)
            || (verb == "turn" && adverb == Some("on"));
        let turning_off = verbs::verb_in(verb, verbs::DEACTIVATE_VERBS)
            || (verb == "turn" && adverb == Some("off"));

        if turning_on && switchable {
            if active {
                return Some("It's already on. ".to_string());
            }
            self.world.entity_mut(id)?.active = true;
            return Some(format!("The {name} is now on. "));
        }
        if turning_off && switchable {
            if !active {
                return Some("It's already off. ".to_string());
            }
            self.world.entity_mut(id)?.active = false;
            return Some(format!("The {name} is now off. "));
        }
        if verbs::verb_in(verb, verbs::OPEN_VERBS) && container {
            if open {
                return Some("It's already open. ".to_string());
            }
            self.world.entity_mut(id)?.open = true;
            let inside: Vec<String> = self
                .world
                .contents(id)
                .iter()
                .filter_map(|held| self.world.entity(*held))
                .map(listing_phrase)
                .collect();
            if inside.is_empty() {
                return Some("Opened. ".to_string());
            }
            return Some(format!(
                "Opening the {name} reveals {}. ",
                join_list(&inside, "and")
            ));
        }
        if verbs::verb_in(verb, verbs::CLOSE_VERBS) && container {
            if !open {
                return Some("It's already closed. ".to_string());
            }
            self.world.entity_mut(id)?.open = false;
            return Some("Closed. ".to_string());
        }
        if verbs::verb_in(verb, verbs::EXAMINE_VERBS) {
            if description.is_empty() {
                return Some(format!("You see nothing special about the {name}. "));
            }
            return Some(description);
        }
        if verbs::verb_in(verb, verbs::KILL_VERBS) && is_character {
            return Some("Violence isn't the answer to this one. ".to_string());
        }
        None
    }

    /// Stock rules for verb-noun-preposition-noun actions.
    fn multi_built_in(
        &mut self,
        a: EntityId,
        b: EntityId,
        verb: &str,
        preposition: &str,
    ) -> EngineResult<Option<String>> {
        let Some(first) = self.world.entity(a) else {
            return Ok(None);
        };
        let a_name = first.name.clone();
        let a_plural = first.caps.plural;
        let a_is_character = first.kind == EntityKind::Character;
        let Some(second) = self.world.entity(b) else {
            return Ok(None);
        };
        let b_name = second.name.clone();
        let b_is_character = second.kind == EntityKind::Character;
        let b_container = second.caps.container;
        let b_open = second.open;

        if verbs::verb_in(verb, verbs::KILL_VERBS) && a_is_character {
            return Ok(Some("Violence isn't the answer to this one. ".to_string()));
        }
        if verbs::verb_in(verb, verbs::GIVE_VERBS) && b_is_character && !a_is_character {
            self.world.place(a, b)?;
            return Ok(Some(format!("The {b_name} accepts the {a_name}. ")));
        }
        if verbs::verb_in(verb, verbs::PUT_VERBS)
            && verbs::INSERT_PREPOSITIONS.contains(&preposition)
            && b_container
        {
            if !b_open {
                return Ok(Some(format!("The {b_name} is closed. ")));
            }
            self.world.place(a, b)?;
            let linking = if a_plural { "are" } else { "is" };
            let spot = if matches!(preposition, "on" | "onto") {
                "on"
            } else {
                "in"
            };
            return Ok(Some(format!(
                "The {a_name} {linking} now {spot} the {b_name}. "
            )));
        }
        if verbs::verb_in(verb, verbs::THROW_VERBS) && !a_is_character {
            self.world.place(a, self.location)?;
            return Ok(Some("Thrown. ".to_string()));
        }
        Ok(None)
    }

    async fn take_single(&mut self) -> EngineResult<String> {
        let takeable: Vec<EntityId> = self
            .world
            .visible_from(self.location)
            .into_iter()
            .filter(|id| {
                self.world
                    .entity(*id)
                    .is_some_and(|entity| entity.caps.portable)
            })
            .collect();
        match takeable.as_slice() {
            [] => self.narrator.narrate(&NarrationRequest::NothingToTake).await,
            [only] => {
                let id = *only;
                let name = self.entity_name(id);
                let player = self.world.player();
                self.world.place(id, player)?;
                self.last_noun = name.clone();
                Ok(format!("({name}) Taken. "))
            }
            _ => Ok("What do you want to take? ".to_string()),
        }
    }

    async fn take_everything(&mut self) -> EngineResult<String> {
        let visible = self.world.visible_from(self.location);
        let mut lines = Vec::new();
        for id in visible {
            let Some((name, portable, refusal)) = self
                .world
                .entity(id)
                .map(|entity| (entity.name.clone(), entity.caps.portable, entity.refusal.clone()))
            else {
                continue;
            };
            if portable {
                let player = self.world.player();
                self.world.place(id, player)?;
                lines.push(format!("{name}: Taken. "));
            } else if let Some(refusal) = refusal {
                lines.push(format!("{name}: {refusal}"));
            }
        }
        if lines.is_empty() {
            return self.narrator.narrate(&NarrationRequest::NothingToTake).await;
        }
        Ok(lines.join("\n"))
    }

    async fn drop_everything(&mut self) -> EngineResult<String> {
        let carried: Vec<EntityId> = self.world.inventory().to_vec();
        if carried.is_empty() {
            return self.narrator.narrate(&NarrationRequest::NothingToDrop).await;
        }
        let spot = self.vehicle.unwrap_or(self.location);
        let mut lines = Vec::new();
        for id in carried {
            let name = self.entity_name(id);
            self.world.place(id, spot)?;
            lines.push(format!("{name}: Dropped. "));
        }
        Ok(lines.join("\n"))
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// The entities that can be addressed this turn, inventory first.
    fn talkables(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.world.inventory().to_vec();
        ids.extend(self.world.visible_from(self.location));
        ids.retain(|id| {
            self.world
                .entity(*id)
                .is_some_and(|entity| entity.caps.talkable)
        });
        ids
    }

    fn entity_name(&self, id: EntityId) -> String {
        self.world
            .entity(id)
            .map(|entity| entity.name.clone())
            .unwrap_or_default()
    }

    fn entity_reaction(&mut self, id: EntityId, intent: &Intent) -> Option<String> {
        let handler = self.handlers.get_mut(&id)?;
        handler.on_intent(id, intent, &mut self.world)
    }

    /// Offer the intent to every item present, location contents before
    /// inventory. The first handler that answers claims the turn.
    fn items_reaction(&mut self, intent: &Intent) -> Option<String> {
        let mut present = self.world.visible_from(self.location);
        present.extend(self.world.inventory().iter().copied());
        for id in present {
            if let Some(text) = self.entity_reaction(id, intent) {
                return Some(text);
            }
        }
        None
    }

    fn turn_begin(&mut self) -> Option<String> {
        let location = self.location;
        let handler = self.handlers.get_mut(&location)?;
        handler.on_turn_begin(location, &mut self.world)
    }

    fn location_raw_input(&mut self, input: &str) -> Option<String> {
        let location = self.location;
        let handler = self.handlers.get_mut(&location)?;
        handler.on_raw_input(location, input, &mut self.world)
    }

    /// Candidates whose alias list contains the word exactly.
    fn matching_alias(&self, candidates: &[EntityId], word: &str) -> Vec<EntityId> {
        candidates
            .iter()
            .copied()
            .filter(|id| {
                self.world
                    .entity(*id)
                    .is_some_and(|entity| entity.nouns().any(|alias| alias.to_lowercase() == word))
            })
            .collect()
    }

    /// Build the disambiguation question and remember how to resume it.
    fn ask_which_one(&mut self, candidates: &[EntityId], verb: &str) -> String {
        let mut options = HashMap::new();
        let mut choices = Vec::new();
        for id in candidates {
            let Some(entity) = self.world.entity(*id) else {
                continue;
            };
            let full = entity.longest_noun().to_string();
            for alias in entity.nouns() {
                options.insert(alias.to_lowercase(), full.clone());
            }
            choices.push(format!("the {full}"));
        }
        self.pending = Some(Pending::Disambiguate {
            options,
            verb: verb.to_string(),
        });
        format!("Do you mean {}?", join_list(&choices, "or"))
    }

    fn locate_for_multi(&self, noun: &str) -> MultiNounSpot {
        let mut reachable: Vec<EntityId> = self.world.inventory().to_vec();
        reachable.extend(self.world.visible_from(self.location));
        if let Some(id) = resolver::find_match(&self.world, noun, &reachable) {
            return MultiNounSpot::Present(id);
        }
        let noun = noun.trim().to_lowercase();
        let mentioned = !noun.is_empty()
            && self
                .world
                .entity(self.location)
                .is_some_and(|location| location.description.to_lowercase().contains(&noun));
        if mentioned {
            MultiNounSpot::Scenery
        } else {
            MultiNounSpot::Absent
        }
    }

    async fn absent_noun(&mut self, noun: &str, original: &str) -> EngineResult<String> {
        let request = if self.exists_in_story(noun) {
            NarrationRequest::NounNotPresent {
                location: self.location_name(),
                noun: noun.to_string(),
            }
        } else {
            NarrationRequest::CommandHasNoEffect {
                location: self.location_name(),
                input: original.to_string(),
            }
        };
        self.narrator.narrate(&request).await
    }

    fn exists_in_story(&self, noun: &str) -> bool {
        let everything: Vec<EntityId> = self.world.entities().map(|entity| entity.id).collect();
        resolver::find_match(&self.world, noun, &everything).is_some()
    }

    fn is_dark_here(&self) -> bool {
        let dark = self
            .world
            .entity(self.location)
            .is_some_and(|location| location.caps.dark);
        dark && !self.light_present()
    }

    fn light_present(&self) -> bool {
        let visible = self.world.visible_from(self.location);
        self.world
            .inventory()
            .iter()
            .chain(visible.iter())
            .any(|id| self.world.entity(*id).is_some_and(Entity::is_lit))
    }

    fn last_noun_is_plural(&self) -> bool {
        let everything: Vec<EntityId> = self.world.entities().map(|entity| entity.id).collect();
        match resolver::find_match(&self.world, &self.last_noun, &everything) {
            Some(id) => self
                .world
                .entity(id)
                .is_some_and(|entity| entity.caps.plural),
            None => pronoun::looks_plural(&self.last_noun),
        }
    }

    async fn parse_intent(&mut self, input: &str) -> EngineResult<Intent> {
        let Some(oracle) = &self.parser else {
            return Ok(Intent::Null);
        };
        let description = self
            .world
            .entity(self.location)
            .map(|location| location.description.clone())
            .unwrap_or_default();
        let system = parser::parser_prompt(&description);
        self.observer.on_oracle_request(&system, input);
        let reply = oracle.complete(&system, input).await?;
        self.observer.on_oracle_reply(&reply);
        Ok(parser::resolve_reply(input, &reply))
    }

    // -----------------------------------------------------------------------
    // Text assembly
    // -----------------------------------------------------------------------

    fn describe_location(&self, full: bool) -> String {
        if self.is_dark_here() {
            return "It is pitch black here. You can't see a thing.".to_string();
        }
        let Some(location) = self.world.entity(self.location) else {
            return String::new();
        };
        let mut text = location.name.clone();
        if let Some(vehicle) = self.vehicle {
            text.push_str(&format!(" (in the {})", self.entity_name(vehicle)));
        }
        if full {
            if !location.description.is_empty() {
                text.push('\n');
                text.push_str(&location.description);
            }
            for id in self.world.contents(self.location) {
                if let Some(entity) = self.world.entity(*id)
                    && let Some(line) = contents_line(entity)
                {
                    text.push('\n');
                    text.push_str(&line);
                }
            }
        }
        text
    }

    fn leave_vehicle(&mut self, vehicle: EntityId) -> String {
        self.vehicle = None;
        format!("You get out of the {}. ", self.entity_name(vehicle))
    }

    fn score_line(&self) -> String {
        format!("Your score is {}, in {} moves. ", self.score, self.moves)
    }

    /// Stitch a completed turn together: the location's opening text, the
    /// turn's own result, then anything the actors had to add.
    fn end_of_turn(
        &mut self,
        input: &str,
        prepend: Option<String>,
        body: String,
        notes: Vec<String>,
    ) -> TurnOutput {
        self.last_input = input.to_string();
        let mut parts = Vec::new();
        if let Some(prepend) = prepend {
            parts.push(prepend);
        }
        parts.push(body);
        parts.extend(notes);

        let mut text = String::new();
        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(part);
        }
        self.finish(text, None)
    }

    /// Every output ends with exactly one newline, even the empty ones.
    fn finish(&mut self, text: String, event: Option<SessionEvent>) -> TurnOutput {
        let mut text = text.trim_end().to_string();
        text.push('\n');
        self.observer.on_output(&text);
        TurnOutput { text, event }
    }
}

/// "a sword", "an oar", "some coins".
fn listing_phrase(entity: &Entity) -> String {
    let noun = entity.longest_noun();
    if entity.caps.plural {
        format!("some {noun}")
    } else if starts_with_vowel(noun) {
        format!("an {noun}")
    } else {
        format!("a {noun}")
    }
}

/// The "is here" line an entity contributes to a location description.
fn contents_line(entity: &Entity) -> Option<String> {
    match entity.kind {
        EntityKind::Location => None,
        EntityKind::Character => Some(format!("The {} is here.", entity.longest_noun())),
        _ if entity.caps.plural => Some(format!("There are {} here.", entity.longest_noun())),
        _ => Some(format!("There is {} here.", listing_phrase(entity))),
    }
}

fn starts_with_vowel(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|first| matches!(first.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// "a, b or c" / "a, b and c".
fn join_list(items: &[String], connector: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} {connector} {last}", rest.join(", ")),
    }
}
