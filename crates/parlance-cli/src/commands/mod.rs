pub mod play;
pub mod run;
pub mod world;

use std::path::Path;
use std::sync::Arc;

use parlance_core::{World, WorldDef};
use parlance_engine::{Intent, Narrator, Session, Tier, TurnObserver};
use parlance_oracle::{ClaudeOracle, Oracle};

/// Read and validate a world definition file.
fn load_def(path: &Path) -> Result<WorldDef, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    WorldDef::from_json(&json).map_err(|e| format!("invalid world definition: {e}"))
}

/// Read a world definition file and resolve it into a live world.
fn load_world(path: &Path) -> Result<World, String> {
    load_def(path)?
        .build()
        .map_err(|e| format!("invalid world definition: {e}"))
}

/// Build a session over the definition at `path`.
///
/// Online sessions read `ANTHROPIC_API_KEY` and share one oracle between
/// the parser and the narrator; offline sessions fall back to the fixed
/// command tiers and the canned narration lines.
fn start_session(
    path: &Path,
    offline: bool,
    location: Option<&str>,
    seed: Option<u64>,
    trace: bool,
) -> Result<Session, String> {
    let world = load_world(path)?;
    let mut session = match location {
        Some(name) => Session::at_location(world, name),
        None => Session::new(world),
    }
    .map_err(|e| e.to_string())?;

    if !offline {
        let oracle: Arc<dyn Oracle> = Arc::new(ClaudeOracle::from_env().map_err(|e| {
            format!("{e} (set ANTHROPIC_API_KEY, or pass --offline)")
        })?);
        session = session
            .with_parser(oracle.clone())
            .with_narrator(Narrator::with_oracle(oracle));
    }
    if let Some(seed) = seed {
        session = session.with_seed(seed);
    }
    if trace {
        session = session.with_observer(Box::new(Trace));
    }
    Ok(session)
}

/// Observer that mirrors the turn pipeline onto stderr.
struct Trace;

impl TurnObserver for Trace {
    fn on_pattern_match(&mut self, target: &str, message: &str) {
        eprintln!("[conversation] {target}: {message:?}");
    }

    fn on_oracle_request(&mut self, _system: &str, user: &str) {
        eprintln!("[oracle] << {user}");
    }

    fn on_oracle_reply(&mut self, reply: &str) {
        eprintln!("[oracle] >> {reply}");
    }

    fn on_intent(&mut self, intent: &Intent) {
        eprintln!("[intent] {intent:?}");
    }

    fn on_tier(&mut self, tier: Tier) {
        eprintln!("[tier] {tier:?}");
    }
}
