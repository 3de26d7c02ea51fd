//! Global and system command vocabularies.
//!
//! These are the commands a session recognizes without consulting the parsing
//! oracle. System commands address the game itself (save, quit, verbosity) and
//! are checked before anything else so no location logic can intercept them.
//! Global commands act on the world but need no sentence analysis (look,
//! inventory, wait). Matching happens on a normalized copy of the input, so
//! punctuation and case never matter.

/// Commands that address the game itself rather than the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemCommand {
    /// Full location descriptions on every visit.
    Verbose,
    /// Full descriptions only on the first visit.
    Brief,
    /// Never print full descriptions.
    SuperBrief,
    /// Write a save.
    Save,
    /// Restore a save.
    Restore,
    /// Leave the game, after confirmation.
    Quit,
    /// Start over, after confirmation.
    Restart,
}

/// Commands that act on the world but need no parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalCommand {
    /// Describe the current location.
    Look,
    /// List what the player is carrying.
    Inventory,
    /// Let a turn pass.
    Wait,
    /// Report the score.
    Score,
    /// Ask what time it is.
    Time,
    /// Bare "take" with no noun.
    Take,
    /// Pick up everything in reach.
    TakeAll,
    /// Put down everything carried.
    DropAll,
}

/// Lowercase the input and strip everything that is not a letter or a space.
///
/// Command matching runs on this form, so "Save my game!!" and "save my game"
/// are the same command.
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Match input against the system command vocabulary.
pub fn system_command(input: &str) -> Option<SystemCommand> {
    match normalize(input).as_str() {
        "verbose" => Some(SystemCommand::Verbose),
        "brief" => Some(SystemCommand::Brief),
        "superbrief" => Some(SystemCommand::SuperBrief),

        "save" | "save my game" | "save my progress" => Some(SystemCommand::Save),

        "restore" | "restore my game" | "restore my progress" => Some(SystemCommand::Restore),

        "quit" | "quit the game" | "stop" | "end the game" | "i want to quit"
        | "i want to quit the game" | "stop the game" => Some(SystemCommand::Quit),

        "restart" | "restart the game" | "start over" | "start the game over"
        | "start from the beginning" => Some(SystemCommand::Restart),

        _ => None,
    }
}

/// Match input against the global command vocabulary.
pub fn global_command(input: &str) -> Option<GlobalCommand> {
    match normalize(input).as_str() {
        "look" | "l" | "look around" | "look around me" | "where am i"
        | "examine my surroundings" | "examine surroundings" | "examine area"
        | "examine the area" | "examine the surroundings" => Some(GlobalCommand::Look),

        "inventory" | "i" | "what am i holding" | "what do i have on me" | "what do i have"
        | "check inventory" | "check my inventory" | "what do i have in my inventory"
        | "look in my inventory" | "look in inventory" => Some(GlobalCommand::Inventory),

        "wait" | "z" => Some(GlobalCommand::Wait),

        "score" | "what is my score" | "tell me my score" => Some(GlobalCommand::Score),

        "time" | "current time" | "what time is it" | "what is the current time"
        | "what time is it right now" | "what is the time" => Some(GlobalCommand::Time),

        "take" => Some(GlobalCommand::Take),

        "take all" | "take it all" | "get all" | "get everything" | "take everything"
        | "pick up all" | "pick up everything" => Some(GlobalCommand::TakeAll),

        "drop all" | "drop it all" | "drop everything" => Some(GlobalCommand::DropAll),

        _ => None,
    }
}

/// Whether a confirmation reply counts as "yes".
pub fn is_affirmative(input: &str) -> bool {
    matches!(
        normalize(input).as_str(),
        "y" | "yes i do" | "yes" | "sure" | "yup" | "yep" | "yeah" | "ok"
    )
}
