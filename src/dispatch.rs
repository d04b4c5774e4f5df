//! Command dispatch: the closed token set the bot recognizes.
//!
//! Commands are recognized independent of the user's persisted state —
//! issuing `/mood` mid-way through a goal edit abandons the edit. Anything
//! that does not parse as a command is handed to the engine's free-text
//! transition.

/// The commands the bot understands. Stateless tokens; each maps to one
/// handler in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Goal,
    EditGoal,
    DeleteGoal,
    CompleteGoal,
    Prioritize,
    SetDeadline,
    SetCategory,
    Mood,
    EditMood,
    DeleteMood,
    Progress,
    Coaching,
    Help,
}

/// Parse an inbound message as a command token.
///
/// Accepts `/token` and `/token@botname` (Telegram appends the bot username
/// in group chats). Returns `None` for free text and unknown tokens; an
/// unknown `/foo` falls through to the free-text path.
pub fn parse(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    let token = trimmed.strip_prefix('/')?;
    // Only the first word counts; "/goal now" is still /goal.
    let token = token.split_whitespace().next().unwrap_or("");
    let token = token.split('@').next().unwrap_or("");
    match token.to_lowercase().as_str() {
        "start" => Some(Command::Start),
        "goal" => Some(Command::Goal),
        "editgoal" => Some(Command::EditGoal),
        "deletegoal" => Some(Command::DeleteGoal),
        "completegoal" => Some(Command::CompleteGoal),
        "prioritize" => Some(Command::Prioritize),
        "setdeadline" => Some(Command::SetDeadline),
        "setcategory" => Some(Command::SetCategory),
        "mood" => Some(Command::Mood),
        "editmood" => Some(Command::EditMood),
        "deletemood" => Some(Command::DeleteMood),
        "progress" => Some(Command::Progress),
        "coaching" => Some(Command::Coaching),
        "help" => Some(Command::Help),
        _ => None,
    }
}
