//! The conversation state machine.
//!
//! One entry point, [`Engine::handle`], takes (user id, inbound text) and
//! produces the outbound reply. Commands always win over state-directed
//! free-text handling; free text is interpreted against the user's
//! persisted [`ConversationState`]. Every failure branch of a multi-step
//! operation lands back in `Idle` — the user is never stuck because of bad
//! input or a backend fault.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{error, info, warn};

use crate::coach::{check_rate_limit, CoachingGateway};
use crate::dispatch::{self, Command};
use crate::mood;
use crate::session::SessionLocks;
use crate::traits::{Goal, MoodEntry, Profile, StateStore};
use crate::types::{ConversationState, GoalStatus, Priority};

/// Generic retry-later reply for persistence failures outside a specific
/// operation's own error text.
const RETRY_LATER: &str = "Something went wrong. Please try again later.";

const WELCOME: &str = "👋 Welcome to your personal AI Life Coach!\n\n\
    I am here to help you achieve your goals and improve your life.\n\n\
    Tap a command button below or type /help for a full list of commands.";

/// Goal texts containing any of these markers are too vague to track and
/// trigger a re-prompt instead of an insert.
const VAGUE_MARKERS: &[&str] = &["happier", "better", "improve"];

/// Reply keyboard sent with /start.
pub const MAIN_KEYBOARD: &[&[&str]] = &[
    &["/goal", "/mood", "/progress"],
    &["/coaching", "/help"],
    &["/editgoal", "/deletegoal"],
    &["/editmood", "/deletemood"],
];

/// Reply keyboard sent with /help; includes the extended goal commands.
pub const HELP_KEYBOARD: &[&[&str]] = &[
    &["/goal", "/mood", "/progress"],
    &["/coaching", "/help"],
    &["/editgoal", "/deletegoal"],
    &["/editmood", "/deletemood"],
    &["/completegoal", "/prioritize", "/setdeadline", "/setcategory"],
];

/// An outbound unit. Rendering of the keyboard is the channel's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<&'static [&'static [&'static str]]>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(
        text: impl Into<String>,
        keyboard: &'static [&'static [&'static str]],
    ) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

pub struct Engine {
    store: Arc<dyn StateStore>,
    gateway: CoachingGateway,
    locks: SessionLocks,
    coaching_window: Duration,
}

impl Engine {
    pub fn new(
        store: Arc<dyn StateStore>,
        gateway: CoachingGateway,
        coaching_window_minutes: i64,
    ) -> Self {
        Self {
            store,
            gateway,
            locks: SessionLocks::new(),
            coaching_window: Duration::minutes(coaching_window_minutes),
        }
    }

    /// Process one inbound unit. Transitions for the same user are
    /// serialized; the reply is produced only after persistence for the
    /// transition has completed or definitively failed.
    pub async fn handle(&self, user_id: &str, text: &str) -> Reply {
        let _guard = self.locks.acquire(user_id).await;
        let text = text.trim();
        match dispatch::parse(text) {
            Some(cmd) => self.handle_command(user_id, cmd).await,
            None => self.handle_text(user_id, text).await,
        }
    }

    // ---------------- command handlers ----------------

    async fn handle_command(&self, user_id: &str, cmd: Command) -> Reply {
        info!(user_id, ?cmd, "Handling command");

        // /help is fully stateless.
        if cmd == Command::Help {
            return Reply::with_keyboard(help_text(), HELP_KEYBOARD);
        }
        // /progress reads entities but never touches state.
        if cmd == Command::Progress {
            return self.show_progress(user_id).await;
        }

        let profile = match self.store.get_profile(user_id).await {
            Ok(p) => p,
            Err(e) => {
                error!(user_id, "Failed to load profile: {:#}", e);
                return Reply::text(RETRY_LATER);
            }
        };

        use ConversationState as S;
        match cmd {
            Command::Start => {
                self.reset_idle(profile).await;
                Reply::with_keyboard(WELCOME, MAIN_KEYBOARD)
            }
            Command::Goal => {
                self.enter(profile, S::SettingGoal, "Okay, what is your new goal? Please type it in.")
                    .await
            }
            Command::EditGoal => {
                self.enter(
                    profile,
                    S::EditingGoalNumber,
                    "Which goal number do you want to edit? Please type the number.",
                )
                .await
            }
            Command::DeleteGoal => {
                self.enter(
                    profile,
                    S::DeletingGoalNumber,
                    "Which goal number do you want to delete? Please type the number.",
                )
                .await
            }
            Command::CompleteGoal => {
                self.enter(
                    profile,
                    S::CompletingGoalNumber,
                    "Which goal number do you want to complete? Please type the number.",
                )
                .await
            }
            Command::Prioritize => {
                self.enter(
                    profile,
                    S::PrioritizingGoalNumber,
                    "Which goal number do you want to prioritize? Please type the number.",
                )
                .await
            }
            Command::SetDeadline => {
                self.enter(
                    profile,
                    S::SettingDeadlineGoalNumber,
                    "For which goal number do you want to set a deadline? Please type the number.",
                )
                .await
            }
            Command::SetCategory => {
                self.enter(
                    profile,
                    S::SettingCategoryGoalNumber,
                    "For which goal number do you want to set a category? Please type the number.",
                )
                .await
            }
            Command::Mood => {
                self.enter(profile, S::LoggingMood, "How are you feeling? Please describe your mood.")
                    .await
            }
            Command::EditMood => {
                self.enter(
                    profile,
                    S::EditingMoodNumber,
                    "Which mood entry number do you want to edit? Please type the number.",
                )
                .await
            }
            Command::DeleteMood => {
                self.enter(
                    profile,
                    S::DeletingMoodNumber,
                    "Which mood entry number do you want to delete? Please type the number.",
                )
                .await
            }
            Command::Coaching => self.coaching_session(user_id, profile).await,
            Command::Help | Command::Progress => unreachable!("handled above"),
        }
    }

    // ---------------- free-text transitions ----------------

    async fn handle_text(&self, user_id: &str, text: &str) -> Reply {
        let profile = match self.store.get_profile(user_id).await {
            Ok(p) => p,
            Err(e) => {
                error!(user_id, "Failed to load profile: {:#}", e);
                return Reply::text(RETRY_LATER);
            }
        };

        let state = match ConversationState::decode(&profile.state) {
            Ok(s) => s,
            Err(_) => {
                // A state written by an incompatible version. Answer once
                // via the gateway and leave the stored value untouched; any
                // command gets the user out.
                let state_name = profile.state.clone();
                warn!(user_id, state = %state_name, "Unrecognized persisted state");
                return self.coaching_reply(user_id, Some(&state_name), text).await;
            }
        };
        info!(user_id, state = state.name(), "Handling free text");

        use ConversationState as S;
        match state {
            S::Idle => self.coaching_reply(user_id, None, text).await,

            S::SettingGoal => {
                if text.is_empty() {
                    return self
                        .finish(profile, "Please specify a goal. Example: Exercise more")
                        .await;
                }
                if is_vague_goal(text) {
                    // The one deliberate loop: stay in SettingGoal until the
                    // user supplies something concrete or issues a command.
                    return Reply::text(
                        "That's a great goal! To make it more tangible, could you formulate it more specifically?",
                    );
                }
                match self.store.insert_goal(user_id, text).await {
                    Ok(_) => self.finish(profile, format!("✅ New goal set: {}", text)).await,
                    Err(e) => {
                        error!(user_id, "Error setting goal: {:#}", e);
                        self.finish(profile, "Error setting the goal. Please try again later.")
                            .await
                    }
                }
            }

            S::EditingGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    self.enter(
                        profile,
                        S::EditingGoalText { goal_id },
                        &format!(
                            "Okay, you want to edit goal number {}. What is the new text for this goal?",
                            goal_id
                        ),
                    )
                    .await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::EditingGoalText { goal_id } => {
                if text.is_empty() {
                    return self
                        .finish(profile, "Error processing goal edit. Please try again.")
                        .await;
                }
                let reply = match self.store.update_goal_text(goal_id, user_id, text).await {
                    Ok(0) => "Goal not found or does not belong to this user.".to_string(),
                    Ok(_) => format!("✅ Goal {} updated.", goal_id),
                    Err(e) => {
                        error!(user_id, goal_id, "Error editing goal: {:#}", e);
                        "Error editing the goal. Please try again later.".to_string()
                    }
                };
                self.finish(profile, reply).await
            }

            S::DeletingGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    let reply = match self.store.delete_goal(goal_id, user_id).await {
                        Ok(0) => "Goal not found or does not belong to this user.".to_string(),
                        Ok(_) => format!("✅ Goal {} deleted.", goal_id),
                        Err(e) => {
                            error!(user_id, goal_id, "Error deleting goal: {:#}", e);
                            "Error deleting the goal. Please try again later.".to_string()
                        }
                    };
                    self.finish(profile, reply).await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::CompletingGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    let reply = match self.store.complete_goal(goal_id, user_id).await {
                        Ok(0) => "Goal not found or does not belong to this user.".to_string(),
                        Ok(_) => format!("🎉 Goal {} marked as completed!", goal_id),
                        Err(e) => {
                            error!(user_id, goal_id, "Error completing goal: {:#}", e);
                            "Error marking the goal as completed. Please try again later."
                                .to_string()
                        }
                    };
                    self.finish(profile, reply).await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::PrioritizingGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    self.enter(
                        profile,
                        S::SettingPriorityValue { goal_id },
                        &format!(
                            "Okay, you want to prioritize goal number {}. What priority do you want to set (high, medium, low)?",
                            goal_id
                        ),
                    )
                    .await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::SettingPriorityValue { goal_id } => match Priority::parse(text) {
                Some(priority) => {
                    let reply = match self.store.set_goal_priority(goal_id, user_id, priority).await
                    {
                        Ok(0) => "Goal not found or does not belong to this user.".to_string(),
                        Ok(_) => format!("✅ Priority of goal {} set to {}.", goal_id, priority.as_str()),
                        Err(e) => {
                            error!(user_id, goal_id, "Error prioritizing goal: {:#}", e);
                            "Error setting the priority. Please try again later.".to_string()
                        }
                    };
                    self.finish(profile, reply).await
                }
                None => {
                    self.finish(
                        profile,
                        "Invalid priority value. Please provide: high, medium, or low.",
                    )
                    .await
                }
            },

            S::SettingDeadlineGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    self.enter(
                        profile,
                        S::SettingDeadlineDate { goal_id },
                        &format!(
                            "Okay, for goal number {}, what deadline do you want to set? Please use YYYY-MM-DD format.",
                            goal_id
                        ),
                    )
                    .await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::SettingDeadlineDate { goal_id } => {
                match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    Ok(deadline) => {
                        let reply =
                            match self.store.set_goal_deadline(goal_id, user_id, deadline).await {
                                Ok(0) => {
                                    "Goal not found or does not belong to this user.".to_string()
                                }
                                Ok(_) => {
                                    format!("✅ Deadline for goal {} set to {}.", goal_id, text)
                                }
                                Err(e) => {
                                    error!(user_id, goal_id, "Error setting deadline: {:#}", e);
                                    "Error setting the deadline. Please try again later."
                                        .to_string()
                                }
                            };
                        self.finish(profile, reply).await
                    }
                    Err(_) => {
                        self.finish(profile, "Invalid date format. Please use YYYY-MM-DD.")
                            .await
                    }
                }
            }

            S::SettingCategoryGoalNumber => match parse_entity_number(text) {
                Some(goal_id) => {
                    self.enter(
                        profile,
                        S::SettingCategoryText { goal_id },
                        &format!(
                            "Okay, for goal number {}, what category do you want to set? Please type the category name.",
                            goal_id
                        ),
                    )
                    .await
                }
                None => {
                    self.finish(profile, "Invalid goal number. Please type a number.")
                        .await
                }
            },

            S::SettingCategoryText { goal_id } => {
                if text.is_empty() {
                    return self
                        .finish(profile, "Error processing category. Please try again.")
                        .await;
                }
                let reply = match self.store.set_goal_category(goal_id, user_id, text).await {
                    Ok(0) => "Goal not found or does not belong to this user.".to_string(),
                    Ok(_) => format!("✅ Category for goal {} set to '{}'.", goal_id, text),
                    Err(e) => {
                        error!(user_id, goal_id, "Error setting category: {:#}", e);
                        "Error setting the category. Please try again later.".to_string()
                    }
                };
                self.finish(profile, reply).await
            }

            S::LoggingMood => {
                if text.is_empty() {
                    return self.finish(profile, "Please describe your mood.").await;
                }
                let tag = mood::normalize(text);
                match self.store.insert_mood(user_id, tag, text).await {
                    Ok(_) => self.finish(profile, format!("✅ Mood logged: {}", text)).await,
                    Err(e) => {
                        error!(user_id, "Error logging mood: {:#}", e);
                        self.finish(profile, "Error logging mood. Please try again later.")
                            .await
                    }
                }
            }

            S::EditingMoodNumber => match parse_entity_number(text) {
                Some(mood_id) => {
                    self.enter(
                        profile,
                        S::EditingMoodText { mood_id },
                        &format!(
                            "Okay, you want to edit mood entry number {}. What is the new text for this mood?",
                            mood_id
                        ),
                    )
                    .await
                }
                None => {
                    self.finish(profile, "Invalid mood entry number. Please type a number.")
                        .await
                }
            },

            S::EditingMoodText { mood_id } => {
                if text.is_empty() {
                    return self
                        .finish(profile, "Error processing mood edit. Please try again.")
                        .await;
                }
                let tag = mood::normalize(text);
                let reply = match self.store.update_mood(mood_id, user_id, tag, text).await {
                    Ok(0) => "Mood entry not found or does not belong to this user.".to_string(),
                    Ok(_) => format!("✅ Mood {} updated.", mood_id),
                    Err(e) => {
                        error!(user_id, mood_id, "Error editing mood: {:#}", e);
                        "Error editing the mood. Please try again later.".to_string()
                    }
                };
                self.finish(profile, reply).await
            }

            S::DeletingMoodNumber => match parse_entity_number(text) {
                Some(mood_id) => {
                    let reply = match self.store.delete_mood(mood_id, user_id).await {
                        Ok(0) => {
                            "Mood entry not found or does not belong to this user.".to_string()
                        }
                        Ok(_) => format!("✅ Mood entry {} deleted.", mood_id),
                        Err(e) => {
                            error!(user_id, mood_id, "Error deleting mood: {:#}", e);
                            "Error deleting the mood entry. Please try again later.".to_string()
                        }
                    };
                    self.finish(profile, reply).await
                }
                None => {
                    self.finish(profile, "Invalid mood entry number. Please type a number.")
                        .await
                }
            },
        }
    }

    // ---------------- shared transition plumbing ----------------

    /// Persist the target state and send its prompt. If the state cannot be
    /// persisted, the operation must not start: the user gets a retry-later
    /// reply instead of a prompt they cannot answer.
    async fn enter(&self, mut profile: Profile, state: ConversationState, prompt: &str) -> Reply {
        profile.state = state.encoded();
        match self.store.save_profile(&profile).await {
            Ok(()) => Reply::text(prompt),
            Err(e) => {
                error!(user_id = %profile.user_id, state = state.name(), "Failed to persist state: {:#}", e);
                Reply::text(RETRY_LATER)
            }
        }
    }

    /// End the current operation: state goes back to `Idle` and the final
    /// reply is sent. A failed reset is logged, not surfaced — every state
    /// handler resets on its next input anyway.
    async fn finish(&self, profile: Profile, text: impl Into<String>) -> Reply {
        self.reset_idle(profile).await;
        Reply::text(text)
    }

    async fn reset_idle(&self, mut profile: Profile) {
        profile.state = ConversationState::Idle.encoded();
        if let Err(e) = self.store.save_profile(&profile).await {
            warn!(user_id = %profile.user_id, "Failed to persist idle reset: {:#}", e);
        }
    }

    // ---------------- gateway-backed replies ----------------

    /// Free-text reply through the coaching gateway, used for idle chatter
    /// and for the unrecognized-state fallback (which annotates the state
    /// name). Neither variant alters persisted state, and neither is rate
    /// limited.
    async fn coaching_reply(&self, user_id: &str, state_name: Option<&str>, text: &str) -> Reply {
        let goals = match self.store.list_goals(user_id).await {
            Ok(goals) => goals,
            Err(e) => {
                error!(user_id, "Error loading goals for coaching reply: {:#}", e);
                let reply = match state_name {
                    Some(_) => {
                        "I'm having a little trouble understanding. Could you please use a command or clarify what you meant?"
                    }
                    None => {
                        "I did not understand this message. Please use the available commands or rephrase your request. For a list of commands, type /help."
                    }
                };
                return Reply::text(reply);
            }
        };
        let goals_text = goals
            .iter()
            .map(|g| g.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = match state_name {
            Some(state) => format!(
                "User seems to be in state: {}.\nUser's previous goals: {}\nCurrent message: {}\n\n\
                 Please respond as an empathetic life coach and refer to the user's goals and current state, \
                 gently guiding them back to using commands or clarifying their input.",
                state, goals_text, text
            ),
            None => format!(
                "User's previous goals: {}\nCurrent message: {}\n\n\
                 Please respond as an empathetic life coach and refer to the user's goals.",
                goals_text, text
            ),
        };
        Reply::text(self.gateway.generate(&prompt).await)
    }

    /// The explicit /coaching command: rate limited, audited, and stamped.
    async fn coaching_session(&self, user_id: &str, mut profile: Profile) -> Reply {
        let now = Utc::now();
        if let Err(next_allowed) = check_rate_limit(profile.last_coaching_at, self.coaching_window, now)
        {
            // Timestamps are stored and compared in UTC; say so rather than
            // guessing the user's timezone.
            return Reply::text(format!(
                "You already had a coaching session recently. Please try again after {} UTC.",
                next_allowed.format("%H:%M")
            ));
        }

        let goals = match self.store.list_goals(user_id).await {
            Ok(g) => g,
            Err(e) => {
                error!(user_id, "Error loading goals for coaching session: {:#}", e);
                return Reply::text(RETRY_LATER);
            }
        };
        let moods = match self.store.list_recent_moods(user_id, 5).await {
            Ok(m) => m,
            Err(e) => {
                error!(user_id, "Error loading moods for coaching session: {:#}", e);
                return Reply::text(RETRY_LATER);
            }
        };

        let prompt = build_coaching_prompt(&goals, &moods);
        let response = self.gateway.generate(&prompt).await;

        // Audit trail and rate-limit stamp are best-effort: the reply goes
        // out either way, and an apology response still consumes the slot.
        if let Err(e) = self
            .store
            .append_coaching_record(user_id, &prompt, &response)
            .await
        {
            warn!(user_id, "Failed to append coaching record: {:#}", e);
        }
        profile.last_coaching_at = Some(now);
        if let Err(e) = self.store.save_profile(&profile).await {
            warn!(user_id, "Failed to stamp coaching session: {:#}", e);
        }

        Reply::text(response)
    }

    // ---------------- progress report ----------------

    async fn show_progress(&self, user_id: &str) -> Reply {
        let goals = match self.store.list_goals(user_id).await {
            Ok(g) => g,
            Err(e) => {
                error!(user_id, "Error showing progress: {:#}", e);
                return Reply::text(
                    "Error retrieving progress information. Please try again later.",
                );
            }
        };
        let moods = match self.store.list_recent_moods(user_id, 5).await {
            Ok(m) => m,
            Err(e) => {
                error!(user_id, "Error showing progress: {:#}", e);
                return Reply::text(
                    "Error retrieving progress information. Please try again later.",
                );
            }
        };
        Reply::text(format_progress(&goals, &moods))
    }
}

// ---------------- pure helpers ----------------

fn parse_entity_number(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

fn is_vague_goal(text: &str) -> bool {
    let lower = text.to_lowercase();
    VAGUE_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn help_text() -> String {
    "Here are the available commands:\n\
     /goal - Set new goal\n\
     /editgoal - Edit goal\n\
     /deletegoal - Delete goal\n\
     /completegoal - Mark goal as completed\n\
     /prioritize - Prioritize goal (high, medium, low)\n\
     /setdeadline - Set deadline for a goal\n\
     /setcategory - Set category for a goal\n\
     /mood - Log mood\n\
     /editmood - Edit mood\n\
     /deletemood - Delete mood\n\
     /progress - Show progress\n\
     /help - Show this message\n\
     /coaching - Start a coaching session"
        .to_string()
}

fn build_coaching_prompt(goals: &[Goal], moods: &[MoodEntry]) -> String {
    let goals_text = if goals.is_empty() {
        "No goals set yet.".to_string()
    } else {
        goals
            .iter()
            .map(|g| format!("- {} (status: {}, priority: {})", g.text, g.status.as_str(), g.priority.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let moods_text = if moods.is_empty() {
        "No moods logged yet.".to_string()
    } else {
        moods
            .iter()
            .map(|m| format!("- {} ('{}')", m.mood.as_str(), m.original_text))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "The user's goals:\n{}\n\nThe user's recent moods:\n{}\n\n\
         Please give the user a short coaching session: review their goals, \
         acknowledge how they have been feeling, and suggest one concrete next step.",
        goals_text, moods_text
    )
}

fn format_progress(goals: &[Goal], moods: &[MoodEntry]) -> String {
    let mut message = String::from("📊 Your Progress:\n\n");

    if goals.is_empty() {
        message.push_str("No goals set yet.\n\n");
    } else {
        message.push_str("🎯 Goals:\n");
        for goal in goals {
            let status_emoji = match goal.status {
                GoalStatus::Completed => "✅",
                GoalStatus::Active => "⏳",
            };
            let deadline_text = match goal.deadline {
                Some(d) => format!("Deadline: {}", d.format("%Y-%m-%d")),
                None => "No Deadline".to_string(),
            };
            let category_text = match &goal.category {
                Some(c) => format!("Category: {}", c),
                None => "No Category".to_string(),
            };
            message.push_str(&format!(
                "  {} Goal {}: {}\n     Status: {}, Priority: {}, {}, {}\n",
                status_emoji,
                goal.id,
                goal.text,
                capitalize(goal.status.as_str()),
                goal.priority.as_str(),
                deadline_text,
                category_text
            ));
        }
        message.push('\n');
    }

    if moods.is_empty() {
        message.push_str("No mood entries logged yet.\n");
    } else {
        message.push_str("😊 Recent Moods (last 5 entries):\n");
        for entry in moods {
            message.push_str(&format!(
                "  {} Mood {} ({}): {} - '{}'\n",
                entry.mood.emoji(),
                entry.id,
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                capitalize(entry.mood.as_str()),
                entry.original_text
            ));
        }
    }

    message
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;

    #[test]
    fn vague_markers_match_as_substrings() {
        assert!(is_vague_goal("I want to be happier"));
        assert!(is_vague_goal("Get BETTER at chess"));
        assert!(is_vague_goal("improve my diet"));
        assert!(!is_vague_goal("Exercise 3x per week"));
    }

    #[test]
    fn entity_numbers_parse_strictly() {
        assert_eq!(parse_entity_number("3"), Some(3));
        assert_eq!(parse_entity_number(" 42 "), Some(42));
        assert_eq!(parse_entity_number("three"), None);
        assert_eq!(parse_entity_number("3.5"), None);
        assert_eq!(parse_entity_number(""), None);
    }

    #[test]
    fn progress_report_lists_goals_and_moods() {
        let goals = vec![Goal {
            id: 1,
            user_id: "alice".into(),
            text: "Run 10k".into(),
            date_set: Utc::now(),
            status: GoalStatus::Active,
            priority: Priority::High,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31),
            category: Some("health".into()),
        }];
        let moods = vec![MoodEntry {
            id: 1,
            user_id: "alice".into(),
            mood: Mood::Happy,
            original_text: "awesome".into(),
            timestamp: Utc::now(),
        }];
        let report = format_progress(&goals, &moods);
        assert!(report.contains("⏳ Goal 1: Run 10k"));
        assert!(report.contains("Priority: high"));
        assert!(report.contains("Deadline: 2026-12-31"));
        assert!(report.contains("Category: health"));
        assert!(report.contains("😄 Mood 1"));
        assert!(report.contains("'awesome'"));
    }

    #[test]
    fn progress_report_handles_empty_data() {
        let report = format_progress(&[], &[]);
        assert!(report.contains("No goals set yet."));
        assert!(report.contains("No mood entries logged yet."));
    }

    #[test]
    fn coaching_prompt_mentions_goals_and_moods() {
        let prompt = build_coaching_prompt(&[], &[]);
        assert!(prompt.contains("No goals set yet."));
        assert!(prompt.contains("No moods logged yet."));
    }
}
