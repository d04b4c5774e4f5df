use serde::{Deserialize, Serialize};

/// Which multi-step dialogue a user is currently inside.
///
/// Persisted per user as a JSON blob in the profile row. Variants that
/// operate on a previously chosen entity carry its id, so a state can only
/// exist together with the data it needs — there are no loose pending-slot
/// fields to clear or leak.
///
/// The serde tags are stable wire format; renaming a variant without keeping
/// its tag would orphan in-flight dialogues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    Idle,
    SettingGoal,
    EditingGoalNumber,
    EditingGoalText { goal_id: i64 },
    DeletingGoalNumber,
    CompletingGoalNumber,
    PrioritizingGoalNumber,
    SettingPriorityValue { goal_id: i64 },
    SettingDeadlineGoalNumber,
    SettingDeadlineDate { goal_id: i64 },
    SettingCategoryGoalNumber,
    SettingCategoryText { goal_id: i64 },
    LoggingMood,
    EditingMoodNumber,
    EditingMoodText { mood_id: i64 },
    DeletingMoodNumber,
}

impl ConversationState {
    /// Parse the persisted JSON form. Fails for states written by an
    /// incompatible version; the engine routes those to the fallback reply
    /// without touching the stored value.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Serialize for persistence.
    pub fn encoded(&self) -> String {
        // A unit/tag+i64 enum cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"state":"idle"}"#.to_string())
    }

    /// The snake_case tag, used when annotating coaching prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SettingGoal => "setting_goal",
            Self::EditingGoalNumber => "editing_goal_number",
            Self::EditingGoalText { .. } => "editing_goal_text",
            Self::DeletingGoalNumber => "deleting_goal_number",
            Self::CompletingGoalNumber => "completing_goal_number",
            Self::PrioritizingGoalNumber => "prioritizing_goal_number",
            Self::SettingPriorityValue { .. } => "setting_priority_value",
            Self::SettingDeadlineGoalNumber => "setting_deadline_goal_number",
            Self::SettingDeadlineDate { .. } => "setting_deadline_date",
            Self::SettingCategoryGoalNumber => "setting_category_goal_number",
            Self::SettingCategoryText { .. } => "setting_category_text",
            Self::LoggingMood => "logging_mood",
            Self::EditingMoodNumber => "editing_mood_number",
            Self::EditingMoodText { .. } => "editing_mood_text",
            Self::DeletingMoodNumber => "deleting_mood_number",
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Goal priority. Default for new goals is `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive parse of user input. Anything outside the closed
    /// set is a validation error, not a default.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Map a stored priority string; unknown values read as `Medium` so a
    /// bad row never breaks a listing.
    pub fn from_db(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Medium)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_db(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            _ => Self::Active,
        }
    }
}
