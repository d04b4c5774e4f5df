//! Mood normalization: free text to a small closed vocabulary.
//!
//! The synonym tables are data, not code — extending a tag's vocabulary is
//! a one-line edit. Matching is case-insensitive *exact* match (not
//! substring); anything unmatched is `Neutral`, which makes `normalize`
//! total.

use serde::{Deserialize, Serialize};

/// Normalized mood tag stored alongside the user's original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
    Angry,
}

/// Bilingual (English/German) synonym lists, one per tag.
const MOOD_SYNONYMS: &[(Mood, &[&str])] = &[
    (
        Mood::Happy,
        &[
            "happy", "joyful", "great", "good", "glücklich", "froh", "very good", "verygood",
            "awesome", "awesom",
        ],
    ),
    (
        Mood::Sad,
        &["sad", "depressed", "down", "traurig", "niedergeschlagen"],
    ),
    (Mood::Neutral, &["neutral", "okay", "meh", "normal"]),
    (
        Mood::Angry,
        &["angry", "frustrated", "irritated", "wütend", "verärgert"],
    ),
];

/// Map a free-text mood description to its tag. Total and deterministic.
pub fn normalize(text: &str) -> Mood {
    let needle = text.trim().to_lowercase();
    for (mood, synonyms) in MOOD_SYNONYMS {
        if synonyms.contains(&needle.as_str()) {
            return *mood;
        }
    }
    Mood::Neutral
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Angry => "angry",
        }
    }

    /// Map a stored tag string; unknown values read as `Neutral`.
    pub fn from_db(s: &str) -> Self {
        match s {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            _ => Self::Neutral,
        }
    }

    /// Emoji used in the progress report.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😄",
            Self::Sad => "😔",
            Self::Neutral => "😐",
            Self::Angry => "😠",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_synonyms_map_to_their_tag() {
        assert_eq!(normalize("happy"), Mood::Happy);
        assert_eq!(normalize("depressed"), Mood::Sad);
        assert_eq!(normalize("meh"), Mood::Neutral);
        assert_eq!(normalize("frustrated"), Mood::Angry);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(normalize("AWESOME"), Mood::Happy);
        assert_eq!(normalize("Traurig"), Mood::Sad);
        assert_eq!(normalize("WÜTEND"), Mood::Angry);
    }

    #[test]
    fn unmatched_text_defaults_to_neutral() {
        assert_eq!(normalize("xyzzy"), Mood::Neutral);
        assert_eq!(normalize(""), Mood::Neutral);
        // Substrings do not count as matches.
        assert_eq!(normalize("so very happy today"), Mood::Neutral);
    }

    #[test]
    fn normalize_is_deterministic() {
        for input in ["AWESOME", "xyzzy", "okay", "verärgert"] {
            assert_eq!(normalize(input), normalize(input));
        }
    }

    #[test]
    fn multi_word_synonyms_match() {
        assert_eq!(normalize("very good"), Mood::Happy);
    }
}
