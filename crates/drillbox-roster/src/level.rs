//! Score → level buckets

use serde::{Deserialize, Serialize};

const EXPERT_MIN: i64 = 90;
const CONFIRMED_MIN: i64 = 70;
const INTERMEDIATE_MIN: i64 = 50;

/// Skill level derived from a score. Serialized with its French label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "débutant")]
    Beginner,
    #[serde(rename = "intermédiaire")]
    Intermediate,
    #[serde(rename = "confirmé")]
    Confirmed,
    #[serde(rename = "expert")]
    Expert,
}

impl Level {
    pub fn from_score(score: i64) -> Self {
        if score >= EXPERT_MIN {
            Self::Expert
        } else if score >= CONFIRMED_MIN {
            Self::Confirmed
        } else if score >= INTERMEDIATE_MIN {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "débutant",
            Self::Intermediate => "intermédiaire",
            Self::Confirmed => "confirmé",
            Self::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
