//! Wire types. Field names stay French on the wire (`nom`, `niveau`, ...).

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Incoming character: a name and a raw score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(rename = "nom")]
    pub name: String,
    pub score: i64,
}

impl Character {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    pub fn classify(&self) -> ScoredCharacter {
        ScoredCharacter {
            name: self.name.clone(),
            score: self.score,
            level: Level::from_score(self.score),
        }
    }
}

/// Character with its computed level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCharacter {
    #[serde(rename = "nom")]
    pub name: String,
    pub score: i64,
    #[serde(rename = "niveau")]
    pub level: Level,
}

/// Entry of the static, token-protected listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedCharacter {
    pub id: u32,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "univers")]
    pub universe: String,
}

/// Score submitted to `POST /scores`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "revenu")]
    pub income: f64,
    #[serde(rename = "avis")]
    pub review: String,
}

pub fn static_roster() -> Vec<ListedCharacter> {
    [
        (1, "Harry Potter", "Harry Potter"),
        (2, "Luke Skywalker", "Star Wars"),
        (3, "Tony Stark", "Marvel"),
        (4, "Geralt de Riv", "The Witcher"),
    ]
    .into_iter()
    .map(|(id, name, universe)| ListedCharacter {
        id,
        name: name.to_string(),
        universe: universe.to_string(),
    })
    .collect()
}
