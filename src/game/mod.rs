//! Game logic: cipher generation, reveal planning, guesses and hints

pub mod cipher;
pub mod hint;
pub mod reveal;
pub mod state;
pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty tier of a sentence and of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// All tiers in ascending difficulty
    pub fn all() -> &'static [Tier] {
        &[Tier::Easy, Tier::Medium, Tier::Hard]
    }

    /// Lowercase key used in config and corpus files
    pub fn key(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Turkish label shown to the player
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Easy => "Kolay",
            Tier::Medium => "Orta",
            Tier::Hard => "Zor",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "kolay" => Ok(Tier::Easy),
            "medium" | "orta" => Ok(Tier::Medium),
            "hard" | "zor" => Ok(Tier::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Format a number of seconds as `MM:SS`.
/// Minutes are not rolled over into hours.
pub fn format_as_clock(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}
