//! Difficulty configuration
//!
//! One `DifficultyConfig` per tier, read from TOML. The default table is
//! embedded in the binary; `GameConfig::load` reads a replacement from disk.

use crate::error::{SifreError, SifreResult};
use crate::game::Tier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Embedded default difficulty table
static DEFAULT_CONFIG: &str = include_str!("../data/difficulty.toml");

/// Upper bound on a round's time limit, in seconds
pub const MAX_TIME_LIMIT_SECONDS: u32 = 600;

/// Word length buckets used to cap pre-revealed letters per word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordLengthBucket {
    UpTo4,
    FiveToSix,
    SevenToEight,
    Nine,
    TenToTwelve,
    Over12,
}

impl WordLengthBucket {
    pub fn all() -> &'static [WordLengthBucket] {
        &[
            WordLengthBucket::UpTo4,
            WordLengthBucket::FiveToSix,
            WordLengthBucket::SevenToEight,
            WordLengthBucket::Nine,
            WordLengthBucket::TenToTwelve,
            WordLengthBucket::Over12,
        ]
    }

    /// Bucket for a word of `len` letters
    pub fn for_len(len: usize) -> Self {
        match len {
            0..=4 => WordLengthBucket::UpTo4,
            5..=6 => WordLengthBucket::FiveToSix,
            7..=8 => WordLengthBucket::SevenToEight,
            9 => WordLengthBucket::Nine,
            10..=12 => WordLengthBucket::TenToTwelve,
            _ => WordLengthBucket::Over12,
        }
    }

    /// Shortest non-empty word that falls in this bucket
    pub fn min_len(&self) -> usize {
        match self {
            WordLengthBucket::UpTo4 => 1,
            WordLengthBucket::FiveToSix => 5,
            WordLengthBucket::SevenToEight => 7,
            WordLengthBucket::Nine => 9,
            WordLengthBucket::TenToTwelve => 10,
            WordLengthBucket::Over12 => 13,
        }
    }

    /// Key used in the config file
    pub fn key(&self) -> &'static str {
        match self {
            WordLengthBucket::UpTo4 => "<=4",
            WordLengthBucket::FiveToSix => "5-6",
            WordLengthBucket::SevenToEight => "7-8",
            WordLengthBucket::Nine => "9",
            WordLengthBucket::TenToTwelve => "10-12",
            WordLengthBucket::Over12 => "12+",
        }
    }
}

/// Maximum letters pre-revealed from a word, per length bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRevealLimits {
    #[serde(rename = "<=4")]
    pub up_to_4: usize,
    #[serde(rename = "5-6")]
    pub five_to_six: usize,
    #[serde(rename = "7-8")]
    pub seven_to_eight: usize,
    #[serde(rename = "9")]
    pub nine: usize,
    #[serde(rename = "10-12")]
    pub ten_to_twelve: usize,
    #[serde(rename = "12+")]
    pub over_12: usize,
}

impl LetterRevealLimits {
    /// Limit for a bucket
    pub fn limit(&self, bucket: WordLengthBucket) -> usize {
        match bucket {
            WordLengthBucket::UpTo4 => self.up_to_4,
            WordLengthBucket::FiveToSix => self.five_to_six,
            WordLengthBucket::SevenToEight => self.seven_to_eight,
            WordLengthBucket::Nine => self.nine,
            WordLengthBucket::TenToTwelve => self.ten_to_twelve,
            WordLengthBucket::Over12 => self.over_12,
        }
    }

    /// Limit for a word of `len` letters
    pub fn for_word_len(&self, len: usize) -> usize {
        self.limit(WordLengthBucket::for_len(len))
    }
}

/// Settings for one difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Round time limit; 0 means untimed
    pub time_limit_seconds: u32,
    pub max_hints: u32,
    /// Chance that a short word gets a pre-revealed letter (medium/hard)
    pub reveal_probability: f64,
    pub letter_reveal_limits: LetterRevealLimits,
}

impl DifficultyConfig {
    fn validate(&self, tier: Tier) -> SifreResult<()> {
        if self.time_limit_seconds > MAX_TIME_LIMIT_SECONDS {
            return Err(SifreError::Config(format!(
                "{}: time_limit_seconds {} exceeds {}",
                tier, self.time_limit_seconds, MAX_TIME_LIMIT_SECONDS
            )));
        }

        if !(0.0..=1.0).contains(&self.reveal_probability) {
            return Err(SifreError::Config(format!(
                "{}: reveal_probability {} is outside [0, 1]",
                tier, self.reveal_probability
            )));
        }

        for bucket in WordLengthBucket::all() {
            let limit = self.letter_reveal_limits.limit(*bucket);
            if limit > bucket.min_len() {
                return Err(SifreError::Config(format!(
                    "{}: letter_reveal_limits[\"{}\"] = {} exceeds minimum word length {}",
                    tier,
                    bucket.key(),
                    limit,
                    bucket.min_len()
                )));
            }
        }

        Ok(())
    }
}

/// Difficulty table for all tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub easy: DifficultyConfig,
    pub medium: DifficultyConfig,
    pub hard: DifficultyConfig,
}

impl GameConfig {
    /// Parse and validate a TOML difficulty table
    pub fn from_toml_str(contents: &str) -> SifreResult<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a difficulty table from a file
    pub fn load(path: impl AsRef<Path>) -> SifreResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// The embedded default table
    pub fn embedded() -> SifreResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Settings for a tier
    pub fn for_tier(&self, tier: Tier) -> &DifficultyConfig {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    pub fn validate(&self) -> SifreResult<()> {
        for tier in Tier::all() {
            self.for_tier(*tier).validate(*tier)?;
        }
        Ok(())
    }
}
