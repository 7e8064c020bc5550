//! Error types for loading data and bootstrapping rounds
//!
//! Per-round outcomes (a wrong guess, an exhausted hint budget) are not
//! errors; they live next to the state machine as plain enums.

use crate::game::Tier;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SifreError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML Parsing Error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Corpus has no sentences for tier '{0}'")]
    EmptyTier(Tier),

    #[error("Invalid sentence: {0}")]
    InvalidSentence(String),
}

pub type SifreResult<T> = Result<T, SifreError>;
