//! Şifre - a Turkish cipher puzzle
//!
//! Every letter of a sentence is replaced by a number. Some letters start
//! revealed; the player works out the rest one position at a time, with
//! three mistakes, a few hints and sometimes a clock.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod game;
pub mod progress;

pub use config::{DifficultyConfig, GameConfig};
pub use corpus::{Corpus, Sentence};
pub use engine::Engine;
pub use error::{SifreError, SifreResult};
pub use game::hint::{HintError, HintPlan, HintStrength};
pub use game::state::{GameState, GuessOutcome, GuessRejection, MAX_MISTAKES};
pub use game::{format_as_clock, Tier};
pub use progress::{GameResult, ProgressiveGameState};
