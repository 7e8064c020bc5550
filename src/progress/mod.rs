//! Session progress and difficulty progression
//!
//! A session counts sentences and keeps every round's result. After each
//! round the tier for the next one is drawn at random from a distribution
//! that depends only on how far into the session the player is:
//!
//! | sentences | easy | medium | hard |
//! |-----------|------|--------|------|
//! | 1-5       | 70%  | 30%    | 0%   |
//! | 6-15      | 50%  | 40%    | 10%  |
//! | 16-30     | 30%  | 50%    | 20%  |
//! | 31+       | 20%  | 40%    | 40%  |
//!
//! Success rate and average mistakes over the last five rounds are computed
//! and logged but do not shift the distribution.

use crate::game::Tier;
use rand::Rng;

/// Results considered when picking the next tier
pub const RECENT_WINDOW: usize = 5;

/// Summary of a finished round
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub sentence_number: u32,
    pub difficulty: Tier,
    pub is_won: bool,
    pub mistakes: u32,
    pub hints_used: u32,
    pub time_spent_seconds: u64,
}

/// Progress through a session of rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressiveGameState {
    current_sentence_number: u32,
    performance_history: Vec<GameResult>,
    /// Tier for the next round to be played
    current_difficulty: Tier,
}

impl Default for ProgressiveGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressiveGameState {
    /// A fresh session: sentence 1, no history, easy
    pub fn new() -> Self {
        Self {
            current_sentence_number: 1,
            performance_history: Vec::new(),
            current_difficulty: Tier::Easy,
        }
    }

    /// Record a finished round and pick the tier for the next one.
    pub fn record_result<R: Rng + ?Sized>(&self, result: GameResult, rng: &mut R) -> Self {
        let mut performance_history = self.performance_history.clone();
        performance_history.push(result);
        let current_sentence_number = self.current_sentence_number + 1;

        let recent = tail(&performance_history, RECENT_WINDOW);
        let current_difficulty = next_difficulty(current_sentence_number, recent, rng);

        Self {
            current_sentence_number,
            performance_history,
            current_difficulty,
        }
    }

    /// Number of the sentence about to be played
    pub fn current_sentence_number(&self) -> u32 {
        self.current_sentence_number
    }

    /// Tier of the sentence about to be played
    pub fn current_difficulty(&self) -> Tier {
        self.current_difficulty
    }

    /// All recorded results, oldest first
    pub fn performance_history(&self) -> &[GameResult] {
        &self.performance_history
    }

    /// The last `n` results (fewer early in the session)
    pub fn recent_results(&self, n: usize) -> &[GameResult] {
        tail(&self.performance_history, n)
    }

    /// The results that drive the next tier
    pub fn recent_window(&self) -> &[GameResult] {
        self.recent_results(RECENT_WINDOW)
    }

    /// Share of won rounds in the recent window
    pub fn success_rate(&self) -> f64 {
        success_rate(self.recent_window())
    }

    /// Average mistakes per round in the recent window
    pub fn average_mistakes(&self) -> f64 {
        average_mistakes(self.recent_window())
    }

    /// Rounds won over the whole session
    pub fn total_wins(&self) -> usize {
        self.performance_history.iter().filter(|r| r.is_won).count()
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn success_rate(results: &[GameResult]) -> f64 {
    if results.is_empty() {
        0.0
    } else {
        results.iter().filter(|r| r.is_won).count() as f64 / results.len() as f64
    }
}

fn average_mistakes(results: &[GameResult]) -> f64 {
    if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.mistakes as f64).sum::<f64>() / results.len() as f64
    }
}

/// (easy, medium, hard) probabilities for a sentence number
fn band_weights(sentence_number: u32) -> [f64; 3] {
    match sentence_number {
        0..=5 => [0.7, 0.3, 0.0],
        6..=15 => [0.5, 0.4, 0.1],
        16..=30 => [0.3, 0.5, 0.2],
        _ => [0.2, 0.4, 0.4],
    }
}

/// Map a uniform draw in [0, 1) onto a tier for the given band
fn tier_for_draw(sentence_number: u32, draw: f64) -> Tier {
    let [easy, medium, _] = band_weights(sentence_number);
    if draw < easy {
        Tier::Easy
    } else if draw < easy + medium {
        Tier::Medium
    } else {
        Tier::Hard
    }
}

/// Tier for the next round.
///
/// Only the last `RECENT_WINDOW` results are looked at. With no history the
/// answer is always easy; otherwise one random draw is bucketed by the
/// sentence number's band.
pub fn next_difficulty<R: Rng + ?Sized>(
    sentence_number: u32,
    recent: &[GameResult],
    rng: &mut R,
) -> Tier {
    let recent = tail(recent, RECENT_WINDOW);
    if recent.is_empty() {
        return Tier::Easy;
    }

    let tier = tier_for_draw(sentence_number, rng.random::<f64>());

    tracing::debug!(
        sentence_number,
        success_rate = success_rate(recent),
        average_mistakes = average_mistakes(recent),
        next = %tier,
        "picked next difficulty"
    );

    tier
}
