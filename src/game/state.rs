//! Round state and guess handling
//!
//! A `GameState` is a value: every transition returns a new state and
//! leaves the old one untouched. The parts fixed at round start (sentence,
//! mapping, cipher text, initial reveals) sit behind an `Arc` so copies
//! stay cheap.
//!
//! Time is never checked here. Whoever drives the round polls
//! `remaining_time` and applies `expire` when a timed round runs out.

use super::cipher::{render_cipher, CipherMapping};
use super::hint::{HintError, HintPlan};
use super::reveal::plan_initial_reveals;
use super::text::{letters_match, SentenceLayout};
use super::Tier;
use crate::config::DifficultyConfig;
use crate::corpus::Sentence;
use crate::progress::GameResult;
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Wrong guesses allowed before the round is lost
pub const MAX_MISTAKES: u32 = 3;

/// Result of submitting a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter was right and the position is now revealed
    Correct,
    /// The letter was wrong; a mistake was counted
    Incorrect,
    /// The guess was ignored and nothing changed
    Rejected(GuessRejection),
}

/// Why a guess was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessRejection {
    RoundOver,
    OutOfRange,
}

impl GuessOutcome {
    /// Whether the guess was accepted as correct
    pub fn accepted(&self) -> bool {
        matches!(self, GuessOutcome::Correct)
    }

    /// Returns a user-facing message
    pub fn message(&self) -> &'static str {
        match self {
            GuessOutcome::Correct => "Doğru!",
            GuessOutcome::Incorrect => "Yanlış",
            GuessOutcome::Rejected(GuessRejection::RoundOver) => "Oyun bitti",
            GuessOutcome::Rejected(GuessRejection::OutOfRange) => "Geçersiz konum",
        }
    }
}

/// Everything about a round that never changes after it starts.
#[derive(Debug)]
struct Puzzle {
    sentence: Sentence,
    layout: SentenceLayout,
    mapping: CipherMapping,
    cipher: String,
    initial_revealed: BTreeSet<usize>,
}

/// State of one round.
#[derive(Debug, Clone)]
pub struct GameState {
    puzzle: Arc<Puzzle>,
    user_revealed: BTreeSet<usize>,
    mistakes: u32,
    hints_used: u32,
    max_hints: u32,
    started_at: Instant,
    /// Seconds; 0 means untimed
    time_limit: u32,
    is_game_over: bool,
    is_won: bool,
    difficulty: Tier,
}

impl GameState {
    /// Start a round: generate a mapping, render the cipher and plan the
    /// initial reveals.
    pub fn start<R: Rng + ?Sized>(
        sentence: Sentence,
        tier: Tier,
        config: &DifficultyConfig,
        rng: &mut R,
    ) -> Self {
        let mapping = CipherMapping::generate_with_rng(rng);
        let layout = SentenceLayout::new(&sentence.text);
        let initial_revealed = plan_initial_reveals(&layout, tier, config, rng);
        Self::with_reveals(sentence, tier, config, mapping, initial_revealed)
    }

    /// Build a round from an explicit mapping and reveal set.
    /// Reveal positions outside the sentence are dropped.
    pub fn with_reveals(
        sentence: Sentence,
        tier: Tier,
        config: &DifficultyConfig,
        mapping: CipherMapping,
        initial_revealed: BTreeSet<usize>,
    ) -> Self {
        let layout = SentenceLayout::new(&sentence.text);
        let total = layout.total_letters();
        let initial_revealed = initial_revealed.into_iter().filter(|p| *p < total).collect();
        let cipher = render_cipher(&sentence.text, &mapping);

        let mut state = Self {
            puzzle: Arc::new(Puzzle {
                sentence,
                layout,
                mapping,
                cipher,
                initial_revealed,
            }),
            user_revealed: BTreeSet::new(),
            mistakes: 0,
            hints_used: 0,
            max_hints: config.max_hints,
            started_at: Instant::now(),
            time_limit: config.time_limit_seconds,
            is_game_over: false,
            is_won: false,
            difficulty: tier,
        };

        // Nothing left to guess (e.g. a one-letter sentence on easy)
        if state.is_complete() {
            state.is_won = true;
            state.is_game_over = true;
        }

        state
    }

    /// Guess the letter at a position.
    ///
    /// Callers should not submit positions that are already revealed; such
    /// a guess is judged like any other.
    pub fn submit_guess(&self, letter: char, position: usize) -> (GuessOutcome, GameState) {
        if self.is_game_over {
            return (GuessOutcome::Rejected(GuessRejection::RoundOver), self.clone());
        }

        let Some(actual) = self.puzzle.layout.letter_at(position) else {
            return (GuessOutcome::Rejected(GuessRejection::OutOfRange), self.clone());
        };

        let mut next = self.clone();

        if letters_match(letter, actual) {
            next.user_revealed.insert(position);
            if next.is_complete() {
                next.is_won = true;
                next.is_game_over = true;
                tracing::info!(
                    sentence_id = next.puzzle.sentence.id,
                    mistakes = next.mistakes,
                    "round won"
                );
            }
            tracing::debug!(position, "correct guess");
            (GuessOutcome::Correct, next)
        } else {
            next.mistakes += 1;
            if next.mistakes >= MAX_MISTAKES {
                next.is_game_over = true;
                next.is_won = false;
                tracing::info!(
                    sentence_id = next.puzzle.sentence.id,
                    "round lost: out of mistakes"
                );
            }
            tracing::debug!(position, mistakes = next.mistakes, "incorrect guess");
            (GuessOutcome::Incorrect, next)
        }
    }

    /// Commit a hint computed by `hint::plan_hint`.
    ///
    /// Refused once the round is over, when the hint budget is spent, or
    /// when the plan's anchor has been revealed since it was planned.
    pub fn apply_hint(&self, plan: &HintPlan) -> Result<GameState, HintError> {
        if self.is_game_over {
            return Err(HintError::RoundOver);
        }
        if self.hints_used >= self.max_hints {
            return Err(HintError::HintsExhausted);
        }
        if plan.anchor >= self.total_letters() || self.is_revealed(plan.anchor) {
            return Err(HintError::StalePlan);
        }

        let mut next = self.clone();
        next.user_revealed.extend(
            plan.positions
                .iter()
                .filter(|p| **p < self.total_letters() && !self.is_revealed(**p)),
        );
        next.hints_used += 1;

        if next.is_complete() {
            next.is_won = true;
            next.is_game_over = true;
            tracing::info!(sentence_id = next.puzzle.sentence.id, "round won by hint");
        }

        Ok(next)
    }

    /// End a timed round that ran out of time.
    /// No-op for untimed or finished rounds.
    pub fn expire(&self) -> GameState {
        let mut next = self.clone();
        if !self.is_game_over && self.is_timed() {
            next.is_game_over = true;
            next.is_won = false;
            tracing::info!(
                sentence_id = next.puzzle.sentence.id,
                "round lost: time expired"
            );
        }
        next
    }

    /// Seconds left at `now`; meaningless for untimed rounds.
    pub fn remaining_time_at(&self, now: Instant) -> u32 {
        let elapsed = self.elapsed_seconds_at(now);
        u64::from(self.time_limit).saturating_sub(elapsed) as u32
    }

    /// Seconds left right now
    pub fn remaining_time(&self) -> u32 {
        self.remaining_time_at(Instant::now())
    }

    /// Whole seconds since the round started
    pub fn elapsed_seconds_at(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_secs()
    }

    /// Summary of the round for the session history
    pub fn result(&self, sentence_number: u32) -> GameResult {
        self.result_at(sentence_number, Instant::now())
    }

    /// Summary of the round as of `now`
    pub fn result_at(&self, sentence_number: u32, now: Instant) -> GameResult {
        GameResult {
            sentence_number,
            difficulty: self.difficulty,
            is_won: self.is_won,
            mistakes: self.mistakes,
            hints_used: self.hints_used,
            time_spent_seconds: self.elapsed_seconds_at(now),
        }
    }

    /// Whether every position is revealed
    pub fn is_complete(&self) -> bool {
        self.is_complete_with(&BTreeSet::new())
    }

    /// Whether every position would be revealed after adding `extra`
    pub fn is_complete_with(&self, extra: &BTreeSet<usize>) -> bool {
        (0..self.total_letters()).all(|p| self.is_revealed(p) || extra.contains(&p))
    }

    /// Whether a position is shown, either from the start or by the player
    pub fn is_revealed(&self, position: usize) -> bool {
        self.puzzle.initial_revealed.contains(&position) || self.user_revealed.contains(&position)
    }

    /// The letter at a position, if it is revealed
    pub fn revealed_letter(&self, position: usize) -> Option<char> {
        if self.is_revealed(position) {
            self.puzzle.layout.letter_at(position)
        } else {
            None
        }
    }

    /// Positions not yet revealed, ascending
    pub fn hidden_positions(&self) -> Vec<usize> {
        (0..self.total_letters()).filter(|p| !self.is_revealed(*p)).collect()
    }

    /// Fraction of positions revealed
    pub fn progress(&self) -> f64 {
        let total = self.total_letters();
        if total == 0 {
            1.0
        } else {
            (total - self.hidden_positions().len()) as f64 / total as f64
        }
    }

    pub fn sentence(&self) -> &Sentence {
        &self.puzzle.sentence
    }

    pub fn layout(&self) -> &SentenceLayout {
        &self.puzzle.layout
    }

    pub fn mapping(&self) -> &CipherMapping {
        &self.puzzle.mapping
    }

    /// The sentence in cipher form
    pub fn cipher(&self) -> &str {
        &self.puzzle.cipher
    }

    pub fn initial_revealed(&self) -> &BTreeSet<usize> {
        &self.puzzle.initial_revealed
    }

    pub fn user_revealed(&self) -> &BTreeSet<usize> {
        &self.user_revealed
    }

    pub fn total_letters(&self) -> usize {
        self.puzzle.layout.total_letters()
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn max_mistakes(&self) -> u32 {
        MAX_MISTAKES
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn max_hints(&self) -> u32 {
        self.max_hints
    }

    pub fn hints_remaining(&self) -> u32 {
        self.max_hints.saturating_sub(self.hints_used)
    }

    /// Time limit in seconds, 0 when untimed
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn is_timed(&self) -> bool {
        self.time_limit > 0
    }

    pub fn difficulty(&self) -> Tier {
        self.difficulty
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn is_won(&self) -> bool {
        self.is_won
    }
}
