//! Round and session bootstrap
//!
//! `Engine` owns the corpus, the difficulty table and the random source and
//! wires them into rounds. Guesses are made directly on `GameState`; hints
//! go through the engine because they need randomness.

use crate::config::GameConfig;
use crate::corpus::{Corpus, Sentence};
use crate::error::{SifreError, SifreResult};
use crate::game::hint::{plan_hint, HintError, HintPlan};
use crate::game::state::GameState;
use crate::game::Tier;
use crate::progress::{GameResult, ProgressiveGameState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Engine<R: Rng = StdRng> {
    corpus: Corpus,
    config: GameConfig,
    rng: R,
}

impl Engine<StdRng> {
    /// Engine over the embedded corpus and difficulty table
    pub fn with_defaults() -> SifreResult<Self> {
        Self::from_entropy(Corpus::embedded()?, GameConfig::embedded()?)
    }

    /// Engine seeded from the operating system
    pub fn from_entropy(corpus: Corpus, config: GameConfig) -> SifreResult<Self> {
        Self::new(corpus, config, StdRng::from_os_rng())
    }

    /// Engine with a fixed seed (for reproducible sessions)
    pub fn seeded(corpus: Corpus, config: GameConfig, seed: u64) -> SifreResult<Self> {
        Self::new(corpus, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Validate the data and build an engine
    pub fn new(corpus: Corpus, config: GameConfig, rng: R) -> SifreResult<Self> {
        corpus.validate()?;
        config.validate()?;
        tracing::info!(sentences = corpus.len(), "engine ready");
        Ok(Self { corpus, config, rng })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a round with a random sentence of `tier`
    pub fn start_round(&mut self, tier: Tier) -> SifreResult<GameState> {
        let sentence = self
            .corpus
            .pick_sentence(tier, &mut self.rng)
            .cloned()
            .ok_or(SifreError::EmptyTier(tier))?;
        Ok(self.start_round_with(sentence, tier))
    }

    /// Start a round on a given sentence, played at `tier`
    pub fn start_round_with(&mut self, sentence: Sentence, tier: Tier) -> GameState {
        let state = GameState::start(sentence, tier, self.config.for_tier(tier), &mut self.rng);
        tracing::info!(
            sentence_id = state.sentence().id,
            %tier,
            letters = state.total_letters(),
            pre_revealed = state.initial_revealed().len(),
            "round started"
        );
        state
    }

    /// Start a round on player-supplied text
    pub fn start_custom_round(&mut self, text: &str, tier: Tier) -> SifreResult<GameState> {
        let sentence = Sentence::custom(text, tier);
        if sentence.letter_count() == 0 {
            return Err(SifreError::InvalidSentence(format!("'{}' has no letters", text)));
        }
        if let Some(c) = sentence.foreign_letter() {
            return Err(SifreError::InvalidSentence(format!(
                "'{}' is not in the Turkish alphabet",
                c
            )));
        }
        Ok(self.start_round_with(sentence, tier))
    }

    /// Start a round on a corpus sentence, at the sentence's own tier.
    /// None if the id is unknown.
    pub fn start_round_by_id(&mut self, id: u32) -> Option<GameState> {
        let sentence = self.corpus.get(id)?.clone();
        let tier = sentence.difficulty;
        Some(self.start_round_with(sentence, tier))
    }

    /// Plan a hint; commit it with `GameState::apply_hint`
    pub fn use_hint(
        &mut self,
        state: &GameState,
        progress: Option<&ProgressiveGameState>,
    ) -> Result<HintPlan, HintError> {
        plan_hint(state, progress, &mut self.rng)
    }

    /// A fresh session
    pub fn start_session(&self) -> ProgressiveGameState {
        ProgressiveGameState::new()
    }

    /// Record a finished round; the returned session holds the next tier
    pub fn record_result(
        &mut self,
        progress: &ProgressiveGameState,
        result: GameResult,
    ) -> ProgressiveGameState {
        progress.record_result(result, &mut self.rng)
    }

    /// A sentence for the session's next round
    pub fn next_sentence_for(&mut self, progress: &ProgressiveGameState) -> SifreResult<Sentence> {
        let tier = progress.current_difficulty();
        self.corpus
            .pick_sentence(tier, &mut self.rng)
            .cloned()
            .ok_or(SifreError::EmptyTier(tier))
    }

    /// Start the session's next round
    pub fn start_next_round(&mut self, progress: &ProgressiveGameState) -> SifreResult<GameState> {
        let sentence = self.next_sentence_for(progress)?;
        Ok(self.start_round_with(sentence, progress.current_difficulty()))
    }
}
