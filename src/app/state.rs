//! Application state: the round being played and the session around it
//!
//! The app is the only place that watches the clock. `tick` is called about
//! once a second and ends a timed round when its time is up.

use sifre::game::text::is_letter;
use sifre::{
    Engine, GameResult, GameState, GuessOutcome, ProgressiveGameState, SifreResult, Tier,
};
use std::time::Instant;

/// How the tier of each round is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tier follows the session's progression
    Progressive,
    /// Every round is played at one tier
    Fixed(Tier),
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Feedback message from the last action
    pub feedback: String,
    engine: Engine,
    mode: Mode,
    progress: ProgressiveGameState,
    round: GameState,
    /// Selected letter position
    cursor: usize,
    /// Whether the current round's result is already in the session history
    recorded: bool,
}

impl App {
    /// Create the app and start its first round
    pub fn new(mut engine: Engine, mode: Mode) -> SifreResult<Self> {
        let progress = engine.start_session();
        let round = match mode {
            Mode::Progressive => engine.start_next_round(&progress)?,
            Mode::Fixed(tier) => engine.start_round(tier)?,
        };
        Ok(Self::with_round(engine, mode, progress, round))
    }

    /// Create the app around a custom sentence as the first round
    pub fn with_custom_sentence(mut engine: Engine, mode: Mode, text: &str) -> SifreResult<Self> {
        let progress = engine.start_session();
        let tier = match mode {
            Mode::Progressive => progress.current_difficulty(),
            Mode::Fixed(tier) => tier,
        };
        let round = engine.start_custom_round(text, tier)?;
        Ok(Self::with_round(engine, mode, progress, round))
    }

    /// Create the app with a corpus sentence as the first round.
    /// None if the id is unknown.
    pub fn with_sentence_id(mut engine: Engine, mode: Mode, id: u32) -> Option<Self> {
        let progress = engine.start_session();
        let round = engine.start_round_by_id(id)?;
        Some(Self::with_round(engine, mode, progress, round))
    }

    fn with_round(
        engine: Engine,
        mode: Mode,
        progress: ProgressiveGameState,
        round: GameState,
    ) -> Self {
        let mut app = Self {
            should_quit: false,
            feedback: String::new(),
            engine,
            mode,
            progress,
            round,
            cursor: 0,
            recorded: false,
        };
        app.reset_cursor();
        app.finish_if_over();
        app
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Guess the letter at the cursor (ignored when the round is over)
    pub fn on_char(&mut self, c: char) {
        if self.round.is_game_over() || !is_letter(c) {
            return;
        }

        let (outcome, next) = self.round.submit_guess(c, self.cursor);
        self.round = next;
        self.feedback = outcome.message().to_string();

        if outcome == GuessOutcome::Correct {
            self.advance_cursor();
        }
        self.finish_if_over();
    }

    /// Ask for a hint. The session's sentence count and recent results
    /// shape medium hints in both modes.
    pub fn on_hint(&mut self) {
        let committed = self
            .engine
            .use_hint(&self.round, Some(&self.progress))
            .and_then(|plan| Ok((self.round.apply_hint(&plan)?, plan)));

        match committed {
            Ok((round, plan)) => {
                self.round = round;
                self.feedback = format!("İpucu: {} ({} harf)", plan.letter, plan.positions.len());
                if self.round.is_revealed(self.cursor) {
                    self.advance_cursor();
                }
            }
            Err(e) => self.feedback = e.to_string(),
        }
        self.finish_if_over();
    }

    /// Move the cursor to the previous hidden position
    pub fn on_left(&mut self) {
        let hidden = self.round.hidden_positions();
        if let Some(p) = hidden.iter().rev().find(|p| **p < self.cursor).or(hidden.last()) {
            self.cursor = *p;
        }
    }

    /// Move the cursor to the next hidden position
    pub fn on_right(&mut self) {
        self.advance_cursor();
    }

    /// Start the next round once the current one is over
    pub fn on_enter(&mut self) {
        if !self.round.is_game_over() {
            return;
        }
        let next = match self.mode {
            Mode::Progressive => self.engine.start_next_round(&self.progress),
            Mode::Fixed(tier) => self.engine.start_round(tier),
        };
        match next {
            Ok(round) => {
                self.round = round;
                self.recorded = false;
                self.feedback.clear();
                self.reset_cursor();
                self.finish_if_over();
            }
            Err(e) => {
                tracing::error!(error = %e, "could not start next round");
                self.feedback = e.to_string();
            }
        }
    }

    /// Poll the clock and end the round when a timed round runs out
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.round.is_game_over() || !self.round.is_timed() {
            return;
        }
        if self.round.remaining_time_at(now) == 0 {
            self.round = self.round.expire();
            self.feedback = "Süre doldu!".to_string();
            self.finish_if_over();
        }
    }

    /// Record the result once the round is over
    fn finish_if_over(&mut self) {
        if !self.round.is_game_over() || self.recorded {
            return;
        }
        let result = self.round.result(self.progress.current_sentence_number());
        self.progress = self.engine.record_result(&self.progress, result);
        self.recorded = true;
    }

    fn reset_cursor(&mut self) {
        self.cursor = self.round.hidden_positions().first().copied().unwrap_or(0);
    }

    fn advance_cursor(&mut self) {
        let hidden = self.round.hidden_positions();
        if let Some(p) = hidden.iter().find(|p| **p > self.cursor).or(hidden.first()) {
            self.cursor = *p;
        }
    }

    pub fn round(&self) -> &GameState {
        &self.round
    }

    pub fn progress(&self) -> &ProgressiveGameState {
        &self.progress
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display name of the current sentence's category
    pub fn category_name(&self) -> Option<&str> {
        self.engine
            .corpus()
            .category(&self.round.sentence().category)
            .map(|c| c.name.as_str())
    }

    /// Result of the most recently finished round
    pub fn last_result(&self) -> Option<&GameResult> {
        self.progress.performance_history().last()
    }

    /// Remaining seconds, None for untimed rounds
    pub fn time_remaining(&self) -> Option<u32> {
        self.round.is_timed().then(|| self.round.remaining_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sifre::{Corpus, GameConfig, MAX_MISTAKES};
    use std::time::Duration;

    fn engine() -> Engine {
        Engine::seeded(
            Corpus::embedded().unwrap(),
            GameConfig::embedded().unwrap(),
            12,
        )
        .unwrap()
    }

    fn custom_app(text: &str, tier: Tier) -> App {
        App::with_custom_sentence(engine(), Mode::Fixed(tier), text).unwrap()
    }

    /// Letter at the cursor, read from the answer
    fn answer_at_cursor(app: &App) -> char {
        app.round().layout().letter_at(app.cursor()).unwrap()
    }

    #[test]
    fn test_progressive_session_starts_easy() {
        let app = App::new(engine(), Mode::Progressive).unwrap();
        assert_eq!(app.round().difficulty(), Tier::Easy);
        assert_eq!(app.progress().current_sentence_number(), 1);
    }

    #[test]
    fn test_cursor_starts_on_hidden_position() {
        let app = custom_app("Kedi uyuyor", Tier::Easy);
        // Easy reveals 0, 4 and 9
        assert_eq!(app.cursor(), 1);
        assert!(!app.round().is_revealed(app.cursor()));
    }

    #[test]
    fn test_correct_guess_moves_cursor() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        let letter = answer_at_cursor(&app);
        app.on_char(letter);
        assert_eq!(app.feedback, "Doğru!");
        assert_eq!(app.cursor(), 2);
    }

    #[test]
    fn test_arrow_keys_skip_revealed_positions() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        app.on_right();
        assert_eq!(app.cursor(), 2);
        app.on_right();
        assert_eq!(app.cursor(), 3);
        app.on_right();
        // 4 is revealed
        assert_eq!(app.cursor(), 5);
        app.on_left();
        app.on_left();
        assert_eq!(app.cursor(), 2);
    }

    #[test]
    fn test_solving_records_a_win() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        while !app.round().is_game_over() {
            let letter = answer_at_cursor(&app);
            app.on_char(letter);
        }
        assert!(app.round().is_won());
        assert_eq!(app.progress().current_sentence_number(), 2);
        assert!(app.last_result().unwrap().is_won);
    }

    #[test]
    fn test_losing_records_once() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        for _ in 0..MAX_MISTAKES {
            app.on_char('Ğ');
        }
        assert!(app.round().is_game_over());
        assert!(!app.round().is_won());

        // Further input is ignored and nothing is recorded twice
        app.on_char('Ğ');
        app.on_hint();
        assert_eq!(app.progress().performance_history().len(), 1);
        assert_eq!(app.last_result().unwrap().mistakes, MAX_MISTAKES);
    }

    #[test]
    fn test_non_letters_are_ignored() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        app.on_char('7');
        app.on_char(' ');
        assert_eq!(app.round().mistakes(), 0);
    }

    #[test]
    fn test_hints_run_out() {
        let mut app = custom_app("Çekoslovakyalılaştıramadıklarımızdan", Tier::Hard);
        let max = app.round().max_hints();
        for _ in 0..max {
            app.on_hint();
        }
        assert_eq!(app.round().hints_used(), max);
        app.on_hint();
        assert_eq!(app.feedback, "İpucu hakkınız kalmadı");
        assert_eq!(app.round().hints_used(), max);
    }

    #[test]
    fn test_fixed_medium_hints_are_strong_early_in_session() {
        // One repeated letter: a strong hint opens all of it, a weak one a single box
        let mut app = custom_app("Aaaaaaa", Tier::Medium);
        assert!(app.round().hidden_positions().len() > 1);

        app.on_hint();

        assert_eq!(app.round().hints_used(), 1);
        assert!(app.round().is_won());
        assert!(app.last_result().unwrap().is_won);
    }

    #[test]
    fn test_tick_expires_timed_round() {
        let mut app = custom_app("Kedi uyuyor", Tier::Medium);
        let limit = u64::from(app.round().time_limit());

        app.tick_at(Instant::now());
        assert!(!app.round().is_game_over());

        app.tick_at(Instant::now() + Duration::from_secs(limit + 1));
        assert!(app.round().is_game_over());
        assert!(!app.round().is_won());
        assert_eq!(app.feedback, "Süre doldu!");
        assert_eq!(app.progress().performance_history().len(), 1);
    }

    #[test]
    fn test_untimed_round_never_expires() {
        let mut app = custom_app("Kedi uyuyor", Tier::Easy);
        assert_eq!(app.time_remaining(), None);
        app.tick_at(Instant::now() + Duration::from_secs(10_000));
        assert!(!app.round().is_game_over());
    }

    #[test]
    fn test_enter_starts_next_round_only_when_over() {
        let mut app = custom_app("Kedi uyuyor", Tier::Medium);
        app.on_enter();
        assert_eq!(app.round().sentence().text, "Kedi uyuyor");

        for _ in 0..MAX_MISTAKES {
            app.on_char('Ğ');
        }
        app.on_enter();
        assert!(!app.round().is_game_over());
        assert_eq!(app.round().difficulty(), Tier::Medium);
        assert_ne!(app.round().sentence().id, 0);
    }

    #[test]
    fn test_unknown_sentence_id() {
        assert!(App::with_sentence_id(engine(), Mode::Progressive, 4242).is_none());
        assert!(App::with_sentence_id(engine(), Mode::Progressive, 1).is_some());
    }
}
