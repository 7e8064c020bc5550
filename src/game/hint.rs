//! Hint selection
//!
//! A hint picks a random word that still has hidden letters, then a random
//! hidden position in it (the anchor). A strong hint reveals every hidden
//! occurrence of the anchor's letter; a weak hint reveals only the anchor.
//!
//! Planning does not touch the state. The caller commits the plan with
//! `GameState::apply_hint`.

use super::state::GameState;
use super::Tier;
use crate::progress::ProgressiveGameState;
use rand::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

/// Medium hints are strong up to this sentence number
const EARLY_SESSION_SENTENCES: u32 = 10;

/// Number of recent results used to judge whether the player is struggling
const STRUGGLE_WINDOW: usize = 3;

/// Win rate below which the player counts as struggling
const STRUGGLE_WIN_RATE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintStrength {
    /// Reveal every hidden occurrence of the letter
    Strong,
    /// Reveal a single position
    Weak,
}

/// Why a hint could not be given
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintError {
    #[error("Oyun bitti")]
    RoundOver,
    #[error("İpucu hakkınız kalmadı")]
    HintsExhausted,
    #[error("Açılacak harf kalmadı")]
    NothingToReveal,
    #[error("İpucu artık geçerli değil")]
    StalePlan,
}

/// A hint ready to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintPlan {
    /// The randomly chosen hidden position
    pub anchor: usize,
    /// The letter at the anchor
    pub letter: char,
    pub strength: HintStrength,
    /// Positions to reveal, always including the anchor
    pub positions: BTreeSet<usize>,
    /// Whether revealing `positions` finishes the puzzle
    pub completes_puzzle: bool,
}

/// Choose hint strength from the tier and, on medium, how the session is going.
pub fn decide_hint_strength(tier: Tier, progress: Option<&ProgressiveGameState>) -> HintStrength {
    match tier {
        Tier::Easy => HintStrength::Strong,
        Tier::Hard => HintStrength::Weak,
        Tier::Medium => {
            let Some(progress) = progress else {
                return HintStrength::Weak;
            };

            let recent = progress.recent_results(STRUGGLE_WINDOW);
            let struggling = !recent.is_empty() && {
                let wins = recent.iter().filter(|r| r.is_won).count();
                (wins as f64 / recent.len() as f64) < STRUGGLE_WIN_RATE
            };
            let early = progress.current_sentence_number() <= EARLY_SESSION_SENTENCES;

            if struggling || early {
                HintStrength::Strong
            } else {
                HintStrength::Weak
            }
        }
    }
}

/// Hidden positions grouped by word; words with nothing hidden are skipped.
fn hidden_by_word(state: &GameState) -> Vec<Vec<usize>> {
    state
        .layout()
        .words()
        .iter()
        .map(|word| word.positions().filter(|p| !state.is_revealed(*p)).collect::<Vec<_>>())
        .filter(|hidden| !hidden.is_empty())
        .collect()
}

/// Plan a hint for the current round.
pub fn plan_hint<R: Rng + ?Sized>(
    state: &GameState,
    progress: Option<&ProgressiveGameState>,
    rng: &mut R,
) -> Result<HintPlan, HintError> {
    if state.is_game_over() {
        return Err(HintError::RoundOver);
    }
    if state.hints_used() >= state.max_hints() {
        return Err(HintError::HintsExhausted);
    }

    let words = hidden_by_word(state);
    let word = words.choose(rng).ok_or(HintError::NothingToReveal)?;
    let anchor = *word.choose(rng).ok_or(HintError::NothingToReveal)?;
    let letter = state
        .layout()
        .letter_at(anchor)
        .ok_or(HintError::NothingToReveal)?;

    let strength = decide_hint_strength(state.difficulty(), progress);
    let positions: BTreeSet<usize> = match strength {
        HintStrength::Strong => state
            .hidden_positions()
            .into_iter()
            .filter(|p| state.layout().letter_at(*p) == Some(letter))
            .collect(),
        HintStrength::Weak => BTreeSet::from([anchor]),
    };
    let completes_puzzle = state.is_complete_with(&positions);

    tracing::debug!(
        anchor,
        %letter,
        ?strength,
        revealed = positions.len(),
        "hint planned"
    );

    Ok(HintPlan {
        anchor,
        letter,
        strength,
        positions,
        completes_puzzle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::corpus::Sentence;
    use crate::game::cipher::CipherMapping;
    use crate::progress::GameResult;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn state(text: &str, tier: Tier, revealed: &[usize]) -> GameState {
        let config = GameConfig::embedded().unwrap();
        GameState::with_reveals(
            Sentence::custom(text, tier),
            tier,
            config.for_tier(tier),
            CipherMapping::generate_with_rng(&mut StdRng::seed_from_u64(0)),
            revealed.iter().copied().collect(),
        )
    }

    fn result(sentence_number: u32, is_won: bool) -> GameResult {
        GameResult {
            sentence_number,
            difficulty: Tier::Medium,
            is_won,
            mistakes: if is_won { 0 } else { 3 },
            hints_used: 0,
            time_spent_seconds: 30,
        }
    }

    /// Session that has recorded the given wins/losses in order
    fn session(outcomes: &[bool]) -> ProgressiveGameState {
        let mut rng = StdRng::seed_from_u64(0);
        outcomes
            .iter()
            .enumerate()
            .fold(ProgressiveGameState::new(), |progress, (i, won)| {
                progress.record_result(result(i as u32 + 1, *won), &mut rng)
            })
    }

    #[test]
    fn test_easy_is_always_strong_and_hard_always_weak() {
        let struggling = session(&[false, false, false]);
        assert_eq!(decide_hint_strength(Tier::Easy, None), HintStrength::Strong);
        assert_eq!(
            decide_hint_strength(Tier::Easy, Some(&session(&[true; 20]))),
            HintStrength::Strong
        );
        assert_eq!(decide_hint_strength(Tier::Hard, None), HintStrength::Weak);
        assert_eq!(
            decide_hint_strength(Tier::Hard, Some(&struggling)),
            HintStrength::Weak
        );
    }

    #[rstest]
    // Early in the session: strong regardless of results
    #[case(0, &[true, true, true], HintStrength::Strong)]
    // Late, winning: weak
    #[case(9, &[true, true, true], HintStrength::Weak)]
    // Late, 1 of last 3 won: strong
    #[case(10, &[false, false, true], HintStrength::Strong)]
    // Late, 2 of last 3 won: weak
    #[case(10, &[true, false, true], HintStrength::Weak)]
    fn test_medium_strength_follows_session(
        #[case] earlier_wins: usize,
        #[case] last_three: &[bool],
        #[case] expected: HintStrength,
    ) {
        let mut outcomes = vec![true; earlier_wins];
        outcomes.extend_from_slice(last_three);
        let progress = session(&outcomes);
        assert_eq!(
            decide_hint_strength(Tier::Medium, Some(&progress)),
            expected
        );
    }

    #[test]
    fn test_medium_without_session_is_weak() {
        assert_eq!(decide_hint_strength(Tier::Medium, None), HintStrength::Weak);
    }

    #[test]
    fn test_strong_hint_reveals_every_hidden_occurrence() {
        // "Ada ada" -> A D A A D A
        let state = state("Ada ada", Tier::Easy, &[]);
        let plan = plan_hint(&state, None, &mut StdRng::seed_from_u64(4)).unwrap();

        assert_eq!(plan.strength, HintStrength::Strong);
        assert!(plan.positions.contains(&plan.anchor));
        let expected: BTreeSet<usize> = match plan.letter {
            'A' => BTreeSet::from([0, 2, 3, 5]),
            'D' => BTreeSet::from([1, 4]),
            other => panic!("unexpected letter {}", other),
        };
        assert_eq!(plan.positions, expected);
        assert!(!plan.completes_puzzle);
    }

    #[test]
    fn test_strong_hint_skips_revealed_occurrences() {
        let state = state("Ada", Tier::Easy, &[0]);
        for seed in 0..20 {
            let plan = plan_hint(&state, None, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(!plan.positions.contains(&0));
        }
    }

    #[test]
    fn test_weak_hint_reveals_only_anchor() {
        let state = state("Ada ada", Tier::Hard, &[]);
        let plan = plan_hint(&state, None, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(plan.strength, HintStrength::Weak);
        assert_eq!(plan.positions, BTreeSet::from([plan.anchor]));
    }

    #[test]
    fn test_planning_does_not_mutate() {
        let state = state("Kedi uyuyor", Tier::Hard, &[]);
        let _ = plan_hint(&state, None, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(state.hints_used(), 0);
        assert!(state.user_revealed().is_empty());
    }

    #[test]
    fn test_last_hidden_letter_completes_puzzle() {
        let state = state("Kedi", Tier::Hard, &[0, 1, 3]);
        let plan = plan_hint(&state, None, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(plan.anchor, 2);
        assert!(plan.completes_puzzle);

        let next = state.apply_hint(&plan).unwrap();
        assert!(next.is_won());
        assert!(next.is_game_over());
        assert_eq!(next.hints_used(), 1);
    }

    #[test]
    fn test_hints_exhaust_after_max_commits() {
        let mut state = state("Çekoslovakyalılaştıramadıklarımızdan", Tier::Hard, &[]);
        let mut rng = StdRng::seed_from_u64(9);
        let max = state.max_hints();

        for _ in 0..max {
            let plan = plan_hint(&state, None, &mut rng).unwrap();
            state = state.apply_hint(&plan).unwrap();
        }
        assert_eq!(state.hints_used(), max);

        let before = state.user_revealed().clone();
        assert_eq!(
            plan_hint(&state, None, &mut rng),
            Err(HintError::HintsExhausted)
        );
        assert_eq!(state.user_revealed(), &before);
    }

    #[test]
    fn test_no_hint_after_round_over() {
        let state = state("Kedi", Tier::Hard, &[]);
        let (_, state) = state.submit_guess('Z', 0);
        let (_, state) = state.submit_guess('Z', 0);
        let (_, state) = state.submit_guess('Z', 0);
        assert!(state.is_game_over());
        assert_eq!(
            plan_hint(&state, None, &mut StdRng::seed_from_u64(0)),
            Err(HintError::RoundOver)
        );
    }

    #[test]
    fn test_hidden_by_word_excludes_finished_words() {
        let state = state("bu su", Tier::Hard, &[0, 1]);
        assert_eq!(hidden_by_word(&state), vec![vec![2, 3]]);
    }
}
