//! Initial reveal planning
//!
//! Decides which letter positions are shown before the player's first
//! guess. Each word gets a count (capped by its length bucket) and then a
//! choice of positions:
//! - easy: deterministic, word edges first, then common letters
//! - medium/hard: short words get a letter only with `reveal_probability`,
//!   positions are picked uniformly at random
//!
//! Words are keyed by occurrence, so a repeated word ("çok çok") is planned
//! twice, independently.

use super::text::{SentenceLayout, WordSpan};
use super::Tier;
use crate::config::DifficultyConfig;
use rand::prelude::*;
use std::collections::BTreeSet;

/// Letters that are prioritized when revealing on easy.
const COMMON_LETTERS: [char; 14] = [
    'E', 'A', 'İ', 'N', 'R', 'L', 'T', 'O', 'U', 'K', 'M', 'Y', 'S', 'D',
];

/// Words up to this length are "short" and revealed probabilistically.
pub const SHORT_WORD_MAX_LEN: usize = 4;

/// Plan the pre-revealed positions for a sentence.
pub fn plan_initial_reveals<R: Rng + ?Sized>(
    layout: &SentenceLayout,
    tier: Tier,
    config: &DifficultyConfig,
    rng: &mut R,
) -> BTreeSet<usize> {
    let mut revealed = BTreeSet::new();

    for word in layout.words() {
        let count = letters_for_word(word.len, tier, config, rng);
        if count == 0 {
            continue;
        }
        let local = choose_positions(layout.word_letters(word), count, tier, rng);
        revealed.extend(to_global(word, &local));
    }

    revealed
}

/// How many letters of a word to reveal.
fn letters_for_word<R: Rng + ?Sized>(
    len: usize,
    tier: Tier,
    config: &DifficultyConfig,
    rng: &mut R,
) -> usize {
    let max = config.letter_reveal_limits.for_word_len(len).min(len);

    match tier {
        Tier::Easy => max,
        Tier::Medium | Tier::Hard => {
            if len > SHORT_WORD_MAX_LEN {
                max
            } else if rng.random_bool(config.reveal_probability) {
                max.min(1)
            } else {
                0
            }
        }
    }
}

/// Pick `count` positions within a word (indices relative to the word).
fn choose_positions<R: Rng + ?Sized>(
    letters: &[char],
    count: usize,
    tier: Tier,
    rng: &mut R,
) -> Vec<usize> {
    match tier {
        Tier::Easy => easy_priority(letters).into_iter().take(count).collect(),
        Tier::Medium | Tier::Hard => {
            let mut positions: Vec<usize> = (0..letters.len()).collect();
            positions.shuffle(rng);
            positions.truncate(count);
            positions
        }
    }
}

/// Word edges, then common letters, then everything else; no duplicates.
fn easy_priority(letters: &[char]) -> Vec<usize> {
    let len = letters.len();
    if len == 0 {
        return Vec::new();
    }

    let edges = [0, len - 1];
    let common = (0..len).filter(|i| COMMON_LETTERS.contains(&letters[*i]));

    let mut order = Vec::with_capacity(len);
    for i in edges.into_iter().chain(common).chain(0..len) {
        if !order.contains(&i) {
            order.push(i);
        }
    }
    order
}

fn to_global(word: &WordSpan, local: &[usize]) -> Vec<usize> {
    local.iter().map(|i| word.start + i).collect()
}
