//! Letter -> number substitution cipher

use super::text::{alphabet_index, fold_to_ascii, is_letter, to_display_upper, ALPHABET};
use rand::prelude::*;

/// A bijection from the 29-letter alphabet onto 1..=29.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherMapping {
    /// `numbers[i]` is the number assigned to `ALPHABET[i]`
    numbers: [u8; 29],
}

impl CipherMapping {
    /// Generate a fresh random mapping.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut rand::rng())
    }

    /// Generate a mapping using a specific RNG (for testing/seeding).
    pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut numbers: [u8; 29] = std::array::from_fn(|i| i as u8 + 1);
        numbers.shuffle(rng);
        Self { numbers }
    }

    /// Build a mapping from explicit numbers in alphabet order.
    /// Returns None unless the numbers are a permutation of 1..=29.
    pub fn from_numbers(numbers: [u8; 29]) -> Option<Self> {
        let mut seen = [false; 29];
        for n in numbers {
            let slot = (n as usize).checked_sub(1).filter(|i| *i < 29)?;
            if seen[slot] {
                return None;
            }
            seen[slot] = true;
        }
        Some(Self { numbers })
    }

    /// Number assigned to a letter.
    ///
    /// The letter is uppercased with Turkish rules and looked up directly;
    /// on a miss the ASCII-folded form is tried.
    pub fn number_for(&self, c: char) -> Option<u8> {
        let upper = to_display_upper(c);
        alphabet_index(upper)
            .or_else(|| alphabet_index(fold_to_ascii(upper)))
            .map(|i| self.numbers[i])
    }

    /// Letter assigned to a number.
    pub fn letter_for(&self, number: u8) -> Option<char> {
        self.numbers
            .iter()
            .position(|n| *n == number)
            .map(|i| ALPHABET[i])
    }

    /// (letter, number) pairs in alphabet order
    pub fn pairs(&self) -> impl Iterator<Item = (char, u8)> + '_ {
        ALPHABET.iter().copied().zip(self.numbers.iter().copied())
    }
}

/// Between the numbers of one word
const LETTER_SEPARATOR: char = ' ';

/// In place of whitespace between words
const WORD_SEPARATOR: &str = " / ";

/// One rendered unit of a ciphered sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherToken {
    /// A letter, replaced by its number
    Letter(u8),
    /// Space, punctuation or an unmapped character, kept as is
    Other(char),
}

/// Encode a sentence character by character.
pub fn cipher_tokens(text: &str, mapping: &CipherMapping) -> Vec<CipherToken> {
    text.chars()
        .map(|c| {
            if !is_letter(c) {
                return CipherToken::Other(c);
            }
            match mapping.number_for(c) {
                Some(n) => CipherToken::Letter(n),
                None => CipherToken::Other(c),
            }
        })
        .collect()
}

/// Render a sentence in cipher form.
///
/// Numbers inside a word are separated by a space and every run of
/// whitespace becomes `" / "`. Punctuation, hyphens included, is copied:
/// `"Kedi uyur."` becomes something like `"14 6 5 12 / 25 28 25 21."`.
pub fn render_cipher(text: &str, mapping: &CipherMapping) -> String {
    let mut out = String::new();
    let mut previous_was_letter = false;
    let mut pending_gap = false;

    for token in cipher_tokens(text, mapping) {
        if let CipherToken::Other(c) = token {
            if c.is_whitespace() {
                pending_gap = !out.is_empty();
                previous_was_letter = false;
                continue;
            }
        }
        if pending_gap {
            out.push_str(WORD_SEPARATOR);
            pending_gap = false;
        }

        match token {
            CipherToken::Letter(n) => {
                if previous_was_letter {
                    out.push(LETTER_SEPARATOR);
                }
                out.push_str(&n.to_string());
                previous_was_letter = true;
            }
            CipherToken::Other(c) => {
                out.push(c);
                previous_was_letter = false;
            }
        }
    }

    out
}
