//! Turkish text handling
//!
//! Two normalizations:
//! - display: locale-correct uppercasing, `i`→`İ` and `ı`→`I` stay distinct
//! - identity: display form folded to ASCII look-alikes (`İ`→`I`, `Ş`→`S`, ...)
//!
//! Guesses are matched on the display form. The identity form is only a
//! fallback for cipher lookups.
//!
//! `SentenceLayout` splits a sentence into words and assigns every letter a
//! global position in the punctuation-free letter sequence.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ops::Range;

/// The 29-letter Turkish alphabet in dictionary order.
pub const ALPHABET: [char; 29] = [
    'A', 'B', 'C', 'Ç', 'D', 'E', 'F', 'G', 'Ğ', 'H', 'I', 'İ', 'J', 'K', 'L', 'M', 'N', 'O',
    'Ö', 'P', 'R', 'S', 'Ş', 'T', 'U', 'Ü', 'V', 'Y', 'Z',
];

/// Letter -> index into `ALPHABET`
static ALPHABET_INDEX: Lazy<HashMap<char, usize>> =
    Lazy::new(|| ALPHABET.iter().enumerate().map(|(i, c)| (*c, i)).collect());

/// Index of an (already uppercased) letter in the alphabet.
pub fn alphabet_index(c: char) -> Option<usize> {
    ALPHABET_INDEX.get(&c).copied()
}

/// Whether a character occupies a letter position.
/// Spaces, digits and punctuation never do.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic()
}

/// Whether a letter has a place in the cipher alphabet, directly or
/// through its folded form. `W`, `Q`, `X` and foreign accents do not.
pub fn in_alphabet(c: char) -> bool {
    let upper = to_display_upper(c);
    alphabet_index(upper)
        .or_else(|| alphabet_index(fold_to_ascii(upper)))
        .is_some()
}

/// Uppercase a single character using Turkish rules.
///
/// Characters whose uppercase form is more than one character are
/// returned unchanged so positions stay one-to-one.
pub fn to_display_upper(c: char) -> char {
    match c {
        'i' => 'İ',
        'ı' => 'I',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

/// Fold an uppercase Turkish letter to its ASCII look-alike.
pub fn fold_to_ascii(c: char) -> char {
    match c {
        'İ' => 'I',
        'Ğ' => 'G',
        'Ü' => 'U',
        'Ş' => 'S',
        'Ö' => 'O',
        'Ç' => 'C',
        _ => c,
    }
}

/// Identity form of a single character.
pub fn to_identity(c: char) -> char {
    fold_to_ascii(to_display_upper(c))
}

/// Turkish-correct uppercasing for display.
pub fn normalize_for_display(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            'i' => vec!['İ'],
            'ı' => vec!['I'],
            _ => c.to_uppercase().collect(),
        })
        .collect()
}

/// Uppercased and ASCII-folded form used for letter identity lookups.
pub fn normalize_for_identity(text: &str) -> String {
    normalize_for_display(text)
        .chars()
        .map(fold_to_ascii)
        .collect()
}

/// Whether two letters are the same letter for guessing purposes.
pub fn letters_match(a: char, b: char) -> bool {
    to_display_upper(a) == to_display_upper(b)
}

/// A word of a sentence and the span of global positions its letters occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    /// Index of the word among the sentence's non-empty words
    pub index: usize,
    /// First global letter position of the word
    pub start: usize,
    /// Number of letters in the word (punctuation stripped)
    pub len: usize,
}

impl WordSpan {
    /// Global positions covered by this word
    pub fn positions(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Whether a global position belongs to this word
    pub fn contains(&self, position: usize) -> bool {
        self.positions().contains(&position)
    }
}

/// Words and letters of a sentence in the global position space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceLayout {
    letters: Vec<char>,
    words: Vec<WordSpan>,
}

impl SentenceLayout {
    /// Split on whitespace, strip punctuation from each word and index the
    /// remaining letters in sentence order. Words with no letters are dropped.
    pub fn new(text: &str) -> Self {
        let mut letters = Vec::new();
        let mut words = Vec::new();

        for token in text.split_whitespace() {
            let start = letters.len();
            letters.extend(token.chars().filter(|c| is_letter(*c)).map(to_display_upper));
            let len = letters.len() - start;
            if len > 0 {
                words.push(WordSpan {
                    index: words.len(),
                    start,
                    len,
                });
            }
        }

        Self { letters, words }
    }

    /// Display-uppercased letters in position order
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Non-empty words in sentence order
    pub fn words(&self) -> &[WordSpan] {
        &self.words
    }

    /// Number of letter positions
    pub fn total_letters(&self) -> usize {
        self.letters.len()
    }

    /// Letter at a global position
    pub fn letter_at(&self, position: usize) -> Option<char> {
        self.letters.get(position).copied()
    }

    /// Letters of one word
    pub fn word_letters(&self, word: &WordSpan) -> &[char] {
        &self.letters[word.positions()]
    }

    /// The word containing a global position
    pub fn word_of(&self, position: usize) -> Option<&WordSpan> {
        self.words.iter().find(|w| w.contains(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_has_29_distinct_letters() {
        let unique: std::collections::HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 29);
        assert_eq!(alphabet_index('A'), Some(0));
        assert_eq!(alphabet_index('Z'), Some(28));
        assert_eq!(alphabet_index('Q'), None);
    }

    #[test]
    fn test_display_keeps_dotted_and_dotless_i_apart() {
        assert_eq!(normalize_for_display("istanbul"), "İSTANBUL");
        assert_eq!(normalize_for_display("ılık"), "ILIK");
        assert_eq!(normalize_for_display("çiğdem"), "ÇİĞDEM");
        assert_eq!(to_display_upper('i'), 'İ');
        assert_eq!(to_display_upper('ı'), 'I');
    }

    #[test]
    fn test_identity_folds_turkish_letters() {
        assert_eq!(normalize_for_identity("Işık"), "ISIK");
        assert_eq!(normalize_for_identity("İğne"), "IGNE");
        assert_eq!(normalize_for_identity("güneş çok"), "GUNES COK");
        assert_eq!(normalize_for_identity("Ömür"), "OMUR");
    }

    #[test]
    fn test_in_alphabet() {
        for c in ['a', 'ç', 'ğ', 'ı', 'i', 'İ', 'ş', 'Ü', 'z'] {
            assert!(in_alphabet(c), "{}", c);
        }
        for c in ['w', 'Q', 'x', 'é', 'ß'] {
            assert!(!in_alphabet(c), "{}", c);
        }
    }

    #[test]
    fn test_letters_match_is_exact() {
        assert!(letters_match('i', 'İ'));
        assert!(letters_match('ı', 'I'));
        assert!(!letters_match('i', 'I'));
        assert!(!letters_match('ş', 'S'));
    }

    #[test]
    fn test_layout_skips_spaces_and_punctuation() {
        let layout = SentenceLayout::new("Ali'nin kedisi, uyuyor!");
        assert_eq!(layout.total_letters(), 18);
        assert_eq!(layout.words().len(), 3);
        assert_eq!(layout.words()[0].positions(), 0..6);
        assert_eq!(layout.words()[1].positions(), 6..12);
        assert_eq!(layout.words()[2].positions(), 12..18);
        assert_eq!(layout.letter_at(0), Some('A'));
        assert_eq!(layout.letter_at(5), Some('N'));
        assert_eq!(layout.letter_at(18), None);
    }

    #[test]
    fn test_layout_drops_punctuation_only_tokens() {
        let layout = SentenceLayout::new("Evet - hayır");
        assert_eq!(layout.words().len(), 2);
        assert_eq!(layout.words()[1].start, 4);
        assert_eq!(layout.words()[1].index, 1);
    }

    #[test]
    fn test_repeated_words_get_separate_spans() {
        let layout = SentenceLayout::new("çok çok güzel");
        let words = layout.words();
        assert_eq!(words[0].positions(), 0..3);
        assert_eq!(words[1].positions(), 3..6);
        assert_eq!(
            layout.word_letters(&words[0]),
            layout.word_letters(&words[1])
        );
        assert_eq!(layout.word_of(4).map(|w| w.index), Some(1));
    }
}
