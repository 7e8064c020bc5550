//! Sentence corpus and sentence selection
//!
//! The corpus is read-only data handed to the engine: a category table and
//! a list of sentences tagged with a tier. The default corpus is embedded
//! at build time; `Corpus::load` reads another one from disk.
//!
//! Selection prefers sentences without three identical letters in a row,
//! which render as three identical boxes and read badly.

use crate::error::{SifreError, SifreResult};
use crate::game::text::{in_alphabet, is_letter, to_display_upper, SentenceLayout};
use crate::game::Tier;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Embedded default corpus
static DEFAULT_CORPUS: &str = include_str!("../../data/corpus.toml");

/// Id given to sentences that do not come from the corpus
pub const CUSTOM_SENTENCE_ID: u32 = 0;

/// Category key of sentences that do not come from the corpus
pub const CUSTOM_CATEGORY: &str = "custom";

/// Runs of this many identical letters make a sentence "bad"
const MAX_LETTER_RUN: usize = 3;

/// A puzzle sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: u32,
    pub text: String,
    pub difficulty: Tier,
    pub category: String,
}

impl Sentence {
    /// A sentence typed in by the player rather than taken from the corpus
    pub fn custom(text: &str, difficulty: Tier) -> Self {
        Sentence {
            id: CUSTOM_SENTENCE_ID,
            text: text.trim().to_string(),
            difficulty,
            category: CUSTOM_CATEGORY.to_string(),
        }
    }

    /// Number of guessable letters
    pub fn letter_count(&self) -> usize {
        SentenceLayout::new(&self.text).total_letters()
    }

    /// First letter the cipher cannot encode, if any
    pub fn foreign_letter(&self) -> Option<char> {
        self.text.chars().find(|c| is_letter(*c) && !in_alphabet(*c))
    }
}

/// Display metadata for a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

/// The sentence corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    categories: BTreeMap<String, Category>,
    sentences: Vec<Sentence>,
}

impl Corpus {
    /// Build and validate a corpus from parts
    pub fn new(
        categories: BTreeMap<String, Category>,
        sentences: Vec<Sentence>,
    ) -> SifreResult<Self> {
        let corpus = Self {
            categories,
            sentences,
        };
        corpus.validate()?;
        Ok(corpus)
    }

    /// Parse and validate a TOML corpus
    pub fn from_toml_str(contents: &str) -> SifreResult<Self> {
        let corpus: Corpus = toml::from_str(contents)?;
        corpus.validate()?;
        Ok(corpus)
    }

    /// Read a corpus from a file
    pub fn load(path: impl AsRef<Path>) -> SifreResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// The embedded default corpus
    pub fn embedded() -> SifreResult<Self> {
        Self::from_toml_str(DEFAULT_CORPUS)
    }

    /// Startup checks: every tier has a sentence, ids are unique and
    /// non-zero, categories exist, every letter is in the alphabet.
    pub fn validate(&self) -> SifreResult<()> {
        for tier in Tier::all() {
            if self.by_tier(*tier).next().is_none() {
                return Err(SifreError::EmptyTier(*tier));
            }
        }

        let mut ids = HashSet::new();
        for sentence in &self.sentences {
            if sentence.id == CUSTOM_SENTENCE_ID {
                return Err(SifreError::Config(format!(
                    "sentence id {} is reserved for custom sentences",
                    CUSTOM_SENTENCE_ID
                )));
            }
            if !ids.insert(sentence.id) {
                return Err(SifreError::Config(format!("duplicate sentence id {}", sentence.id)));
            }
            if !self.categories.contains_key(&sentence.category) {
                return Err(SifreError::Config(format!(
                    "sentence {} has unknown category '{}'",
                    sentence.id, sentence.category
                )));
            }
            if sentence.letter_count() == 0 {
                return Err(SifreError::InvalidSentence(format!(
                    "sentence {} has no letters",
                    sentence.id
                )));
            }
            if let Some(c) = sentence.foreign_letter() {
                return Err(SifreError::InvalidSentence(format!(
                    "sentence {} has '{}', which is not in the Turkish alphabet",
                    sentence.id, c
                )));
            }
        }

        Ok(())
    }

    /// All sentences in corpus order
    pub fn iter(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentences of one tier
    pub fn by_tier(&self, tier: Tier) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(move |s| s.difficulty == tier)
    }

    /// Sentences of one category
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Sentence> {
        self.sentences.iter().filter(move |s| s.category == category)
    }

    /// Look up a sentence by id
    pub fn get(&self, id: u32) -> Option<&Sentence> {
        self.sentences.iter().find(|s| s.id == id)
    }

    /// Category metadata by key
    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.get(key)
    }

    pub fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    /// Pick a sentence of a tier at random, preferring ones without a run of
    /// three identical letters. Falls back to the whole tier when none
    /// qualify; None only if the tier is empty.
    pub fn pick_sentence<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> Option<&Sentence> {
        let in_tier: Vec<&Sentence> = self.by_tier(tier).collect();
        let good: Vec<&Sentence> = in_tier
            .iter()
            .copied()
            .filter(|s| !has_letter_run(&s.text, MAX_LETTER_RUN))
            .collect();

        if good.is_empty() {
            tracing::warn!(%tier, "no sentence without letter runs; using whole tier");
            in_tier.choose(rng).copied()
        } else {
            good.choose(rng).copied()
        }
    }
}

/// Whether `text` has `run` or more identical letters in a row
/// (Turkish case-insensitive; any non-letter breaks the run).
pub fn has_letter_run(text: &str, run: usize) -> bool {
    let mut previous: Option<char> = None;
    let mut length = 0;

    for c in text.chars() {
        if !is_letter(c) {
            previous = None;
            length = 0;
            continue;
        }

        let upper = to_display_upper(c);
        if previous == Some(upper) {
            length += 1;
        } else {
            previous = Some(upper);
            length = 1;
        }

        if length >= run {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn sentence(id: u32, text: &str, difficulty: Tier) -> Sentence {
        Sentence {
            id,
            text: text.to_string(),
            difficulty,
            category: "genel".to_string(),
        }
    }

    fn categories() -> BTreeMap<String, Category> {
        BTreeMap::from([(
            "genel".to_string(),
            Category {
                name: "Genel".to_string(),
                color: "#888888".to_string(),
            },
        )])
    }

    fn corpus(sentences: Vec<Sentence>) -> SifreResult<Corpus> {
        Corpus::new(categories(), sentences)
    }

    fn one_per_tier() -> Vec<Sentence> {
        vec![
            sentence(1, "Kedi uyuyor.", Tier::Easy),
            sentence(2, "Yarın hava yağmurlu olacak.", Tier::Medium),
            sentence(3, "Sabır acıdır, meyvesi tatlıdır.", Tier::Hard),
        ]
    }

    #[test]
    fn test_embedded_corpus_is_valid() {
        let corpus = Corpus::embedded().unwrap();
        for tier in Tier::all() {
            assert!(
                corpus.by_tier(*tier).count() >= 10,
                "too few {} sentences",
                tier
            );
        }
        assert!(corpus.iter().all(|s| corpus.category(&s.category).is_some()));
    }

    #[test]
    fn test_letter_runs() {
        assert!(has_letter_run("Ahhh, ne güzel", 3));
        assert!(has_letter_run("aAa", 3));
        assert!(!has_letter_run("Saat kaç?", 3));
        // A space breaks the run
        assert!(!has_letter_run("aa a", 3));
        // Dotted and dotless i are different letters
        assert!(!has_letter_run("iıi", 3));
    }

    #[test]
    fn test_pick_prefers_sentences_without_runs() {
        let mut sentences = one_per_tier();
        sentences.push(sentence(4, "Vayyy be!", Tier::Easy));
        let corpus = corpus(sentences).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..50 {
            assert_eq!(
                corpus.pick_sentence(Tier::Easy, &mut rng).map(|s| s.id),
                Some(1)
            );
        }
    }

    #[test]
    fn test_pick_falls_back_when_all_have_runs() {
        let mut sentences = one_per_tier();
        sentences[0] = sentence(1, "Vayyy be!", Tier::Easy);
        let corpus = corpus(sentences).unwrap();
        let picked = corpus.pick_sentence(Tier::Easy, &mut StdRng::seed_from_u64(0));
        assert_eq!(picked.map(|s| s.id), Some(1));
    }

    #[test]
    fn test_pick_stays_in_tier() {
        let corpus = Corpus::embedded().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for tier in Tier::all() {
            for _ in 0..20 {
                let picked = corpus.pick_sentence(*tier, &mut rng).unwrap();
                assert_eq!(picked.difficulty, *tier);
            }
        }
    }

    #[test]
    fn test_empty_tier_is_rejected() {
        let sentences = vec![
            sentence(1, "Kedi uyuyor.", Tier::Easy),
            sentence(2, "Yarın hava yağmurlu olacak.", Tier::Medium),
        ];
        assert!(matches!(corpus(sentences), Err(SifreError::EmptyTier(Tier::Hard))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut sentences = one_per_tier();
        sentences[2].id = 1;
        assert!(matches!(corpus(sentences), Err(SifreError::Config(_))));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut sentences = one_per_tier();
        sentences[1].category = "uzay".to_string();
        assert!(matches!(corpus(sentences), Err(SifreError::Config(msg)) if msg.contains("uzay")));
    }

    #[test]
    fn test_sentence_without_letters_rejected() {
        let mut sentences = one_per_tier();
        sentences[1].text = "... !".to_string();
        assert!(matches!(corpus(sentences), Err(SifreError::InvalidSentence(_))));
    }

    #[test]
    fn test_foreign_letters_rejected() {
        let mut sentences = one_per_tier();
        sentences[0].text = "Wifi yok.".to_string();
        assert!(matches!(
            corpus(sentences),
            Err(SifreError::InvalidSentence(msg)) if msg.contains('W')
        ));
        assert_eq!(sentence(9, "Taksi", Tier::Easy).foreign_letter(), None);
        assert_eq!(
            sentence(9, "Kafe au lait, très bon", Tier::Easy).foreign_letter(),
            Some('è')
        );
    }

    #[test]
    fn test_lookup_and_filters() {
        let corpus = corpus(one_per_tier()).unwrap();
        assert_eq!(corpus.get(2).map(|s| s.difficulty), Some(Tier::Medium));
        assert!(corpus.get(99).is_none());
        assert_eq!(corpus.by_category("genel").count(), 3);
        assert_eq!(corpus.by_category("yok").count(), 0);
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_custom_sentence() {
        let custom = Sentence::custom("  Merhaba dünya! ", Tier::Hard);
        assert_eq!(custom.id, CUSTOM_SENTENCE_ID);
        assert_eq!(custom.text, "Merhaba dünya!");
        assert_eq!(custom.category, CUSTOM_CATEGORY);
        assert_eq!(custom.letter_count(), 12);
    }
}
