//! Word bank: per-category lists of fixed-length words.
//!
//! Every category shares one word length. Source words are normalized
//! (trimmed, lowercased) at load time; entries that do not come out as
//! exactly [`WORD_LENGTH`] ASCII letters are dropped silently rather than
//! failing the load.

use std::collections::HashMap;

use rand::seq::SliceRandom;

/// Fixed word length shared by every category.
pub const WORD_LENGTH: usize = 5;

/// Check that a word has the playable shape: exactly [`WORD_LENGTH`]
/// ASCII letters.
pub fn is_valid_shape(word: &str) -> bool {
    word.len() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Per-category word lists, keyed by uppercase category name.
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    categories: HashMap<String, Vec<String>>,
}

impl WordBank {
    /// Empty word bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Word bank holding the built-in categories.
    pub fn with_defaults() -> Self {
        let mut bank = Self::new();
        bank.insert_category(
            "ANIMALS",
            ["horse", "tiger", "zebra", "whale", "sheep", "otter", "moose", "camel"],
        );
        bank.insert_category(
            "FOODS",
            ["apple", "bread", "grape", "mango", "melon", "olive", "peach", "onion"],
        );
        bank.insert_category(
            "COLORS",
            ["green", "white", "black", "brown", "coral", "amber", "ivory", "khaki"],
        );
        bank
    }

    /// Add or replace a category.
    ///
    /// The key is canonicalized to uppercase. Words are trimmed and
    /// lowercased, and anything that is not exactly [`WORD_LENGTH`] ASCII
    /// letters afterwards is dropped.
    pub fn insert_category<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| is_valid_shape(w))
            .collect();
        self.categories.insert(name.trim().to_uppercase(), normalized);
    }

    /// Words of a category. Lookup is case-insensitive.
    pub fn words_for(&self, category: &str) -> Option<&[String]> {
        self.categories
            .get(&category.trim().to_uppercase())
            .map(|words| words.as_slice())
    }

    /// Whether a category exists and has at least one playable word.
    pub fn has_playable(&self, category: &str) -> bool {
        self.words_for(category).map_or(false, |words| !words.is_empty())
    }

    /// Membership check against a category's list.
    pub fn contains(&self, category: &str, word: &str) -> bool {
        self.words_for(category)
            .map_or(false, |words| words.iter().any(|w| w == word))
    }

    /// Draw a uniformly random word. `None` when the category is unknown
    /// or has no playable words left.
    pub fn pick(&self, category: &str) -> Option<&str> {
        let words = self.words_for(category)?;
        words.choose(&mut rand::thread_rng()).map(|w| w.as_str())
    }

    /// Number of categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_playable() {
        let bank = WordBank::with_defaults();
        assert_eq!(bank.category_count(), 3);
        for category in ["ANIMALS", "FOODS", "COLORS"] {
            assert!(bank.has_playable(category));
            for word in bank.words_for(category).unwrap() {
                assert!(is_valid_shape(word), "{word} has the wrong shape");
            }
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let bank = WordBank::with_defaults();
        assert!(bank.words_for("animals").is_some());
        assert!(bank.words_for(" Animals ").is_some());
    }

    #[test]
    fn test_insert_filters_malformed_entries() {
        let mut bank = WordBank::new();
        bank.insert_category("mixed", ["  apple ", "BREAD", "cat", "bananas", "gr@pe"]);

        let words = bank.words_for("MIXED").unwrap();
        assert_eq!(words, &["apple".to_string(), "bread".to_string()]);
    }

    #[test]
    fn test_empty_category_is_not_playable() {
        let mut bank = WordBank::new();
        bank.insert_category("EMPTY", ["xy", "toolongword"]);

        assert!(!bank.has_playable("EMPTY"));
        assert_eq!(bank.pick("EMPTY"), None);
    }

    #[test]
    fn test_pick_unknown_category() {
        let bank = WordBank::with_defaults();
        assert_eq!(bank.pick("NO_SUCH"), None);
    }

    #[test]
    fn test_pick_returns_member() {
        let bank = WordBank::with_defaults();
        let word = bank.pick("FOODS").unwrap();
        assert!(bank.contains("FOODS", word));
    }

    #[test]
    fn test_shape_validation() {
        assert!(is_valid_shape("apple"));
        assert!(!is_valid_shape("appl"));
        assert!(!is_valid_shape("apples"));
        assert!(!is_valid_shape("app1e"));
        assert!(!is_valid_shape("app e"));
    }
}
