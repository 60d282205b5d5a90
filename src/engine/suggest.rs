use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Shown as the only suggestion when no word list could be read.
pub const FALLBACK_SUGGESTION: &str = "(no word list found)";

/// Candidate words for prefix completion, lowercased in file order. A
/// missing or unreadable file degrades to a placeholder instead of failing;
/// the list is read once and never watched for edits.
#[derive(Clone, Debug)]
pub struct WordList {
    words: Vec<String>,
    available: bool,
}

impl WordList {
    pub fn load(path: &Path) -> Self {
        match read_words(path) {
            Ok(words) => {
                log::info!("loaded {} candidate words from {}", words.len(), path.display());
                Self {
                    words,
                    available: true,
                }
            }
            Err(err) => {
                log::warn!("word list unavailable, suggestions degrade to a placeholder: {err:?}");
                Self {
                    words: Vec::new(),
                    available: false,
                }
            }
        }
    }

    /// The first `limit` words starting with `prefix`, case-insensitive,
    /// in list order, duplicates skipped as encountered. An empty prefix
    /// matches every word. An unavailable list yields the placeholder
    /// regardless of the prefix.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        if !self.available {
            return vec![FALLBACK_SUGGESTION.to_string()];
        }

        let prefix = prefix.to_lowercase();
        let mut matches: Vec<String> = Vec::new();
        for word in &self.words {
            if matches.len() >= limit {
                break;
            }
            if word.starts_with(&prefix) && !matches.iter().any(|seen| seen == word) {
                matches.push(word.clone());
            }
        }
        matches
    }
}

fn read_words(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read word list {}", path.display()))?;
    Ok(text
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> WordList {
        WordList {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
            available: true,
        }
    }

    #[test]
    fn prefix_match_preserves_list_order() {
        let words = list(&["cat", "car", "dog", "care", "cart"]);
        assert_eq!(words.suggest("ca", 5), ["cat", "car", "care", "cart"]);
    }

    #[test]
    fn empty_prefix_returns_the_head_of_the_list() {
        let words = list(&["cat", "car", "dog", "care", "cart"]);
        assert_eq!(words.suggest("", 5), ["cat", "car", "dog", "care", "cart"]);
    }

    #[test]
    fn matches_are_capped() {
        let words = list(&["aa", "ab", "ac", "ad", "ae", "af", "ag"]);
        assert_eq!(words.suggest("a", 5).len(), 5);
        assert_eq!(words.suggest("a", 5), ["aa", "ab", "ac", "ad", "ae"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let words = list(&["Care", "CART"]);
        assert_eq!(words.suggest("cA", 5), ["care", "cart"]);
    }

    #[test]
    fn duplicates_are_skipped_as_encountered() {
        let words = list(&["cat", "cat", "car", "cat"]);
        assert_eq!(words.suggest("ca", 5), ["cat", "car"]);
    }

    #[test]
    fn unavailable_list_yields_the_placeholder_for_any_prefix() {
        let words = WordList {
            words: Vec::new(),
            available: false,
        };
        assert_eq!(words.suggest("ca", 5), [FALLBACK_SUGGESTION]);
        assert_eq!(words.suggest("", 5), [FALLBACK_SUGGESTION]);
    }

    #[test]
    fn missing_file_degrades_instead_of_failing() {
        let words = WordList::load(Path::new("definitely/not/here.txt"));
        assert_eq!(words.suggest("x", 5), [FALLBACK_SUGGESTION]);
    }
}
