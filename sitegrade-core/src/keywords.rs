// Keyword frequency extraction for the on-page analyzer. Informational
// only: keywords are reported, never scored.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const STOP_WORDS: [&str; 76] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who", "when", "where",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "such",
    "no", "not", "only", "own", "same", "so", "than", "too", "very", "can", "just", "as", "if",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Top `limit` non-stop-word tokens by frequency. Tokens are lowercase
/// alphabetic runs of three or more characters; ties keep the order the
/// words first appeared in.
pub fn top_keywords(text: &str, limit: usize) -> Vec<Keyword> {
    let text = text.to_lowercase();
    let token = Regex::new(r"\b[a-z]{3,}\b").expect("valid token pattern");

    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for matched in token.find_iter(&text) {
        let word = matched.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    // Stable sort keeps first-encounter order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(word, count)| Keyword { word, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_and_short_tokens_are_excluded() {
        let keywords = top_keywords("the cat sat on a mat by an ox", 10);
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();

        assert_eq!(words, ["cat", "sat", "mat"]);
    }

    #[test]
    fn frequency_ranks_first() {
        let keywords = top_keywords("rust rust rust audit audit engine", 10);

        assert_eq!(keywords[0].word, "rust");
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].word, "audit");
        assert_eq!(keywords[1].count, 2);
        assert_eq!(keywords[2].word, "engine");
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let keywords = top_keywords("zebra apple zebra apple", 10);

        assert_eq!(keywords[0].word, "zebra");
        assert_eq!(keywords[1].word, "apple");
    }

    #[test]
    fn limit_is_respected() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        assert_eq!(top_keywords(text, 10).len(), 10);
    }

    #[test]
    fn tokens_are_lowercased() {
        let keywords = top_keywords("Rust RUST rust", 10);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].count, 3);
    }
}
