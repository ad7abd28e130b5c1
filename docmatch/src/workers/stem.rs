// docmatch/src/workers/stem.rs
//
// Built-in lemmatizer: Snowball stemming per word.
//
//   Cyrillic word  → Russian stemmer
//   Latin word     → English stemmer
//   anything else  → unchanged
//
// Punctuation hugging a word is kept around the stem. Stems are not
// dictionary lemmas, but inflected forms of one word collapse to the same
// token, which is what the aligner needs. Input is already lower-case.

use rust_stemmers::{Algorithm, Stemmer};

use crate::engine::normalize::Lemmatizer;

pub struct SnowballLemmatizer {
    russian: Stemmer,
    english: Stemmer,
}

impl SnowballLemmatizer {
    pub fn new() -> Self {
        Self {
            russian: Stemmer::create(Algorithm::Russian),
            english: Stemmer::create(Algorithm::English),
        }
    }

    fn stem_word(&self, word: &str) -> String {
        let core = word.trim_matches(|c: char| !c.is_alphanumeric());
        if core.is_empty() {
            return word.to_string();
        }
        let stemmer = if core.chars().any(is_cyrillic) {
            &self.russian
        } else if core.chars().all(|c| c.is_ascii_alphabetic()) {
            &self.english
        } else {
            return word.to_string();
        };

        // core is a contiguous slice of word
        let start = word.len() - word.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
        let end = start + core.len();
        format!("{}{}{}", &word[..start], stemmer.stem(core), &word[end..])
    }
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize(&self, text: &str) -> Option<String> {
        let words: Vec<String> = text.split_whitespace().map(|w| self.stem_word(w)).collect();
        Some(words.join(" "))
    }
}
