use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;

use crate::error::LoadError;

pub const STOP_WORD_FILTER: &str = "stop_word_filter";
pub const STEMMER_STEP: &str = "stemmer";

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Token filters applied after normalization and word splitting.
///
/// An index is queried with the same filters it was built with, so the
/// tokenizer is reconstructed from the pipeline recorded in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    pub stop_words: bool,
    pub stem: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { stop_words: true, stem: true }
    }
}

impl Tokenizer {
    /// Build a tokenizer from pipeline step names, in any order.
    pub fn from_pipeline<S: AsRef<str>>(steps: &[S]) -> Result<Self, LoadError> {
        let mut tokenizer = Self { stop_words: false, stem: false };
        for step in steps {
            match step.as_ref() {
                STOP_WORD_FILTER => tokenizer.stop_words = true,
                STEMMER_STEP => tokenizer.stem = true,
                other => return Err(LoadError::Schema(format!("unknown pipeline step {other:?}"))),
            }
        }
        Ok(tokenizer)
    }

    pub fn pipeline(&self) -> Vec<String> {
        let mut steps = Vec::new();
        if self.stop_words { steps.push(STOP_WORD_FILTER.to_string()); }
        if self.stem { steps.push(STEMMER_STEP.to_string()); }
        steps
    }

    /// Tokenize text into (term, position). Positions count every word,
    /// including the ones dropped by the stop-word filter.
    pub fn tokenize(&self, text: &str) -> Vec<(String, usize)> {
        words(text)
            .into_iter()
            .enumerate()
            .filter_map(|(pos, word)| self.filter(&word).map(|term| (term, pos)))
            .collect()
    }

    /// Run a single normalized word through the filters.
    pub fn filter(&self, word: &str) -> Option<String> {
        if self.stop_words && is_stopword(word) { return None; }
        if self.stem {
            Some(STEMMER.stem(word).to_string())
        } else {
            Some(word.to_string())
        }
    }
}

/// NFKC-normalize, lowercase and split text into words without filtering.
pub fn words(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// Tokenize text into (term, position) using NFKC normalization, lowercase, stopword removal, and stemming.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert!(t.iter().any(|(w, _)| w == "run"));
    }

    #[test]
    fn positions_skip_stopwords() {
        let t = tokenize("the kernel");
        assert_eq!(t, vec![("kernel".to_string(), 1)]);
    }

    #[test]
    fn pipeline_roundtrip() {
        let t = Tokenizer::from_pipeline(&["stemmer"]).unwrap();
        assert!(!t.stop_words);
        assert!(t.stem);
        assert_eq!(t.pipeline(), vec!["stemmer".to_string()]);
        assert!(Tokenizer::from_pipeline(&["trimmer"]).is_err());
    }

    #[test]
    fn bare_pipeline_keeps_words() {
        let t = Tokenizer::from_pipeline::<&str>(&[]).unwrap();
        let terms: Vec<String> = t.tokenize("The Caches").into_iter().map(|(w, _)| w).collect();
        assert_eq!(terms, vec!["the".to_string(), "caches".to_string()]);
    }
}
