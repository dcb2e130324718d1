//! Free-text query parsing.
//!
//! Whitespace-separated words may carry a `+` (required) or `-` (prohibited)
//! marker, a `field:` prefix naming an index field, and a trailing `*` that
//! turns the last token of the word into a prefix match. Words are run
//! through the index tokenizer, so a single word can yield several clauses
//! or none at all.

use crate::tokenizer::{words, Tokenizer};
use crate::{FieldId, InvertedIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
    Prohibited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermMatch {
    /// A fully tokenized term, looked up as is.
    Exact(String),
    /// A normalized but unfiltered prefix, matching every term that starts with it.
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub term: TermMatch,
    /// Restricts matching to one field. `None` matches any field.
    pub field: Option<FieldId>,
    pub presence: Presence,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn parse(text: &str, tokenizer: &Tokenizer, index: &InvertedIndex) -> Query {
        let mut query = Query::default();
        for raw in text.split_whitespace() {
            let (presence, word) = split_presence(raw);

            let (field, word) = match word.split_once(':') {
                Some((name, rest)) => match index.field_id(name) {
                    Some(id) => (Some(id), rest),
                    None => (None, word),
                },
                None => (None, word),
            };

            if word.ends_with('*') {
                let mut parts = words(word.trim_end_matches('*'));
                let prefix = parts.pop();
                for part in parts {
                    if let Some(term) = tokenizer.filter(&part) {
                        query.push(Clause { term: TermMatch::Exact(term), field, presence });
                    }
                }
                if let Some(prefix) = prefix {
                    query.push(Clause { term: TermMatch::Prefix(prefix), field, presence });
                }
            } else {
                for (term, _pos) in tokenizer.tokenize(word) {
                    query.push(Clause { term: TermMatch::Exact(term), field, presence });
                }
            }
        }
        query
    }

    fn push(&mut self, clause: Clause) {
        if !self.clauses.contains(&clause) {
            self.clauses.push(clause);
        }
    }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    pub fn required_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.presence == Presence::Required).count()
    }

    /// True when at least one clause can contribute a match.
    pub fn has_positive_clause(&self) -> bool {
        self.clauses.iter().any(|c| c.presence != Presence::Prohibited)
    }
}

fn split_presence(word: &str) -> (Presence, &str) {
    if word.len() > 1 {
        if let Some(rest) = word.strip_prefix('+') {
            return (Presence::Required, rest);
        }
        if let Some(rest) = word.strip_prefix('-') {
            return (Presence::Prohibited, rest);
        }
    }
    (Presence::Optional, word)
}
