use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::query::{Clause, Presence, Query, TermMatch};
use crate::scoring::{bm25_field_score, idf};
use crate::{DocId, Index, InvertedIndex, TermEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub score: f32,
    /// Index terms that contributed to the score, sorted.
    pub matched_terms: Vec<String>,
}

#[derive(Default)]
struct Accumulator {
    score: f32,
    matched: BTreeSet<String>,
    required_hits: usize,
}

/// Rank the documents of `index` against a free-text query.
///
/// Results are ordered by descending score, ties by ascending `doc_id`.
/// Queries that normalize to nothing return an empty vector.
pub fn search(index: &Index, query_text: &str) -> Vec<SearchResult> {
    if query_text.trim().chars().count() < index.config.min_search_length {
        return Vec::new();
    }
    let query = Query::parse(query_text, &index.tokenizer, &index.inverted);
    let results = execute(&index.inverted, &query);
    tracing::debug!(query = query_text, clauses = query.clauses.len(), hits = results.len(), "search complete");
    results
}

/// Score a parsed query against the inverted index.
pub fn execute(inverted: &InvertedIndex, query: &Query) -> Vec<SearchResult> {
    if !query.has_positive_clause() {
        return Vec::new();
    }

    let mut acc: HashMap<DocId, Accumulator> = HashMap::new();
    let mut excluded: HashSet<DocId> = HashSet::new();

    for clause in &query.clauses {
        let mut clause_docs: HashSet<DocId> = HashSet::new();
        for (term, entry) in expand(inverted, clause) {
            let term_idf = idf(entry.df, inverted.num_docs);
            for p in &entry.postings {
                if clause.field.is_some_and(|f| f != p.field) {
                    continue;
                }
                if clause.presence == Presence::Prohibited {
                    excluded.insert(p.doc);
                    continue;
                }
                let field = &inverted.fields[p.field as usize];
                let s = match p.weight {
                    Some(weight) => weight * field.boost,
                    None => bm25_field_score(
                        p.tf,
                        term_idf,
                        inverted.field_length(p.doc, p.field),
                        inverted.avg_field_length(p.field),
                        field.boost,
                    ),
                };
                let doc = acc.entry(p.doc).or_default();
                doc.score += s;
                doc.matched.insert(term.clone());
                clause_docs.insert(p.doc);
            }
        }
        if clause.presence == Presence::Required {
            for doc in clause_docs {
                if let Some(a) = acc.get_mut(&doc) {
                    a.required_hits += 1;
                }
            }
        }
    }

    let required = query.required_count();
    let mut results: Vec<SearchResult> = acc
        .into_iter()
        .filter(|(doc, a)| !excluded.contains(doc) && a.required_hits == required && a.score > 0.0)
        .map(|(doc_id, a)| SearchResult { doc_id, score: a.score, matched_terms: a.matched.into_iter().collect() })
        .collect();
    results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id)));
    results
}

fn expand<'a>(inverted: &'a InvertedIndex, clause: &'a Clause) -> Vec<(&'a String, &'a TermEntry)> {
    match &clause.term {
        TermMatch::Exact(term) => inverted.terms.get_key_value(term.as_str()).into_iter().collect(),
        TermMatch::Prefix(prefix) => inverted.terms_with_prefix(prefix).collect(),
    }
}

impl Index {
    pub fn search(&self, query_text: &str) -> Vec<SearchResult> {
        search(self, query_text)
    }
}
