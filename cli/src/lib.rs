use docsearch_core::{search, DocId, Index};
use regex::{Regex, RegexBuilder};
use scraper::{Html, Node};
use serde::Serialize;
use std::fmt::Write;

pub mod session;

const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
    pub location: String,
    /// HTML-escaped excerpt; only the `<em>` highlight tags are markup.
    pub snippet: Option<String>,
}

/// Run one query and resolve the top `limit` hits to their documents.
pub fn run_query(index: &Index, query: &str, limit: usize) -> SearchResponse {
    let start = std::time::Instant::now();
    let results = search(index, query);
    let total_hits = results.len();

    let mut hits = Vec::new();
    for result in results.into_iter().take(limit) {
        if let Some(doc) = index.document(result.doc_id) {
            hits.push(SearchHit {
                doc_id: result.doc_id,
                score: result.score,
                title: doc.title.clone(),
                location: doc.location.clone(),
                snippet: snippet(&doc.text, &result.matched_terms),
            });
        }
    }

    let elapsed = start.elapsed();
    tracing::debug!(query, total_hits, took_s = elapsed.as_secs_f64(), "query answered");
    SearchResponse { query: query.to_string(), took_s: elapsed.as_secs_f64(), total_hits, results: hits }
}

pub fn render_text(resp: &SearchResponse) -> String {
    let mut out = String::new();
    for (rank, hit) in resp.results.iter().enumerate() {
        let _ = writeln!(out, "{}. {}  ({:.3})", rank + 1, hit.title, hit.score);
        let _ = writeln!(out, "   {}", hit.location);
        if let Some(snippet) = &hit.snippet {
            let _ = writeln!(out, "   {snippet}");
        }
    }
    let _ = writeln!(out, "{} of {} hits for {:?} in {:.3}s", resp.results.len(), resp.total_hits, resp.query, resp.took_s);
    out
}

/// Excerpt around the first matched term, HTML-escaped, with matches wrapped in `<em>`.
pub fn snippet(text: &str, terms: &[String]) -> Option<String> {
    let text = strip_markup(text);
    if text.is_empty() { return None; }
    let chars: Vec<char> = text.chars().collect();
    let pattern = term_pattern(terms);

    let (start, end) = match pattern.as_ref().and_then(|p| p.find(&text)) {
        Some(m) => {
            let at = text[..m.start()].chars().count();
            (at.saturating_sub(SNIPPET_BEFORE), (at + SNIPPET_AFTER).min(chars.len()))
        }
        None => (0, SNIPPET_AFTER.min(chars.len())),
    };
    let window: String = chars[start..end].iter().collect();

    let mut s = String::new();
    if start > 0 { s.push('…'); }
    let mut last = 0;
    if let Some(pattern) = &pattern {
        for m in pattern.find_iter(&window) {
            escape_into(&mut s, &window[last..m.start()]);
            s.push_str("<em>");
            escape_into(&mut s, m.as_str());
            s.push_str("</em>");
            last = m.end();
        }
    }
    escape_into(&mut s, &window[last..]);
    if end < chars.len() { s.push('…'); }
    Some(s)
}

/// Matches whole words beginning with any of the terms, longest first.
fn term_pattern(terms: &[String]) -> Option<Regex> {
    let mut terms: Vec<&String> = terms.iter().filter(|t| !t.trim().is_empty()).collect();
    if terms.is_empty() { return None; }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    RegexBuilder::new(&format!(r"\b(?:{alternation})[\w']*"))
        .case_insensitive(true)
        .build()
        .ok()
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Visible text of an HTML fragment: entities decoded, `script`/`style`
/// bodies and comments dropped, whitespace collapsed.
pub fn strip_markup(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut parts: Vec<&str> = Vec::new();
    for node in fragment.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            });
            if !hidden {
                parts.push(text);
            }
        }
    }
    parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}
