//! Decoding of lunr 2.x serialized indexes.
//!
//! The documentation scraper writes `ezp_index.json` with the `index` member
//! produced by `lunr(...).serialize()`, using each document's `location` as
//! the ref. lunr keeps no term frequencies or field lengths, only
//! per-field vectors of precomputed BM25 weights, so those weights are carried
//! over as posting weights and scored as they are.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::LoadError;
use crate::persist::{SerializedIndex, FORMAT_VERSION};
use crate::tokenizer::{STEMMER_STEP, STOP_WORD_FILTER};
use crate::{DocId, DocumentRecord, Field, FieldId, Posting};

pub const SUPPORTED_MAJOR: u32 = 2;

/// Separator between field name and document ref in `fieldVectors` keys.
const FIELD_REF_JOINER: char = '/';

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunrIndex {
    pub version: String,
    pub fields: Vec<String>,
    pub field_vectors: Vec<(String, Vec<f64>)>,
    pub inverted_index: Vec<(String, LunrPosting)>,
    #[serde(default)]
    pub pipeline: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LunrPosting {
    #[serde(rename = "_index")]
    pub index: u32,
    /// field name -> document ref -> match metadata
    #[serde(flatten)]
    pub fields: BTreeMap<String, BTreeMap<String, LunrMetadata>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LunrMetadata {
    /// `[start, length]` character spans, present when the builder whitelisted positions.
    #[serde(default)]
    pub position: Vec<(u32, u32)>,
}

/// True when a JSON `index` member is a lunr index rather than the native layout.
pub fn is_lunr(index: &serde_json::Value) -> bool {
    index.get("version").is_some_and(|v| v.is_string())
}

/// Map a lunr index onto the native serialized layout, resolving refs against `docs`.
///
/// Documents sharing a `location` share one lunr ref; its postings go to the first of them.
pub fn into_serialized(lunr: LunrIndex, docs: &[DocumentRecord]) -> Result<SerializedIndex, LoadError> {
    let major = lunr.version.split('.').next().and_then(|m| m.parse::<u32>().ok());
    if major != Some(SUPPORTED_MAJOR) {
        return Err(LoadError::Schema(format!("unsupported lunr index version {:?}", lunr.version)));
    }

    let mut refs: HashMap<&str, DocId> = HashMap::new();
    for (i, doc) in docs.iter().enumerate() {
        refs.entry(doc.location.as_str()).or_insert(i as DocId);
    }
    let field_ids: HashMap<&str, FieldId> = lunr
        .fields
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i as FieldId))
        .collect();
    let resolve = |field: &str, doc_ref: &str| -> Result<(FieldId, DocId), LoadError> {
        let f = *field_ids
            .get(field)
            .ok_or_else(|| LoadError::Schema(format!("unknown lunr field {field:?}")))?;
        let d = *refs
            .get(doc_ref)
            .ok_or_else(|| LoadError::Schema(format!("lunr ref {doc_ref:?} matches no document location")))?;
        Ok((f, d))
    };

    // (field, doc) -> term index -> weight
    let mut vectors: HashMap<(FieldId, DocId), HashMap<u32, f32>> = HashMap::new();
    let mut field_lengths = vec![vec![0u32; lunr.fields.len()]; docs.len()];
    for (key, values) in &lunr.field_vectors {
        let (field, doc_ref) = key
            .split_once(FIELD_REF_JOINER)
            .ok_or_else(|| LoadError::Schema(format!("malformed lunr field vector key {key:?}")))?;
        let (f, d) = resolve(field, doc_ref)?;
        if values.len() % 2 != 0 {
            return Err(LoadError::Schema(format!("lunr field vector {key:?} has an odd length")));
        }
        let weights: HashMap<u32, f32> = values
            .chunks_exact(2)
            .map(|pair| (pair[0] as u32, pair[1] as f32))
            .collect();
        field_lengths[d as usize][f as usize] = weights.len() as u32;
        vectors.insert((f, d), weights);
    }

    let mut inverted_index = Vec::with_capacity(lunr.inverted_index.len());
    for (term, entry) in lunr.inverted_index {
        let mut postings = Vec::new();
        for (field, matches) in &entry.fields {
            for (doc_ref, meta) in matches {
                let (f, d) = resolve(field, doc_ref)?;
                let weight = vectors
                    .get(&(f, d))
                    .and_then(|v| v.get(&entry.index))
                    .copied()
                    .ok_or_else(|| LoadError::Schema(format!("term {term:?} is missing from the field vector of {field}/{doc_ref}")))?;
                postings.push(Posting {
                    doc: d,
                    field: f,
                    tf: (meta.position.len() as u32).max(1),
                    positions: Vec::new(),
                    weight: Some(weight),
                });
            }
        }
        inverted_index.push((term, postings));
    }

    // lunr always drops stop words while indexing; only the query-side pipeline is serialized.
    let mut pipeline = vec![STOP_WORD_FILTER.to_string()];
    for step in &lunr.pipeline {
        match step.as_str() {
            "stemmer" => pipeline.push(STEMMER_STEP.to_string()),
            "stopWordFilter" | "trimmer" => {}
            other => return Err(LoadError::Schema(format!("unknown lunr pipeline function {other:?}"))),
        }
    }

    Ok(SerializedIndex {
        version: FORMAT_VERSION,
        fields: lunr.fields.into_iter().map(|name| Field { name, boost: 1.0 }).collect(),
        pipeline,
        field_lengths,
        inverted_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_lunr_by_string_version() {
        assert!(is_lunr(&json!({ "version": "2.3.9" })));
        assert!(!is_lunr(&json!({ "version": 1 })));
        assert!(!is_lunr(&json!({})));
    }

    #[test]
    fn rejects_other_major_versions() {
        let lunr = LunrIndex {
            version: "1.0.0".into(),
            fields: vec!["title".into()],
            field_vectors: vec![],
            inverted_index: vec![],
            pipeline: vec![],
        };
        assert!(matches!(into_serialized(lunr, &[]), Err(LoadError::Schema(_))));
    }

    #[test]
    fn ref_with_slashes_splits_at_first_joiner() {
        let docs = vec![DocumentRecord { location: "https://a/b".into(), title: "t".into(), text: "x".into() }];
        let lunr: LunrIndex = serde_json::from_value(json!({
            "version": "2.3.9",
            "fields": ["title", "text"],
            "fieldVectors": [["title/https://a/b", [0, 1.5]], ["text/https://a/b", []]],
            "invertedIndex": [["kernel", { "_index": 0, "title": { "https://a/b": {} }, "text": {} }]],
            "pipeline": ["stemmer"]
        }))
        .unwrap();
        let s = into_serialized(lunr, &docs).unwrap();
        assert_eq!(s.field_lengths, vec![vec![1, 0]]);
        let (term, postings) = &s.inverted_index[0];
        assert_eq!(term, "kernel");
        assert_eq!(postings, &vec![Posting { doc: 0, field: 0, tf: 1, positions: vec![], weight: Some(1.5) }]);
        assert_eq!(s.pipeline, vec!["stop_word_filter".to_string(), "stemmer".to_string()]);
    }
}
