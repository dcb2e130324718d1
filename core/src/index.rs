use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::config::SearchConfig;
use crate::tokenizer::Tokenizer;

/// Ordinal of a document in the artifact's `docs` array.
pub type DocId = u32;
pub type FieldId = u16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// External reference of the document, usually the page URL.
    pub location: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub boost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocId,
    pub field: FieldId,
    pub tf: u32,
    #[serde(default)]
    pub positions: Vec<u32>,
    /// Score precomputed by the index builder. When present it replaces BM25.
    #[serde(default)]
    pub weight: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct TermEntry {
    /// Number of distinct documents containing the term in any field.
    pub df: u32,
    pub postings: Vec<Posting>, // sorted by (doc, field)
}

#[derive(Debug)]
pub struct InvertedIndex {
    pub(crate) fields: Vec<Field>,
    pub(crate) terms: BTreeMap<String, TermEntry>,
    pub(crate) field_lengths: Vec<Vec<u32>>,
    pub(crate) avg_field_lengths: Vec<f32>,
    pub(crate) num_docs: u32,
}

impl InvertedIndex {
    pub fn fields(&self) -> &[Field] { &self.fields }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_terms(&self) -> usize { self.terms.len() }

    pub fn term(&self, term: &str) -> Option<&TermEntry> { self.terms.get(term) }

    /// All terms starting with `prefix`, in lexicographic order.
    pub fn terms_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a TermEntry)> + 'a {
        self.terms
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(term, _)| term.starts_with(prefix))
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
            .map(|i| i as FieldId)
    }

    pub fn field_length(&self, doc: DocId, field: FieldId) -> u32 {
        self.field_lengths[doc as usize][field as usize]
    }

    pub fn avg_field_length(&self, field: FieldId) -> f32 {
        self.avg_field_lengths[field as usize]
    }
}

/// Document metadata kept apart from the postings and looked up by `DocId`.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<DocumentRecord>,
}

impl DocumentStore {
    pub fn new(docs: Vec<DocumentRecord>) -> Self { Self { docs } }

    pub fn get(&self, doc_id: DocId) -> Option<&DocumentRecord> { self.docs.get(doc_id as usize) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub num_docs: u32,
    pub num_terms: usize,
    pub num_postings: usize,
    pub fields: Vec<Field>,
    pub pipeline: Vec<String>,
}

/// A loaded, validated, read-only index together with its document store.
#[derive(Debug)]
pub struct Index {
    pub(crate) inverted: InvertedIndex,
    pub(crate) documents: DocumentStore,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) config: SearchConfig,
}

impl Index {
    pub fn inverted(&self) -> &InvertedIndex { &self.inverted }

    pub fn documents(&self) -> &DocumentStore { &self.documents }

    pub fn document(&self, doc_id: DocId) -> Option<&DocumentRecord> { self.documents.get(doc_id) }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.inverted.num_docs,
            num_terms: self.inverted.terms.len(),
            num_postings: self.inverted.terms.values().map(|e| e.postings.len()).sum(),
            fields: self.inverted.fields.clone(),
            pipeline: self.tokenizer.pipeline(),
        }
    }
}
