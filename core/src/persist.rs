use crate::config::SearchConfig;
use crate::error::LoadError;
use crate::lunr;
use crate::tokenizer::{Tokenizer, STEMMER_STEP, STOP_WORD_FILTER};
use crate::{DocId, DocumentRecord, DocumentStore, Field, FieldId, Index, InvertedIndex, Posting, TermEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;

/// On-disk shape of an index artifact. Encoded as JSON or bincode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    #[serde(default)]
    pub config: SearchConfig,
    pub docs: Vec<DocumentRecord>,
    pub index: SerializedIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedIndex {
    pub version: u32,
    pub fields: Vec<Field>,
    #[serde(default = "default_pipeline")]
    pub pipeline: Vec<String>,
    /// Token count per document, per field.
    pub field_lengths: Vec<Vec<u32>>,
    pub inverted_index: Vec<(String, Vec<Posting>)>,
}

fn default_pipeline() -> Vec<String> {
    vec![STOP_WORD_FILTER.to_string(), STEMMER_STEP.to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

impl ArtifactFormat {
    /// JSON artifacts start with `{` after an optional BOM and whitespace; anything else is bincode.
    pub fn sniff(bytes: &[u8]) -> Self {
        match strip_bom(bytes).iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }
}

/// JSON artifact whose `index` member is either the native layout or a lunr index.
#[derive(Deserialize)]
struct JsonArtifact {
    #[serde(default)]
    config: SearchConfig,
    docs: Vec<DocumentRecord>,
    index: serde_json::Value,
}

pub fn decode_artifact(bytes: &[u8]) -> Result<ArtifactFile, LoadError> {
    let bytes = strip_bom(bytes);
    match ArtifactFormat::sniff(bytes) {
        ArtifactFormat::Json => {
            let JsonArtifact { config, docs, index } = serde_json::from_slice(bytes)?;
            let index = if lunr::is_lunr(&index) {
                lunr::into_serialized(serde_json::from_value(index)?, &docs)?
            } else {
                serde_json::from_value(index)?
            };
            Ok(ArtifactFile { config, docs, index })
        }
        ArtifactFormat::Bincode => Ok(bincode::deserialize(bytes)?),
    }
}

pub fn encode_artifact(artifact: &ArtifactFile, format: ArtifactFormat) -> Result<Vec<u8>, LoadError> {
    let bytes = match format {
        ArtifactFormat::Json => serde_json::to_vec(artifact)?,
        ArtifactFormat::Bincode => bincode::serialize(artifact)?,
    };
    Ok(bytes)
}

/// Synchronously read and validate an artifact from a local file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Index, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LoadError::io(path.display().to_string(), e))?;
    let index = Index::from_slice(&bytes)?;
    tracing::info!(source = %path.display(), num_docs = index.inverted.num_docs, num_terms = index.inverted.num_terms(), "index loaded");
    Ok(index)
}

impl Index {
    /// Decode and validate an in-memory artifact of either encoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Index, LoadError> {
        Index::from_artifact(decode_artifact(bytes)?)
    }

    pub fn from_artifact(artifact: ArtifactFile) -> Result<Index, LoadError> {
        let ArtifactFile { config, docs, index } = artifact;
        if index.version > FORMAT_VERSION {
            return Err(LoadError::UnsupportedVersion { found: index.version, supported: FORMAT_VERSION });
        }
        config.validate()?;
        let tokenizer = Tokenizer::from_pipeline(&index.pipeline)?;
        validate_fields(&index.fields)?;

        let num_docs = DocId::try_from(docs.len())
            .map_err(|_| LoadError::Schema(format!("too many documents ({})", docs.len())))?;
        let num_fields = index.fields.len();
        if index.field_lengths.len() != docs.len() {
            return Err(LoadError::Schema(format!(
                "field_lengths has {} rows for {} documents",
                index.field_lengths.len(),
                docs.len()
            )));
        }
        if let Some((doc, row)) = index.field_lengths.iter().enumerate().find(|(_, r)| r.len() != num_fields) {
            return Err(LoadError::Schema(format!(
                "field_lengths row {doc} has {} entries for {num_fields} fields",
                row.len()
            )));
        }

        let mut terms = BTreeMap::new();
        for (term, mut postings) in index.inverted_index {
            if term.is_empty() {
                return Err(LoadError::Schema("empty term in inverted index".into()));
            }
            postings.sort_by_key(|p| (p.doc, p.field));
            let df = validate_postings(&term, &postings, num_docs, num_fields)?;
            if terms.insert(term.clone(), TermEntry { df, postings }).is_some() {
                return Err(LoadError::Schema(format!("duplicate term {term:?}")));
            }
        }

        let avg_field_lengths = (0..num_fields)
            .map(|f| {
                if docs.is_empty() {
                    0.0
                } else {
                    let total: u64 = index.field_lengths.iter().map(|row| row[f] as u64).sum();
                    total as f32 / docs.len() as f32
                }
            })
            .collect();

        Ok(Index {
            inverted: InvertedIndex {
                fields: index.fields,
                terms,
                field_lengths: index.field_lengths,
                avg_field_lengths,
                num_docs,
            },
            documents: DocumentStore::new(docs),
            tokenizer,
            config,
        })
    }
}

fn validate_fields(fields: &[Field]) -> Result<(), LoadError> {
    if fields.is_empty() {
        return Err(LoadError::Schema("index declares no fields".into()));
    }
    if fields.len() > FieldId::MAX as usize {
        return Err(LoadError::Schema(format!("too many fields ({})", fields.len())));
    }
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.to_ascii_lowercase()) {
            return Err(LoadError::Schema(format!("duplicate field {:?}", field.name)));
        }
        if !field.boost.is_finite() || field.boost <= 0.0 {
            return Err(LoadError::Schema(format!("field {:?} has invalid boost {}", field.name, field.boost)));
        }
    }
    Ok(())
}

/// Checks postings sorted by (doc, field) and returns the term's document frequency.
fn validate_postings(term: &str, postings: &[Posting], num_docs: DocId, num_fields: usize) -> Result<u32, LoadError> {
    let mut df = 0;
    let mut prev: Option<(DocId, FieldId)> = None;
    for p in postings {
        if p.doc >= num_docs {
            return Err(LoadError::Schema(format!("term {term:?} references missing document {}", p.doc)));
        }
        if p.field as usize >= num_fields {
            return Err(LoadError::Schema(format!("term {term:?} references missing field {}", p.field)));
        }
        if p.tf == 0 {
            return Err(LoadError::Schema(format!("term {term:?} has a zero term frequency")));
        }
        if p.weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
            return Err(LoadError::Schema(format!("term {term:?} has an invalid weight for document {}", p.doc)));
        }
        match prev {
            Some(key) if key == (p.doc, p.field) => {
                return Err(LoadError::Schema(format!(
                    "term {term:?} has duplicate postings for document {} field {}",
                    p.doc, p.field
                )));
            }
            Some((doc, _)) if doc == p.doc => {}
            _ => df += 1,
        }
        prev = Some((p.doc, p.field));
    }
    Ok(df)
}
