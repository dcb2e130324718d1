#![allow(dead_code)]

use docsearch_core::persist::{ArtifactFile, SerializedIndex, FORMAT_VERSION};
use docsearch_core::tokenizer::Tokenizer;
use docsearch_core::{DocumentRecord, Field, Posting, SearchConfig};
use std::collections::BTreeMap;

/// Builds artifacts the way the offline indexer does: every field is run
/// through the tokenizer and postings record tf and positions per field.
pub struct ArtifactBuilder {
    tokenizer: Tokenizer,
    fields: Vec<Field>,
    docs: Vec<DocumentRecord>,
    config: SearchConfig,
}

impl ArtifactBuilder {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            fields: vec![
                Field { name: "title".into(), boost: 10.0 },
                Field { name: "text".into(), boost: 1.0 },
            ],
            docs: Vec::new(),
            config: SearchConfig::default(),
        }
    }

    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn doc(mut self, location: &str, title: &str, text: &str) -> Self {
        self.docs.push(DocumentRecord { location: location.into(), title: title.into(), text: text.into() });
        self
    }

    pub fn build(self) -> ArtifactFile {
        let mut inverted: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut field_lengths = Vec::new();
        for (doc_id, doc) in self.docs.iter().enumerate() {
            let mut lengths = Vec::new();
            for (field_id, value) in [&doc.title, &doc.text].into_iter().enumerate() {
                let tokens = self.tokenizer.tokenize(value);
                lengths.push(tokens.len() as u32);
                let mut per_term: BTreeMap<String, Vec<u32>> = BTreeMap::new();
                for (term, pos) in tokens {
                    per_term.entry(term).or_default().push(pos as u32);
                }
                for (term, positions) in per_term {
                    inverted.entry(term).or_default().push(Posting {
                        doc: doc_id as u32,
                        field: field_id as u16,
                        tf: positions.len() as u32,
                        positions,
                        weight: None,
                    });
                }
            }
            field_lengths.push(lengths);
        }
        ArtifactFile {
            config: self.config,
            docs: self.docs,
            index: SerializedIndex {
                version: FORMAT_VERSION,
                fields: self.fields,
                pipeline: self.tokenizer.pipeline(),
                field_lengths,
                inverted_index: inverted.into_iter().collect(),
            },
        }
    }

    pub fn to_json(self) -> String {
        serde_json::to_string_pretty(&self.build()).unwrap()
    }
}

/// A few sections of a CMS technical manual.
pub fn manual() -> ArtifactBuilder {
    ArtifactBuilder::new()
        .doc(
            "https://docs.example.com/install",
            "Installation | Requirements",
            "<p>Install the kernel with composer. Running the installer checks the requirements.</p>",
        )
        .doc(
            "https://docs.example.com/cache",
            "Cache | Configuration",
            "<p>Configure the view cache and the template cache.</p>",
        )
        .doc(
            "https://docs.example.com/templates",
            "Template operators",
            "<p>Template operators transform values in templates.</p>",
        )
        .doc(
            "https://docs.example.com/cluster",
            "Clustering",
            "<p>Cluster nodes share the view cache through a database.</p>",
        )
}
