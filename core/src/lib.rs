//! Read-only consumption of pre-built full-text search index artifacts.
//!
//! An artifact is loaded once with [`load`], [`load_file`] or
//! [`Index::from_slice`], then queried with [`search`].

pub mod config;
pub mod error;
pub mod index;
pub mod lunr;
pub mod persist;
pub mod query;
pub mod scoring;
pub mod search;
pub mod source;
pub mod tokenizer;

pub use config::{FetchConfig, SearchConfig};
pub use error::LoadError;
pub use index::*;
pub use persist::load_file;
pub use search::{search, SearchResult};
pub use source::{load, IndexSource};
