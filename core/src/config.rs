use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LoadError;

pub const SUPPORTED_LANGUAGE: &str = "en";

/// Search settings shipped inside the artifact next to the index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub lang: Vec<String>,
    /// Trimmed queries shorter than this many characters return nothing.
    pub min_search_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lang: vec![SUPPORTED_LANGUAGE.to_string()],
            min_search_length: 1,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), LoadError> {
        match self.lang.iter().find(|l| l.as_str() != SUPPORTED_LANGUAGE) {
            Some(other) => Err(LoadError::UnsupportedLanguage(other.clone())),
            None => Ok(()),
        }
    }
}

/// Settings for loading artifacts from remote locations.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub timeout: Option<Duration>,
    pub user_agent: String,
    pub no_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("docsearch/", env!("CARGO_PKG_VERSION")).to_string(),
            no_proxy: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_only() {
        assert!(SearchConfig::default().validate().is_ok());
        let cfg = SearchConfig { lang: vec!["en".into(), "de".into()], min_search_length: 1 };
        assert!(matches!(cfg.validate(), Err(LoadError::UnsupportedLanguage(l)) if l == "de"));
    }

    #[test]
    fn missing_keys_use_defaults() {
        let cfg: SearchConfig = serde_json::from_str(r#"{"min_search_length": 3}"#).unwrap();
        assert_eq!(cfg.lang, vec!["en".to_string()]);
        assert_eq!(cfg.min_search_length, 3);
    }
}
