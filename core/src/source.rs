use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::config::FetchConfig;
use crate::error::LoadError;
use crate::Index;

/// Where an index artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    Path(PathBuf),
    Url(Url),
}

impl FromStr for IndexSource {
    type Err = LoadError;

    /// `http`/`https` URLs are remote, `file://` URLs and anything else are local paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(IndexSource::Url(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(IndexSource::Path)
                .map_err(|_| LoadError::Schema(format!("invalid file URL {s:?}"))),
            _ => Ok(IndexSource::Path(PathBuf::from(s))),
        }
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSource::Path(p) => write!(f, "{}", p.display()),
            IndexSource::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Load and validate an artifact. Dropping the future cancels the load.
pub async fn load(source: &IndexSource, config: &FetchConfig) -> Result<Index, LoadError> {
    let bytes = match source {
        IndexSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| LoadError::io(path.display().to_string(), e))?,
        IndexSource::Url(url) => fetch(url, config).await?,
    };
    let index = Index::from_slice(&bytes)?;
    tracing::info!(source = %source, num_docs = index.inverted().num_docs(), num_terms = index.inverted().num_terms(), "index loaded");
    Ok(index)
}

async fn fetch(url: &Url, config: &FetchConfig) -> Result<Vec<u8>, LoadError> {
    let http_err = |error| LoadError::Http { url: url.to_string(), error };

    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if config.no_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build().map_err(http_err)?;

    tracing::debug!(%url, "fetching index artifact");
    let resp = client.get(url.clone()).send().await.map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status { url: url.to_string(), status: status.as_u16() });
    }
    let bytes = resp.bytes().await.map_err(http_err)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sources() {
        let s: IndexSource = "https://example.com/ezp_index.json".parse().unwrap();
        assert!(matches!(s, IndexSource::Url(ref u) if u.host_str() == Some("example.com")));

        let s: IndexSource = "./data/ezp_index.json".parse().unwrap();
        assert_eq!(s, IndexSource::Path(PathBuf::from("./data/ezp_index.json")));
    }

    #[cfg(unix)]
    #[test]
    fn file_url_becomes_path() {
        let s: IndexSource = "file:///tmp/ezp_index.json".parse().unwrap();
        assert_eq!(s, IndexSource::Path(PathBuf::from("/tmp/ezp_index.json")));
    }

    #[test]
    fn windows_drive_letter_is_not_a_scheme() {
        // "c:" parses as a URL scheme; only http(s) and file are treated as URLs.
        let s: IndexSource = "c:/index.json".parse().unwrap();
        assert!(matches!(s, IndexSource::Path(_)));
    }
}
