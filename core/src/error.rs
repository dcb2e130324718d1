use thiserror::Error;

/// Failure to obtain a usable index from an artifact.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("index artifact not found: {location}")]
    NotFound { location: String },

    #[error("failed to read {location}: {error}")]
    Io {
        location: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to fetch {url}: {error}")]
    Http {
        url: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed JSON artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed binary artifact: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("unsupported artifact version {found}, expected <= {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("unsupported index language {0:?}")]
    UnsupportedLanguage(String),

    #[error("invalid index artifact: {0}")]
    Schema(String),
}

impl LoadError {
    pub(crate) fn io(location: impl Into<String>, error: std::io::Error) -> Self {
        let location = location.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { location }
        } else {
            LoadError::Io { location, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = LoadError::io("idx.json", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(err, LoadError::NotFound { ref location } if location == "idx.json"));
    }

    #[test]
    fn error_display() {
        let err = LoadError::UnsupportedVersion { found: 3, supported: 1 };
        assert_eq!(err.to_string(), "unsupported artifact version 3, expected <= 1");
    }
}
