//! Error types for knowledge loading and answer generation.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while loading the knowledge base. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("knowledge file not found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },
    #[error("failed to read knowledge file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed knowledge document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("knowledge field `{0}` is empty")]
    EmptyField(String),
    #[error("knowledge base needs at least {required} services, found {found}")]
    TooFewServices { found: usize, required: usize },
}

/// Errors from the generative fallback.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("request to generation backend failed: {0}")]
    Transport(String),
    #[error("generation backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode generation response: {0}")]
    Decode(String),
    #[error("generation backend returned an empty answer")]
    EmptyResponse,
}

impl GenerationError {
    /// Maps a reqwest error. A timeout only counts as `Timeout` when the
    /// client was built with a limit; otherwise it is a transport failure.
    pub fn from_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(limit) if err.is_timeout() => GenerationError::Timeout(limit),
            _ if err.is_decode() => GenerationError::Decode(err.to_string()),
            _ => GenerationError::Transport(err.to_string()),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::EmptyField("founder".to_string());
        assert_eq!(err.to_string(), "knowledge field `founder` is empty");

        let err = LoadError::TooFewServices { found: 2, required: 4 };
        assert_eq!(
            err.to_string(),
            "knowledge base needs at least 4 services, found 2"
        );

        let err = LoadError::NotFound {
            searched: vec![PathBuf::from("a.json"), PathBuf::from("b/a.json")],
        };
        assert_eq!(
            err.to_string(),
            "knowledge file not found (searched: a.json, b/a.json)"
        );
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "generation timed out after 30s");

        let err = GenerationError::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "generation timed out after 50ms");

        let err = GenerationError::Status {
            status: 404,
            body: "model not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation backend returned 404: model not found"
        );

        assert_eq!(
            GenerationError::EmptyResponse.to_string(),
            "generation backend returned an empty answer"
        );
    }
}
