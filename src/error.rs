use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the fetch, build and write stages.
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("failed to fetch feed {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("unexpected {kind} format: {value:?}")]
    Format { kind: &'static str, value: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiaryError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
