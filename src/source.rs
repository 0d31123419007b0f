//! Document acquisition
//!
//! Inputs starting with `http://` or `https://` are downloaded, anything else
//! is read from local disk.

use std::path::PathBuf;

/// Errors while fetching document bytes
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },
}

/// Whether `input` names a remote document
pub fn is_remote(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Load the bytes of a local file or remote URL
pub async fn read_document(input: &str) -> Result<Vec<u8>, SourceError> {
    if is_remote(input) {
        fetch(input).await
    } else {
        tokio::fs::read(input).await.map_err(|source| SourceError::Io {
            path: PathBuf::from(input),
            source,
        })
    }
}

async fn fetch(url: &str) -> Result<Vec<u8>, SourceError> {
    let request_error = |source| SourceError::Request {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url).await.map_err(request_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(request_error)?;
    tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}
