//! Byte sources: local file, pasted document text, or a remote URL.
//!
//! All three feed the dispatcher identical bytes. Fetch failures come back
//! as [`FetchError`] values; nothing here panics and nothing leaks into the
//! parsers.

use crate::error::FetchError;
use std::path::PathBuf;
use std::time::Duration;

/// Where receipt bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Inline(String),
    Url(String),
}

impl Source {
    /// Triage a user-supplied string: URLs start with an http scheme,
    /// pasted documents contain markup, anything else names a local file.
    pub fn classify(input: &str) -> Source {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Source::Url(trimmed.to_string())
        } else if trimmed.contains("<?xml") || trimmed.starts_with('<') {
            Source::Inline(trimmed.to_string())
        } else {
            Source::File(PathBuf::from(trimmed))
        }
    }
}

/// Retrieve the document bytes. `timeout` bounds the remote case; local
/// reads are not artificially limited.
pub async fn fetch(source: &Source, timeout: Duration) -> Result<Vec<u8>, FetchError> {
    match source {
        Source::Inline(text) => Ok(text.clone().into_bytes()),
        Source::File(path) => Ok(tokio::fs::read(path).await?),
        Source::Url(url) => {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let response = client.get(url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_url() {
        assert_eq!(
            Source::classify("https://example.com/check.xml"),
            Source::Url("https://example.com/check.xml".to_string())
        );
    }

    #[test]
    fn test_classify_inline_markup() {
        assert!(matches!(
            Source::classify("<?xml version=\"1.0\"?><RQ/>"),
            Source::Inline(_)
        ));
        assert!(matches!(Source::classify("<RQ></RQ>"), Source::Inline(_)));
    }

    #[test]
    fn test_classify_file_path() {
        assert_eq!(
            Source::classify("receipts/check.xml"),
            Source::File(PathBuf::from("receipts/check.xml"))
        );
    }

    #[tokio::test]
    async fn test_fetch_inline_returns_bytes_verbatim() {
        let source = Source::Inline("<RQ/>".to_string());
        let bytes = fetch(&source, Duration::from_secs(5)).await.unwrap();
        assert_eq!(bytes, b"<RQ/>");
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("check.xml");
        std::fs::write(&path, b"<CHECK/>").unwrap();

        let bytes = fetch(&Source::File(path), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(bytes, b"<CHECK/>");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_an_error_value() {
        let result = fetch(
            &Source::File(PathBuf::from("/no/such/receipt.xml")),
            Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Io(_))));
    }
}
