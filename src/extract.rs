//! Text-extraction client abstraction and its Tika adapter.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::ACCEPT};
use std::time::Duration;
use thiserror::Error;

/// Errors returned while extracting text from a document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// HTTP layer failed before receiving a response, including timeouts.
    #[error("Extraction request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The extraction service responded with a non-success status code.
    #[error("Unexpected extraction response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the service.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// The extraction service succeeded but produced no usable text.
    #[error("Extraction produced no text content")]
    EmptyContent,
}

/// Abstraction over the plain-text extraction collaborator.
///
/// The pipeline talks to this trait so that tests can substitute doubles for
/// the external service.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from the raw bytes of a document.
    async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, ExtractionError>;
}

/// HTTP client for an Apache Tika extraction endpoint.
pub struct TikaService {
    client: Client,
    endpoint: String,
}

impl TikaService {
    /// Construct a client for the given endpoint with a bounded per-request
    /// timeout, so a stalled service never blocks the run indefinitely.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .user_agent("docdex/0.2")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl TextExtractor for TikaService {
    async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        let response = self
            .client
            .put(&self.endpoint)
            .header(ACCEPT, "text/plain")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::UnexpectedStatus { status, body });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            // A genuinely empty document extracts to nothing; never index it.
            return Err(ExtractionError::EmptyContent);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::PUT, MockServer};

    fn service(server: &MockServer) -> TikaService {
        TikaService::new(&format!("{}/tika", server.base_url()), Duration::from_secs(5))
            .expect("client")
    }

    #[tokio::test]
    async fn extracts_plain_text_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/tika")
                    .header("accept", "text/plain")
                    .body("raw bytes");
                then.status(200).body("extracted text");
            })
            .await;

        let text = service(&server)
            .extract_text(b"raw bytes".to_vec())
            .await
            .expect("extraction");

        mock.assert_async().await;
        assert_eq!(text, "extracted text");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/tika");
                then.status(500).body("boom");
            })
            .await;

        let error = service(&server)
            .extract_text(b"doc".to_vec())
            .await
            .expect_err("must fail");
        assert!(matches!(
            error,
            ExtractionError::UnexpectedStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn whitespace_only_body_is_empty_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/tika");
                then.status(200).body("  \n\t ");
            })
            .await;

        let error = service(&server)
            .extract_text(b"doc".to_vec())
            .await
            .expect_err("must fail");
        assert!(matches!(error, ExtractionError::EmptyContent));
    }
}
