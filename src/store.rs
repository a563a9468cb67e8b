//! Elasticsearch document store integration.
//!
//! The pipeline uses two store operations: a lightweight `HEAD` existence
//! probe keyed by document identity, and a `PUT` write of the extracted
//! document under that identity. A probe failure is surfaced as an error,
//! never as "not found" — conflating the two would silently re-extract and
//! re-write documents whenever the store is unreachable.

use crate::identity::DocumentIdentity;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors returned while interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid Elasticsearch URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response, including timeouts.
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The store responded with an unexpected status code.
    #[error("Unexpected store response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the store.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
}

/// Persisted record for one extracted document.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    /// File name without its directory components.
    pub filename: String,
    /// Full path of the source file.
    pub path: String,
    /// Immediate parent directory name, used as a coarse classification tag.
    pub category: String,
    /// Plain text extracted from the file.
    pub content: String,
}

/// Abstraction over the index store consumed by the pipeline.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Report whether a document with this identity is already indexed.
    async fn exists(&self, identity: &DocumentIdentity) -> Result<bool, StoreError>;

    /// Write a document under the given identity, overwriting any existing
    /// record with the same identity.
    async fn put_document(
        &self,
        identity: &DocumentIdentity,
        document: &IndexedDocument,
    ) -> Result<(), StoreError>;
}

/// Lightweight HTTP client for Elasticsearch document operations.
pub struct ElasticsearchService {
    client: Client,
    base_url: String,
    index: String,
}

impl ElasticsearchService {
    /// Construct a client for the given base URL and index with a bounded
    /// per-request timeout.
    pub fn new(base_url: &str, index: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent("docdex/0.2")
            .timeout(timeout)
            .build()?;
        let base_url = normalize_base_url(base_url).map_err(StoreError::InvalidUrl)?;
        tracing::debug!(url = %base_url, index, "Initialized Elasticsearch HTTP client");

        Ok(Self {
            client,
            base_url,
            index: index.to_string(),
        })
    }

    fn document_url(&self, identity: &DocumentIdentity) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/{}/_doc/{identity}", self.index)
    }
}

#[async_trait]
impl DocumentStore for ElasticsearchService {
    async fn exists(&self, identity: &DocumentIdentity) -> Result<bool, StoreError> {
        let response = self
            .client
            .head(self.document_url(identity))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                let error = StoreError::UnexpectedStatus { status, body };
                tracing::error!(identity = %identity, error = %error, "Existence probe failed");
                Err(error)
            }
        }
    }

    async fn put_document(
        &self,
        identity: &DocumentIdentity,
        document: &IndexedDocument,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.document_url(identity))
            .json(document)
            .send()
            .await?;

        if response.status().is_success() {
            tracing::debug!(identity = %identity, path = %document.path, "Document written");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = StoreError::UnexpectedStatus { status, body };
            tracing::error!(identity = %identity, error = %error, "Document write failed");
            Err(error)
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::compute_identity;
    use httpmock::{Method::HEAD, Method::PUT, MockServer};
    use serde_json::json;
    use std::io::Write;

    async fn sample_identity() -> DocumentIdentity {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.txt");
        let mut file = std::fs::File::create(&path).expect("fixture");
        file.write_all(b"sample").expect("fixture");
        compute_identity(&path).await.expect("identity")
    }

    fn service(server: &MockServer) -> ElasticsearchService {
        ElasticsearchService::new(&server.base_url(), "documents", Duration::from_secs(5))
            .expect("client")
    }

    #[tokio::test]
    async fn exists_distinguishes_present_and_absent() {
        let server = MockServer::start_async().await;
        let identity = sample_identity().await;
        let mut mock = server
            .mock_async(|when, then| {
                when.method(HEAD)
                    .path(format!("/documents/_doc/{identity}"));
                then.status(200);
            })
            .await;

        assert!(service(&server).exists(&identity).await.expect("probe"));
        mock.assert_async().await;

        mock.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD)
                    .path(format!("/documents/_doc/{identity}"));
                then.status(404);
            })
            .await;

        assert!(!service(&server).exists(&identity).await.expect("probe"));
    }

    #[tokio::test]
    async fn probe_failure_is_an_error_not_absence() {
        let server = MockServer::start_async().await;
        let identity = sample_identity().await;
        server
            .mock_async(|when, then| {
                when.method(HEAD)
                    .path(format!("/documents/_doc/{identity}"));
                then.status(503);
            })
            .await;

        let error = service(&server)
            .exists(&identity)
            .await
            .expect_err("must surface transport problems");
        assert!(matches!(
            error,
            StoreError::UnexpectedStatus {
                status: StatusCode::SERVICE_UNAVAILABLE,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn put_document_emits_expected_request() {
        let server = MockServer::start_async().await;
        let identity = sample_identity().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path(format!("/documents/_doc/{identity}"))
                    .json_body(json!({
                        "filename": "a.txt",
                        "path": "/mnt/data/docs/a.txt",
                        "category": "docs",
                        "content": "hello"
                    }));
                then.status(201).json_body(json!({ "result": "created" }));
            })
            .await;

        let document = IndexedDocument {
            filename: "a.txt".into(),
            path: "/mnt/data/docs/a.txt".into(),
            category: "docs".into(),
            content: "hello".into(),
        };
        service(&server)
            .put_document(&identity, &document)
            .await
            .expect("write");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_write_is_an_error() {
        let server = MockServer::start_async().await;
        let identity = sample_identity().await;
        server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path(format!("/documents/_doc/{identity}"));
                then.status(500).body("shard failure");
            })
            .await;

        let document = IndexedDocument {
            filename: "a.txt".into(),
            path: "/a.txt".into(),
            category: "docs".into(),
            content: "hello".into(),
        };
        let error = service(&server)
            .put_document(&identity, &document)
            .await
            .expect_err("must fail");
        assert!(matches!(error, StoreError::UnexpectedStatus { .. }));
    }
}
