//! Content-derived document identity.
//!
//! A document's identity is the SHA-256 digest of its full byte content,
//! hex-encoded. It depends only on the bytes: moving or renaming a file
//! leaves the identity unchanged, while any content edit produces a new one.
//! The digest doubles as the document id in the index store, which is what
//! makes re-runs over an unchanged tree cheap.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tokio::{fs::File, io::AsyncReadExt};

/// Read granularity while feeding file content into the hasher.
const HASH_CHUNK_SIZE: usize = 8192;

/// Errors encountered while deriving a document identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The file could not be opened or a read failed mid-stream.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Stable, content-derived identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentIdentity(String);

impl DocumentIdentity {
    /// View the identity as its hex digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the identity for the file at `path` by streaming its content
/// through SHA-256 in bounded chunks, so arbitrarily large files never
/// require a full in-memory buffer.
pub async fn compute_identity(path: &Path) -> Result<DocumentIdentity, IdentityError> {
    let read_error = |source| IdentityError::Read {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::open(path).await.map_err(read_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer).await.map_err(read_error)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(DocumentIdentity(hex::encode(hasher.finalize())))
}
