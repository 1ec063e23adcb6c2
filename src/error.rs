// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

use crate::store::ResourceKind;

/// Failure of the document client for a single URL.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("could not read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Connection trouble, throttling and server-side errors are worth another round;
    /// anything else the origin said about the URL itself (e.g. 404) is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network { .. } | FetchError::Body { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt store file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode {kind} records: {source}")]
    Encode {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("{kind} index unavailable: {reason}")]
    IndexUnavailable { kind: ResourceKind, reason: String },
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
