//! Error types raised by the HTTP quiz catalog.

use reqwest::StatusCode;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Convenient result alias returning [`HttpCatalogError`] failures.
pub type HttpCatalogResult<T> = Result<T, HttpCatalogError>;

/// Failures that can occur while fetching quiz data over HTTP.
#[derive(Debug, Error)]
pub enum HttpCatalogError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build catalog HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send catalog request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server returned an unexpected status code.
    #[error("unexpected catalog response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// The response body could not be read.
    #[error("failed to read catalog response for `{path}`")]
    ReadBody {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The quiz index was not a JSON array of identifiers.
    #[error("failed to decode catalog index `{path}`")]
    DecodeIndex {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<HttpCatalogError> for CatalogError {
    fn from(err: HttpCatalogError) -> Self {
        CatalogError::unavailable(err.to_string(), err)
    }
}
