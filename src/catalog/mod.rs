//! Sources of quiz feature names.
//!
//! A [`QuizCatalog`] turns a quiz identifier into the deduplicated list of
//! feature names a session plays through. Every backend parses the same GeoJSON
//! payload through [`feature::parse_feature_names`].

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

pub mod feature;
pub mod file;
#[cfg(feature = "http-catalog")]
pub mod http;
pub mod memory;

pub use self::file::FileCatalog;
#[cfg(feature = "http-catalog")]
pub use self::http::HttpCatalog;
pub use self::memory::MemoryCatalog;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures while resolving the feature names of a quiz.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No data exists for this quiz identifier.
    #[error("unknown quiz `{quiz_id}`")]
    UnknownQuiz {
        /// Identifier that was requested.
        quiz_id: String,
    },
    /// Data exists but yields no usable feature names.
    #[error("invalid data for quiz `{quiz_id}`: {reason}")]
    DataFormat {
        /// Identifier that was requested.
        quiz_id: String,
        /// What was wrong with the payload.
        reason: String,
    },
    /// The backing source could not be reached.
    #[error("quiz data unavailable: {message}")]
    Unavailable {
        /// Context of the failure.
        message: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl CatalogError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        CatalogError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Abstraction over where quiz data lives.
pub trait QuizCatalog: Send + Sync {
    /// Deduplicated feature names of `quiz_id`, in first-seen order.
    fn load_feature_names(&self, quiz_id: &str) -> BoxFuture<'static, CatalogResult<Vec<String>>>;
    /// Identifiers of every quiz the catalog can serve, sorted.
    fn list_quizzes(&self) -> BoxFuture<'static, CatalogResult<Vec<String>>>;
    /// Probe the backing source.
    fn health_check(&self) -> BoxFuture<'static, CatalogResult<()>>;
}
