use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};

use crate::catalog::{CatalogError, CatalogResult, QuizCatalog, feature::parse_feature_names};

use super::{
    config::HttpCatalogConfig,
    error::{HttpCatalogError, HttpCatalogResult},
};

/// Document listing the quiz identifiers served under the base URL.
const INDEX_DOCUMENT: &str = "index.json";

/// Catalog fetching `<base_url>/<quiz_id>.json` documents.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: Arc<str>,
}

impl HttpCatalog {
    /// Build the HTTP client for `config`. No request is sent.
    pub fn new(config: HttpCatalogConfig) -> HttpCatalogResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| HttpCatalogError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
        })
    }

    /// Fetch `path`, returning `None` on 404.
    async fn get_bytes(&self, path: &str) -> HttpCatalogResult<Option<Vec<u8>>> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HttpCatalogError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .bytes()
                .await
                .map(|body| Some(body.to_vec()))
                .map_err(|source| HttpCatalogError::ReadBody {
                    path: path.to_string(),
                    source,
                }),
            other => Err(HttpCatalogError::RequestStatus {
                path: path.to_string(),
                status: other,
            }),
        }
    }

    async fn load(&self, quiz_id: String) -> CatalogResult<Vec<String>> {
        let path = format!("{quiz_id}.json");
        match self.get_bytes(&path).await? {
            Some(payload) => parse_feature_names(&quiz_id, &payload),
            None => Err(CatalogError::UnknownQuiz { quiz_id }),
        }
    }

    async fn list(&self) -> CatalogResult<Vec<String>> {
        let Some(payload) = self.get_bytes(INDEX_DOCUMENT).await? else {
            return Ok(Vec::new());
        };
        let mut ids: Vec<String> = serde_json::from_slice(&payload).map_err(|source| {
            HttpCatalogError::DecodeIndex {
                path: INDEX_DOCUMENT.to_string(),
                source,
            }
        })?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.get_bytes(INDEX_DOCUMENT).await?;
        Ok(())
    }
}

impl QuizCatalog for HttpCatalog {
    fn load_feature_names(&self, quiz_id: &str) -> BoxFuture<'static, CatalogResult<Vec<String>>> {
        let catalog = self.clone();
        let quiz_id = quiz_id.to_string();
        Box::pin(async move { catalog.load(quiz_id).await })
    }

    fn list_quizzes(&self) -> BoxFuture<'static, CatalogResult<Vec<String>>> {
        let catalog = self.clone();
        Box::pin(async move { catalog.list().await })
    }

    fn health_check(&self) -> BoxFuture<'static, CatalogResult<()>> {
        let catalog = self.clone();
        Box::pin(async move { catalog.ping().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let catalog = HttpCatalog::new(HttpCatalogConfig::new("http://maps.local/spain/")).unwrap();
        assert_eq!(&*catalog.base_url, "http://maps.local/spain");
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let catalog = HttpCatalog::new(HttpCatalogConfig::new("http://127.0.0.1:9")).unwrap();
        let err = catalog.load_feature_names("avila").await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { .. }));
    }
}
