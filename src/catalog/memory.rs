use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;

use super::{
    CatalogError, CatalogResult, QuizCatalog,
    feature::{Feature, FeatureCollection, extract_feature_names},
};

/// In-process catalog, used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    quizzes: Arc<DashMap<String, FeatureCollection>>,
}

impl MemoryCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the collection served for `quiz_id`.
    pub fn insert(&self, quiz_id: impl Into<String>, collection: FeatureCollection) {
        self.quizzes.insert(quiz_id.into(), collection);
    }

    /// Register a quiz made of plainly named features.
    pub fn with_names<I, S>(self, quiz_id: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(quiz_id, names.into_iter().map(Feature::named).collect());
        self
    }
}

impl QuizCatalog for MemoryCatalog {
    fn load_feature_names(&self, quiz_id: &str) -> BoxFuture<'static, CatalogResult<Vec<String>>> {
        let result = match self.quizzes.get(quiz_id) {
            Some(collection) => extract_feature_names(quiz_id, &collection),
            None => Err(CatalogError::UnknownQuiz {
                quiz_id: quiz_id.to_string(),
            }),
        };
        Box::pin(async move { result })
    }

    fn list_quizzes(&self) -> BoxFuture<'static, CatalogResult<Vec<String>>> {
        let mut ids: Vec<String> = self.quizzes.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        Box::pin(async move { Ok(ids) })
    }

    fn health_check(&self) -> BoxFuture<'static, CatalogResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_registered_quizzes() {
        let catalog = MemoryCatalog::new()
            .with_names("beta", ["Uno", "Dos", "Uno"])
            .with_names("alpha", ["Solo"]);

        assert_eq!(catalog.load_feature_names("beta").await.unwrap(), vec!["Uno", "Dos"]);
        assert_eq!(catalog.list_quizzes().await.unwrap(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn unknown_and_empty_quizzes_fail() {
        let catalog = MemoryCatalog::new();
        catalog.insert("empty", FeatureCollection::default());

        assert!(matches!(
            catalog.load_feature_names("missing").await,
            Err(CatalogError::UnknownQuiz { .. })
        ));
        assert!(matches!(
            catalog.load_feature_names("empty").await,
            Err(CatalogError::DataFormat { .. })
        ));
    }
}
