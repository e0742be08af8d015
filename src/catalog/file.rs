use std::{
    collections::BTreeSet,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::fs;
use tracing::debug;

use super::{CatalogError, CatalogResult, QuizCatalog, feature::parse_feature_names};

/// File extensions recognised as quiz data, by priority.
const EXTENSIONS: [&str; 2] = ["json", "geojson"];

/// Catalog reading GeoJSON files from a directory tree.
///
/// `<quiz_id>.json` (or `.geojson`) is looked up at the root first, then one
/// directory down, which is the `<region>/<quiz_id>.json` layout of the
/// processed map exports.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: Arc<PathBuf>,
}

impl FileCatalog {
    /// Serve quizzes below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    /// Root directory of the catalog.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn locate(&self, quiz_id: &str) -> CatalogResult<Option<PathBuf>> {
        if let Some(path) = find_in(&self.root, quiz_id).await? {
            return Ok(Some(path));
        }

        for dir in self.subdirectories().await? {
            if let Some(path) = find_in(&dir, quiz_id).await? {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    async fn subdirectories(&self) -> CatalogResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(self.root.as_path())
            .await
            .map_err(|err| unavailable(&self.root, err))?;

        let mut dirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| unavailable(&self.root, err))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|kind| kind.is_dir())
                .unwrap_or(false);
            if is_dir {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    async fn load(&self, quiz_id: String) -> CatalogResult<Vec<String>> {
        let Some(path) = self.locate(&quiz_id).await? else {
            return Err(CatalogError::UnknownQuiz { quiz_id });
        };

        debug!(quiz_id, path = %path.display(), "reading quiz data");
        let payload = fs::read(&path)
            .await
            .map_err(|err| unavailable(&path, err))?;
        parse_feature_names(&quiz_id, &payload)
    }

    async fn list(&self) -> CatalogResult<Vec<String>> {
        let mut ids = BTreeSet::new();
        collect_stems(&self.root, &mut ids).await?;
        for dir in self.subdirectories().await? {
            collect_stems(&dir, &mut ids).await?;
        }
        Ok(ids.into_iter().collect())
    }
}

async fn find_in(dir: &Path, quiz_id: &str) -> CatalogResult<Option<PathBuf>> {
    for extension in EXTENSIONS {
        let candidate = dir.join(format!("{quiz_id}.{extension}"));
        match fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => return Ok(Some(candidate)),
            Ok(_) => continue,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(unavailable(&candidate, err)),
        }
    }
    Ok(None)
}

async fn collect_stems(dir: &Path, ids: &mut BTreeSet<String>) -> CatalogResult<()> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|err| unavailable(dir, err))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| unavailable(dir, err))?
    {
        let path = entry.path();
        let known = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if !known {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            ids.insert(stem.to_string());
        }
    }
    Ok(())
}

fn unavailable(path: &Path, err: std::io::Error) -> CatalogError {
    CatalogError::unavailable(format!("failed to read `{}`", path.display()), err)
}

impl QuizCatalog for FileCatalog {
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
        Box::pin(async move {
            let meta = fs::metadata(catalog.root.as_path())
                .await
                .map_err(|err| unavailable(&catalog.root, err))?;
            if meta.is_dir() {
                Ok(())
            } else {
                Err(CatalogError::unavailable(
                    format!("`{}` is not a directory", catalog.root.display()),
                    std::io::Error::from(ErrorKind::NotADirectory),
                ))
            }
        })
    }
}
