/// Runtime configuration describing where the remote quiz data lives.
#[derive(Debug, Clone)]
pub struct HttpCatalogConfig {
    /// Base URL; `<base_url>/<quiz_id>.json` is fetched.
    pub base_url: String,
}

impl HttpCatalogConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}
