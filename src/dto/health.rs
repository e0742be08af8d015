use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether the quiz catalog answered its probe.
    pub catalog: bool,
    /// Whether the best-record store answered its probe.
    pub records: bool,
}

impl HealthResponse {
    /// Build the response from the probe results; any failed probe means degraded.
    pub fn from_probes(catalog: bool, records: bool) -> Self {
        let status = if catalog && records { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            catalog,
            records,
        }
    }

    /// Whether every probe succeeded.
    pub fn is_ok(&self) -> bool {
        self.catalog && self.records
    }
}
