use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the catalog and the record store, logging whichever fails.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let catalog = match state.catalog().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "catalog health check failed");
            false
        }
    };

    let records = match state.records().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "record store health check failed");
            false
        }
    };

    HealthResponse::from_probes(catalog, records)
}
