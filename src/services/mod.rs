/// Quiz catalog listing.
pub mod catalog_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Best-record lookups and updates.
pub mod record_service;
/// Session lifecycle: open, guess, inspect, leave.
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
