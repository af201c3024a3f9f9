/// OpenAPI documentation generation.
pub mod documentation;
/// Score-entry orchestration: record, undo, finish.
pub mod entry_service;
/// Health check service.
pub mod health_service;
/// Round CRUD operations with owner enforcement.
pub mod round_service;
/// Read-side statistics aggregation.
pub mod stats_service;
