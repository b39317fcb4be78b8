/// Content CRUD operations backing the REST routes.
pub mod content_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Ownership registry: profile management and identity cascades.
pub mod profile_service;
/// Storage connection supervisor.
pub mod storage_supervisor;
