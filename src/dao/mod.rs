/// Content and profile storage operations.
pub mod content_store;
/// Entity definitions shared across storage tiers.
pub mod models;
/// Storage abstraction layer for backend failures.
pub mod storage;
