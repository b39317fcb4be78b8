//! Party Zone backend: resilient persistence for user-created party-game
//! content (wheel sets, survey lists, prompt lists), plus the device-side
//! façade that falls back to a local cache when the store is unreachable.

/// Device-side persistence façade and its tiers.
pub mod client;
/// Storage backends and entity models.
pub mod dao;
/// Wire types shared by server and client.
pub mod dto;
/// Service and application error types.
pub mod error;
/// REST route trees.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
