//! Device-side persistence layer.
//!
//! [`ContentFacade`] presents one contract over two storage tiers: the
//! remote content store reached through [`RemoteContentStore`], and a
//! local [`CacheStore`] bucket per `(owner, kind)` that transparently
//! takes over when the remote store cannot be reached.

/// Local key/value cache implementations.
pub mod cache;
/// Client configuration.
pub mod config;
/// The two-tier persistence façade.
pub mod facade;
/// HTTP client for the remote content store.
pub mod remote;

pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use config::FacadeConfig;
pub use facade::ContentFacade;
pub use remote::{RemoteContentStore, RemoteError, RemoteResult};
