/// In-memory backend used by tests and backend-less development runs.
pub mod memory;
#[cfg(feature = "mongo-store")]
/// MongoDB backend.
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::{
    models::{ContentKind, ContentPatch, ContentRecord, ProfileEntity},
    storage::StorageResult,
};

/// Abstraction over the authoritative persistence layer for user content
/// and owner profiles.
///
/// Per-record operations address a single `(kind, id)`; the owner-scoped
/// cascade operations (`reassign_owner`, `purge_owner`) back the identity
/// rename/delete flows and are issued once per kind, in sequence, by the
/// service layer. No method performs an ownership check on update or
/// delete.
pub trait ContentStore: Send + Sync {
    /// All records of `kind` owned by `owner`, in store-native order.
    fn list_content(
        &self,
        owner: String,
        kind: ContentKind,
    ) -> BoxFuture<'static, StorageResult<Vec<ContentRecord>>>;
    /// Persist a fully-built record under its kind.
    fn insert_content(
        &self,
        kind: ContentKind,
        record: ContentRecord,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Apply a partial update to the record matching `id`. Returns whether
    /// a record matched; an unmatched id is not an error.
    fn update_content(
        &self,
        kind: ContentKind,
        id: String,
        patch: ContentPatch,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove the record matching `id`. Returns whether a record matched.
    fn delete_content(
        &self,
        kind: ContentKind,
        id: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Rewrite the owner field of every record of `kind` owned by
    /// `old_owner`. Returns the number of records touched.
    fn reassign_owner(
        &self,
        kind: ContentKind,
        old_owner: String,
        new_owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    /// Delete every record of `kind` owned by `owner`. Returns the number
    /// of records removed.
    fn purge_owner(
        &self,
        kind: ContentKind,
        owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    /// Look up the profile backing an owner identity.
    fn find_profile(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<ProfileEntity>>>;
    /// Create or replace the profile keyed by its username.
    fn upsert_profile(
        &self,
        profile: ProfileEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Move a profile to a new username. Returns whether a profile
    /// matched; renaming an absent profile is not an error.
    fn rename_profile(
        &self,
        old_username: String,
        new_username: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove the profile record. Returns whether a profile matched.
    fn delete_profile(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Cheap liveness probe against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
