//! Error types for the MongoDB storage implementation.

use mongodb::error::Error as MongoError;
use thiserror::Error;

use crate::dao::{models::ContentKind, storage::StorageError};

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// The connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Offending URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The client could not be built from the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The initial ping never succeeded.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Driver error of the last attempt.
        #[source]
        source: MongoError,
    },
    /// A health-check ping failed on an established connection.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An index could not be created.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Target collection.
        collection: &'static str,
        /// Index keys description.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A content record could not be inserted.
    #[error("failed to insert {kind} record `{id}`")]
    InsertContent {
        /// Content kind.
        kind: ContentKind,
        /// Record identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An owner-scoped listing failed.
    #[error("failed to list {kind} records for owner `{owner}`")]
    ListContent {
        /// Content kind.
        kind: ContentKind,
        /// Owner username.
        owner: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A record update failed.
    #[error("failed to update {kind} record `{id}`")]
    UpdateContent {
        /// Content kind.
        kind: ContentKind,
        /// Record identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A record deletion failed.
    #[error("failed to delete {kind} record `{id}`")]
    DeleteContent {
        /// Content kind.
        kind: ContentKind,
        /// Record identifier.
        id: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An owner-rename cascade step failed.
    #[error("failed to reassign {kind} records from owner `{owner}`")]
    ReassignOwner {
        /// Content kind.
        kind: ContentKind,
        /// Previous owner username.
        owner: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An owner-delete cascade step failed.
    #[error("failed to purge {kind} records of owner `{owner}`")]
    PurgeOwner {
        /// Content kind.
        kind: ContentKind,
        /// Owner username.
        owner: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A profile operation failed.
    #[error("failed to {operation} profile `{username}`")]
    Profile {
        /// Short verb describing the attempted operation.
        operation: &'static str,
        /// Profile username.
        username: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable("MongoDB operation failed", err)
    }
}
