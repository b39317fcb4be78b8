use std::time::SystemTime;

use tracing::debug;
use uuid::Uuid;

use crate::{
    dao::models::{ContentDraft, ContentKind, ContentPatch, ContentRecord},
    error::ServiceError,
    state::SharedState,
};

/// All records of `kind` owned by `owner`, in store-native order.
pub async fn list_content(
    state: &SharedState,
    owner: String,
    kind: ContentKind,
) -> Result<Vec<ContentRecord>, ServiceError> {
    let store = state.require_content_store().await?;
    Ok(store.list_content(owner, kind).await?)
}

/// Create a record from a draft: the store assigns the identifier (a
/// UUIDv4 string) and stamps the creation time. Titles are stored as
/// given, empty or not.
pub async fn create_content(
    state: &SharedState,
    owner: String,
    kind: ContentKind,
    draft: ContentDraft,
) -> Result<ContentRecord, ServiceError> {
    if draft.payload.kind() != kind {
        return Err(ServiceError::InvalidInput(format!(
            "payload kind `{}` does not match route kind `{}`",
            draft.payload.kind(),
            kind
        )));
    }

    let store = state.require_content_store().await?;
    let record = ContentRecord {
        id: Uuid::new_v4().to_string(),
        owner,
        title: draft.title,
        created_at: SystemTime::now(),
        payload: draft.payload,
    };

    store.insert_content(kind, record.clone()).await?;
    Ok(record)
}

/// Apply a partial update to the record matching `id`. No ownership check
/// is performed, and an unmatched id is a success no-op.
pub async fn update_content(
    state: &SharedState,
    kind: ContentKind,
    id: String,
    patch: ContentPatch,
) -> Result<(), ServiceError> {
    let store = state.require_content_store().await?;
    let matched = store.update_content(kind, id.clone(), patch).await?;
    if !matched {
        debug!(%kind, %id, "update matched no record");
    }
    Ok(())
}

/// Delete the record matching `id`. The owner given by the caller is not
/// checked against the record's actual owner.
pub async fn delete_content(
    state: &SharedState,
    owner: String,
    id: String,
    kind: ContentKind,
) -> Result<(), ServiceError> {
    let store = state.require_content_store().await?;
    let matched = store.delete_content(kind, id.clone()).await?;
    if !matched {
        debug!(%kind, %id, %owner, "delete matched no record");
    }
    Ok(())
}
