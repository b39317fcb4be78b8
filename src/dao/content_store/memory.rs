use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::dao::{
    content_store::ContentStore,
    models::{ContentKind, ContentPatch, ContentRecord, ProfileEntity},
    storage::{StorageError, StorageResult},
};

/// Error used as the source of [`StorageError`] when the store has been
/// switched offline.
#[derive(Debug, Error)]
#[error("in-memory store switched offline")]
struct StoreOffline;

/// In-memory [`ContentStore`] keeping records in insertion order.
///
/// Backs the test harness and backend-less development runs. The
/// availability toggle makes every operation fail with
/// [`StorageError::Unavailable`], which is how tests simulate a remote
/// outage end to end.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    content: RwLock<HashMap<ContentKind, Vec<ContentRecord>>>,
    profiles: RwLock<HashMap<String, ProfileEntity>>,
    offline: AtomicBool,
}

impl MemoryContentStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip availability; while unavailable every operation errors.
    pub fn set_available(&self, available: bool) {
        self.inner.offline.store(!available, Ordering::SeqCst);
    }

    fn guard(&self) -> StorageResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            Err(StorageError::unavailable("in-memory store offline", StoreOffline))
        } else {
            Ok(())
        }
    }

    async fn list(&self, owner: String, kind: ContentKind) -> StorageResult<Vec<ContentRecord>> {
        self.guard()?;
        let content = self.inner.content.read().await;
        Ok(content
            .get(&kind)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| record.owner == owner)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, kind: ContentKind, record: ContentRecord) -> StorageResult<()> {
        self.guard()?;
        let mut content = self.inner.content.write().await;
        content.entry(kind).or_default().push(record);
        Ok(())
    }

    async fn update(
        &self,
        kind: ContentKind,
        id: String,
        patch: ContentPatch,
    ) -> StorageResult<bool> {
        self.guard()?;
        let mut content = self.inner.content.write().await;
        let Some(record) = content
            .get_mut(&kind)
            .and_then(|records| records.iter_mut().find(|record| record.id == id))
        else {
            return Ok(false);
        };

        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(payload) = patch.payload {
            record.payload = payload;
        }
        Ok(true)
    }

    async fn delete(&self, kind: ContentKind, id: String) -> StorageResult<bool> {
        self.guard()?;
        let mut content = self.inner.content.write().await;
        let Some(records) = content.get_mut(&kind) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }

    async fn reassign(
        &self,
        kind: ContentKind,
        old_owner: String,
        new_owner: String,
    ) -> StorageResult<u64> {
        self.guard()?;
        let mut content = self.inner.content.write().await;
        let mut touched = 0;
        if let Some(records) = content.get_mut(&kind) {
            for record in records.iter_mut().filter(|record| record.owner == old_owner) {
                record.owner = new_owner.clone();
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn purge(&self, kind: ContentKind, owner: String) -> StorageResult<u64> {
        self.guard()?;
        let mut content = self.inner.content.write().await;
        let Some(records) = content.get_mut(&kind) else {
            return Ok(0);
        };
        let before = records.len();
        records.retain(|record| record.owner != owner);
        Ok((before - records.len()) as u64)
    }
}

impl ContentStore for MemoryContentStore {
    fn list_content(
        &self,
        owner: String,
        kind: ContentKind,
    ) -> BoxFuture<'static, StorageResult<Vec<ContentRecord>>> {
        let store = self.clone();
        Box::pin(async move { store.list(owner, kind).await })
    }

    fn insert_content(
        &self,
        kind: ContentKind,
        record: ContentRecord,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert(kind, record).await })
    }

    fn update_content(
        &self,
        kind: ContentKind,
        id: String,
        patch: ContentPatch,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update(kind, id, patch).await })
    }

    fn delete_content(
        &self,
        kind: ContentKind,
        id: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete(kind, id).await })
    }

    fn reassign_owner(
        &self,
        kind: ContentKind,
        old_owner: String,
        new_owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.reassign(kind, old_owner, new_owner).await })
    }

    fn purge_owner(
        &self,
        kind: ContentKind,
        owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.purge(kind, owner).await })
    }

    fn find_profile(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<ProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.guard()?;
            let profiles = store.inner.profiles.read().await;
            Ok(profiles.get(&username).cloned())
        })
    }

    fn upsert_profile(&self, profile: ProfileEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.guard()?;
            let mut profiles = store.inner.profiles.write().await;
            profiles.insert(profile.username.clone(), profile);
            Ok(())
        })
    }

    fn rename_profile(
        &self,
        old_username: String,
        new_username: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store.guard()?;
            let mut profiles = store.inner.profiles.write().await;
            let Some(mut profile) = profiles.remove(&old_username) else {
                return Ok(false);
            };
            profile.username = new_username.clone();
            profiles.insert(new_username, profile);
            Ok(true)
        })
    }

    fn delete_profile(&self, username: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store.guard()?;
            let mut profiles = store.inner.profiles.write().await;
            Ok(profiles.remove(&username).is_some())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.guard() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.guard() })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::ContentPayload;

    fn wheel(id: &str, owner: &str, title: &str) -> ContentRecord {
        ContentRecord {
            id: id.into(),
            owner: owner.into(),
            title: title.into(),
            created_at: SystemTime::now(),
            payload: ContentPayload::Wheel {
                questions: vec!["Q1".into()],
                target_count: 8,
            },
        }
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_kind() {
        let store = MemoryContentStore::new();
        store
            .insert_content(ContentKind::Wheel, wheel("a", "alice", "A"))
            .await
            .unwrap();
        store
            .insert_content(ContentKind::Wheel, wheel("b", "bob", "B"))
            .await
            .unwrap();

        let listed = store
            .list_content("alice".into(), ContentKind::Wheel)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "a");
        assert!(
            store
                .list_content("alice".into(), ContentKind::PromptList)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_no_match() {
        let store = MemoryContentStore::new();
        let matched = store
            .update_content(
                ContentKind::Wheel,
                "missing".into(),
                ContentPatch {
                    title: Some("new".into()),
                    payload: None,
                },
            )
            .await
            .unwrap();
        assert!(!matched);
    }

    #[tokio::test]
    async fn offline_toggle_fails_every_operation() {
        let store = MemoryContentStore::new();
        store.set_available(false);
        assert!(store.health_check().await.is_err());
        assert!(
            store
                .list_content("alice".into(), ContentKind::Wheel)
                .await
                .is_err()
        );

        store.set_available(true);
        assert!(store.health_check().await.is_ok());
    }
}
