use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::{debug, warn};

use crate::dao::models::{ContentDraft, ContentKind, ContentPatch, ContentRecord};

use super::{cache::CacheStore, remote::RemoteContentStore};

/// Prefix marking identifiers assigned by the fallback path.
const LOCAL_ID_PREFIX: &str = "local-";

/// True when `id` was assigned by the local fallback path rather than the
/// remote store.
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

/// Identifier for a record created while the remote store is
/// unreachable: creation time in milliseconds plus a random suffix so two
/// records synthesized in the same millisecond stay distinct.
fn local_record_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix = rand::random::<u64>() & 0xffff_ffff_ffff;
    format!("{LOCAL_ID_PREFIX}{millis}-{suffix:012x}")
}

fn bucket_key(owner: &str, kind: ContentKind) -> String {
    format!("content::{owner}::{}", kind.path_segment())
}

/// One persistence interface over two storage tiers.
///
/// Every operation tries the remote store first and exactly once — no
/// retries, no queued replays. `list`, `save` and `delete` redirect a
/// failed attempt to the injected cache; callers see the same result
/// shape no matter which tier served them and never receive an error.
/// `update` has no fallback: a failed update is logged and dropped.
pub struct ContentFacade {
    remote: RemoteContentStore,
    cache: Arc<dyn CacheStore>,
}

impl ContentFacade {
    /// Build a façade over a remote client and an injected local cache.
    pub fn new(remote: RemoteContentStore, cache: Arc<dyn CacheStore>) -> Self {
        Self { remote, cache }
    }

    /// Handle to the underlying remote client, for the operations that
    /// deliberately have no fallback (identity management).
    pub fn remote(&self) -> &RemoteContentStore {
        &self.remote
    }

    /// List the owner's records of one kind. Serves the local bucket when
    /// the remote store cannot; an absent bucket is an empty list.
    pub async fn list(&self, owner: &str, kind: ContentKind) -> Vec<ContentRecord> {
        match self.remote.list_content(owner, kind).await {
            Ok(records) => records,
            Err(err) => {
                debug!(%owner, %kind, error = %err, "remote list failed; serving local cache");
                self.read_bucket(owner, kind)
            }
        }
    }

    /// Save a draft under the owner. On remote failure the record is
    /// synthesized locally with a `local-…` identifier and appended to
    /// the owner's bucket.
    pub async fn save(&self, owner: &str, draft: ContentDraft) -> ContentRecord {
        let kind = draft.payload.kind();
        match self.remote.create_content(owner, &draft).await {
            Ok(record) => record,
            Err(err) => {
                warn!(%owner, %kind, error = %err, "remote save failed; writing to local cache");
                let record = ContentRecord {
                    id: local_record_id(),
                    owner: owner.to_owned(),
                    title: draft.title,
                    created_at: SystemTime::now(),
                    payload: draft.payload,
                };

                let mut bucket = self.read_bucket(owner, kind);
                bucket.push(record.clone());
                self.write_bucket(owner, kind, &bucket);
                record
            }
        }
    }

    /// Update the record matching `id`. There is no fallback tier for
    /// updates: a failed attempt is dropped without touching the cache.
    pub async fn update(&self, kind: ContentKind, id: &str, patch: ContentPatch) {
        if let Err(err) = self.remote.update_content(kind, id, &patch).await {
            debug!(%kind, %id, error = %err, "remote update failed; change dropped");
        }
    }

    /// Delete the record matching `id`. On remote failure any bucket
    /// entry with that id is removed instead; a record that exists only
    /// remotely stays there until the store is reachable again.
    pub async fn delete(&self, owner: &str, kind: ContentKind, id: &str) {
        if let Err(err) = self.remote.delete_content(owner, kind, id).await {
            debug!(%owner, %kind, %id, error = %err, "remote delete failed; removing from local cache");
            let mut bucket = self.read_bucket(owner, kind);
            let before = bucket.len();
            bucket.retain(|record| record.id != id);
            if bucket.len() < before {
                if bucket.is_empty() {
                    self.cache.remove(&bucket_key(owner, kind));
                } else {
                    self.write_bucket(owner, kind, &bucket);
                }
            }
        }
    }

    fn read_bucket(&self, owner: &str, kind: ContentKind) -> Vec<ContentRecord> {
        let Some(raw) = self.cache.get(&bucket_key(owner, kind)) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(%owner, %kind, error = %err, "unreadable cache bucket; treating as empty");
                Vec::new()
            }
        }
    }

    fn write_bucket(&self, owner: &str, kind: ContentKind, records: &[ContentRecord]) {
        match serde_json::to_string(records) {
            Ok(raw) => self.cache.put(&bucket_key(owner, kind), raw),
            Err(err) => warn!(%owner, %kind, error = %err, "failed to encode cache bucket"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, time::Duration};

    use uuid::Uuid;

    use super::*;
    use crate::{
        client::{
            cache::MemoryCacheStore,
            config::FacadeConfig,
        },
        dao::{
            content_store::memory::MemoryContentStore,
            models::ContentPayload,
        },
        dto::profile::UpsertProfileRequest,
        routes,
        state::AppState,
    };

    /// Serve the real router over the memory store on an ephemeral port.
    async fn spawn_server() -> (MemoryContentStore, String) {
        let state = AppState::new();
        let store = MemoryContentStore::new();
        state.install_content_store(Arc::new(store.clone())).await;

        let router = routes::router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .unwrap();
        });

        (store, format!("http://{addr}/api"))
    }

    fn facade(base_url: &str) -> (ContentFacade, Arc<MemoryCacheStore>) {
        let cache = Arc::new(MemoryCacheStore::new());
        let config = FacadeConfig::new(base_url).with_timeout(Duration::from_secs(2));
        let remote = RemoteContentStore::new(config).unwrap();
        (ContentFacade::new(remote, cache.clone()), cache)
    }

    fn wheel_draft(title: &str) -> ContentDraft {
        ContentDraft {
            title: title.into(),
            payload: ContentPayload::Wheel {
                questions: vec!["Q1".into(), "Q2".into()],
                target_count: 8,
            },
        }
    }

    #[tokio::test]
    async fn save_through_remote_returns_server_assigned_record() {
        let (_store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let record = facade.save("alice", wheel_draft("Party Mix")).await;

        assert!(Uuid::parse_str(&record.id).is_ok());
        assert!(!is_local_id(&record.id));
        assert_eq!(record.owner, "alice");
        assert_eq!(record.title, "Party Mix");
        assert_eq!(
            record.payload,
            ContentPayload::Wheel {
                questions: vec!["Q1".into(), "Q2".into()],
                target_count: 8
            }
        );

        let listed = facade.list("alice", ContentKind::Wheel).await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn save_falls_back_when_remote_rejects() {
        let (store, base_url) = spawn_server().await;
        let (facade, cache) = facade(&base_url);
        store.set_available(false);

        let record = facade.save("alice", wheel_draft("Offline Mix")).await;

        assert!(is_local_id(&record.id));
        assert_eq!(record.owner, "alice");

        // The record landed in the (owner, kind) bucket…
        let bucket = cache.get("content::alice::wheels").expect("bucket written");
        assert!(bucket.contains(&record.id));

        // …and a listing with the remote still down serves that exact record.
        let listed = facade.list("alice", ContentKind::Wheel).await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn save_falls_back_when_remote_is_unreachable() {
        // Nothing listens here; the connection itself fails.
        let (facade, _cache) = facade("http://127.0.0.1:9/api");

        let record = facade.save("alice", wheel_draft("No Server")).await;
        assert!(is_local_id(&record.id));

        let listed = facade.list("alice", ContentKind::Wheel).await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn fallback_ids_stay_unique_within_a_burst() {
        let (facade, _cache) = facade("http://127.0.0.1:9/api");

        let mut ids = HashSet::new();
        for index in 0..64 {
            let record = facade.save("alice", wheel_draft(&format!("w{index}"))).await;
            assert!(is_local_id(&record.id));
            assert!(ids.insert(record.id), "duplicate fallback id");
        }
    }

    #[tokio::test]
    async fn list_is_empty_when_both_tiers_are_empty() {
        let (facade, _cache) = facade("http://127.0.0.1:9/api");
        assert!(facade.list("alice", ContentKind::SurveyList).await.is_empty());
    }

    #[tokio::test]
    async fn update_works_when_remote_is_reachable() {
        let (_store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let record = facade.save("alice", wheel_draft("Before")).await;
        facade
            .update(
                ContentKind::Wheel,
                &record.id,
                ContentPatch {
                    title: Some("After".into()),
                    payload: None,
                },
            )
            .await;

        let listed = facade.list("alice", ContentKind::Wheel).await;
        assert_eq!(listed[0].title, "After");
        assert_eq!(listed[0].payload, record.payload);
    }

    #[tokio::test]
    async fn update_is_silently_dropped_while_remote_is_down() {
        let (store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let record = facade.save("alice", wheel_draft("Original")).await;

        store.set_available(false);
        facade
            .update(
                ContentKind::Wheel,
                &record.id,
                ContentPatch {
                    title: Some("Lost".into()),
                    payload: None,
                },
            )
            .await;

        // Remote restored: the record is unchanged from before the update.
        store.set_available(true);
        let listed = facade.list("alice", ContentKind::Wheel).await;
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn delete_falls_back_to_the_cache_bucket() {
        let (facade, cache) = facade("http://127.0.0.1:9/api");

        let kept = facade.save("alice", wheel_draft("Keep")).await;
        let doomed = facade.save("alice", wheel_draft("Remove")).await;

        facade.delete("alice", ContentKind::Wheel, &doomed.id).await;

        let bucket = cache.get("content::alice::wheels").expect("bucket kept");
        assert!(!bucket.contains(&doomed.id));
        assert_eq!(facade.list("alice", ContentKind::Wheel).await, vec![kept]);
    }

    #[tokio::test]
    async fn deleting_the_last_cached_record_drops_the_bucket() {
        let (facade, cache) = facade("http://127.0.0.1:9/api");

        let only = facade.save("alice", wheel_draft("Only")).await;
        assert!(cache.get("content::alice::wheels").is_some());

        facade.delete("alice", ContentKind::Wheel, &only.id).await;

        assert!(cache.get("content::alice::wheels").is_none());
        assert!(facade.list("alice", ContentKind::Wheel).await.is_empty());
    }

    #[tokio::test]
    async fn delete_through_remote_removes_the_record() {
        let (_store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let record = facade.save("alice", wheel_draft("Short-lived")).await;
        facade.delete("alice", ContentKind::Wheel, &record.id).await;

        assert!(facade.list("alice", ContentKind::Wheel).await.is_empty());
    }

    #[tokio::test]
    async fn rename_cascade_is_visible_through_the_facade() {
        let (_store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let record = facade.save("alice", wheel_draft("Mine")).await;
        facade.remote().rename_owner("alice", "alicia").await.unwrap();

        let migrated = facade.list("alicia", ContentKind::Wheel).await;
        assert_eq!(migrated.len(), 1);
        assert_eq!(migrated[0].id, record.id);
        assert_eq!(migrated[0].owner, "alicia");
        assert!(facade.list("alice", ContentKind::Wheel).await.is_empty());
    }

    #[tokio::test]
    async fn rename_does_not_migrate_cache_buckets() {
        let (store, base_url) = spawn_server().await;
        let (facade, cache) = facade(&base_url);

        // Content cached under the old identity while offline…
        store.set_available(false);
        facade.save("alice", wheel_draft("Stranded")).await;
        store.set_available(true);

        facade.remote().rename_owner("alice", "alicia").await.unwrap();

        // …stays keyed by the old identity: invisible to the new one.
        assert!(cache.get("content::alice::wheels").is_some());
        assert!(cache.get("content::alicia::wheels").is_none());
        assert!(facade.list("alicia", ContentKind::Wheel).await.is_empty());
    }

    #[tokio::test]
    async fn profile_round_trips_through_the_remote_client() {
        let (_store, base_url) = spawn_server().await;
        let (facade, _cache) = facade(&base_url);

        let stored = facade
            .remote()
            .upsert_profile(
                "alice",
                &UpsertProfileRequest {
                    email: "alice@example.com".into(),
                    avatar_id: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(stored.username, "alice");

        let fetched = facade.remote().fetch_profile("alice").await.unwrap();
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.avatar_id, 2);

        facade.remote().delete_owner("alice").await.unwrap();
        assert!(facade.remote().fetch_profile("alice").await.is_err());
    }

    #[test]
    fn local_ids_carry_the_marker_prefix() {
        let id = local_record_id();
        assert!(is_local_id(&id));
        assert!(!is_local_id("550e8400-e29b-41d4-a716-446655440000"));
    }
}
