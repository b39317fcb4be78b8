use std::time::SystemTime;

use tracing::{debug, info};

use crate::{
    dao::models::{ContentKind, ProfileEntity},
    dto::profile::UpsertProfileRequest,
    error::ServiceError,
    state::SharedState,
};

/// Look up the profile backing an owner identity.
pub async fn fetch_profile(
    state: &SharedState,
    username: String,
) -> Result<ProfileEntity, ServiceError> {
    let store = state.require_content_store().await?;
    store
        .find_profile(username.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("profile `{username}` not found")))
}

/// Create or replace the profile keyed by its username. The creation
/// timestamp of an existing profile survives the replacement.
pub async fn upsert_profile(
    state: &SharedState,
    username: String,
    request: UpsertProfileRequest,
) -> Result<ProfileEntity, ServiceError> {
    let store = state.require_content_store().await?;

    let existing = store.find_profile(username.clone()).await?;
    let profile = ProfileEntity {
        username,
        email: request.email,
        avatar_id: request.avatar_id,
        created_at: existing
            .map(|profile| profile.created_at)
            .unwrap_or_else(SystemTime::now),
    };

    store.upsert_profile(profile.clone()).await?;
    Ok(profile)
}

/// Rename an owner identity and migrate every content record it owns.
///
/// The profile moves first, then each content kind in cascade order as an
/// independent update-many. A failing step propagates after the earlier
/// steps have already been applied; the resulting window where some
/// records still carry the old owner is accepted and not rolled back.
pub async fn rename_owner(
    state: &SharedState,
    old_username: String,
    new_username: String,
) -> Result<(), ServiceError> {
    let store = state.require_content_store().await?;

    let renamed = store
        .rename_profile(old_username.clone(), new_username.clone())
        .await?;
    if !renamed {
        debug!(%old_username, "no profile record to rename; cascading anyway");
    }

    for kind in ContentKind::ALL {
        let moved = store
            .reassign_owner(kind, old_username.clone(), new_username.clone())
            .await?;
        info!(%kind, moved, %old_username, %new_username, "reassigned records to renamed owner");
    }

    Ok(())
}

/// Delete an owner identity and every content record it owns. Same
/// step-by-step cascade and same no-rollback caveat as a rename.
pub async fn delete_owner(state: &SharedState, username: String) -> Result<(), ServiceError> {
    let store = state.require_content_store().await?;

    let deleted = store.delete_profile(username.clone()).await?;
    if !deleted {
        debug!(%username, "no profile record to delete; cascading anyway");
    }

    for kind in ContentKind::ALL {
        let purged = store.purge_owner(kind, username.clone()).await?;
        info!(%kind, purged, %username, "purged records of deleted owner");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::{
        content_store::{ContentStore, memory::MemoryContentStore},
        models::{ContentPayload, ContentRecord},
    };
    use crate::state::AppState;

    async fn state_with_store() -> (SharedState, MemoryContentStore) {
        let state = AppState::new();
        let store = MemoryContentStore::new();
        state.install_content_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn record(kind: ContentKind, id: &str, owner: &str) -> ContentRecord {
        let payload = match kind {
            ContentKind::Wheel => ContentPayload::Wheel {
                questions: vec!["Q1".into()],
                target_count: 8,
            },
            ContentKind::SurveyList => ContentPayload::SurveyList { surveys: vec![] },
            ContentKind::PromptList => ContentPayload::PromptList {
                prompts: vec!["never".into()],
            },
        };
        ContentRecord {
            id: id.into(),
            owner: owner.into(),
            title: format!("{id} title"),
            created_at: SystemTime::now(),
            payload,
        }
    }

    async fn seed_owner(store: &MemoryContentStore, owner: &str) {
        for kind in ContentKind::ALL {
            for index in 0..2 {
                store
                    .insert_content(kind, record(kind, &format!("{owner}-{kind}-{index}"), owner))
                    .await
                    .unwrap();
            }
        }
    }

    #[tokio::test]
    async fn rename_migrates_every_kind_and_empties_the_old_identity() {
        let (state, store) = state_with_store().await;
        seed_owner(&store, "alice").await;
        seed_owner(&store, "bob").await;

        rename_owner(&state, "alice".into(), "alicia".into())
            .await
            .unwrap();

        for kind in ContentKind::ALL {
            let migrated = store.list_content("alicia".into(), kind).await.unwrap();
            assert_eq!(migrated.len(), 2, "all {kind} records follow the rename");
            assert!(migrated.iter().all(|record| record.owner == "alicia"));
            assert!(
                store
                    .list_content("alice".into(), kind)
                    .await
                    .unwrap()
                    .is_empty()
            );
            // Unrelated owners are untouched.
            assert_eq!(store.list_content("bob".into(), kind).await.unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn rename_moves_the_profile_record() {
        let (state, store) = state_with_store().await;
        upsert_profile(
            &state,
            "alice".into(),
            UpsertProfileRequest {
                email: "alice@example.com".into(),
                avatar_id: 3,
            },
        )
        .await
        .unwrap();

        rename_owner(&state, "alice".into(), "alicia".into())
            .await
            .unwrap();

        assert!(store.find_profile("alice".into()).await.unwrap().is_none());
        let moved = store
            .find_profile("alicia".into())
            .await
            .unwrap()
            .expect("profile follows the rename");
        assert_eq!(moved.email, "alice@example.com");
        assert_eq!(moved.avatar_id, 3);
    }

    #[tokio::test]
    async fn rename_without_profile_still_cascades_content() {
        let (state, store) = state_with_store().await;
        seed_owner(&store, "ghost").await;

        rename_owner(&state, "ghost".into(), "spirit".into())
            .await
            .unwrap();

        for kind in ContentKind::ALL {
            assert_eq!(
                store.list_content("spirit".into(), kind).await.unwrap().len(),
                2
            );
        }
    }

    #[tokio::test]
    async fn delete_owner_removes_content_of_every_kind() {
        let (state, store) = state_with_store().await;
        seed_owner(&store, "alice").await;
        seed_owner(&store, "bob").await;
        upsert_profile(
            &state,
            "alice".into(),
            UpsertProfileRequest {
                email: "alice@example.com".into(),
                avatar_id: 0,
            },
        )
        .await
        .unwrap();

        delete_owner(&state, "alice".into()).await.unwrap();

        assert!(store.find_profile("alice".into()).await.unwrap().is_none());
        for kind in ContentKind::ALL {
            assert!(
                store
                    .list_content("alice".into(), kind)
                    .await
                    .unwrap()
                    .is_empty()
            );
            assert_eq!(store.list_content("bob".into(), kind).await.unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn upsert_keeps_the_original_creation_time() {
        let (state, store) = state_with_store().await;
        let first = upsert_profile(
            &state,
            "alice".into(),
            UpsertProfileRequest {
                email: "old@example.com".into(),
                avatar_id: 0,
            },
        )
        .await
        .unwrap();

        let second = upsert_profile(
            &state,
            "alice".into(),
            UpsertProfileRequest {
                email: "new@example.com".into(),
                avatar_id: 5,
            },
        )
        .await
        .unwrap();

        assert_eq!(second.created_at, first.created_at);
        let stored = store.find_profile("alice".into()).await.unwrap().unwrap();
        assert_eq!(stored.email, "new@example.com");
    }
}
