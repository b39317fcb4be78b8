use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoContentDocument, MongoProfileDocument, doc_id, doc_owner, doc_username},
};
use crate::dao::{
    content_store::ContentStore,
    models::{ContentKind, ContentPatch, ContentRecord, ProfileEntity},
    storage::StorageResult,
};

const PROFILE_COLLECTION_NAME: &str = "users";

/// MongoDB-backed [`ContentStore`] holding one collection per content
/// kind plus the profile collection.
#[derive(Clone)]
pub struct MongoContentStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoContentStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Owner lookups back every list and cascade query, so each content
    /// collection carries an owner index; usernames are unique.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        for kind in ContentKind::ALL {
            let collection =
                database.collection::<mongodb::bson::Document>(kind.collection_name());
            let index = IndexModel::builder()
                .keys(doc! {"owner": 1})
                .options(
                    IndexOptions::builder()
                        .name(Some("owner_idx".to_owned()))
                        .build(),
                )
                .build();

            collection
                .create_index(index)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: kind.collection_name(),
                    index: "owner",
                    source,
                })?;
        }

        let profiles = database.collection::<MongoProfileDocument>(PROFILE_COLLECTION_NAME);
        let username_index = IndexModel::builder()
            .keys(doc! {"username": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("username_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        profiles
            .create_index(username_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PROFILE_COLLECTION_NAME,
                index: "username",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn content_collection(&self, kind: ContentKind) -> Collection<MongoContentDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoContentDocument>(kind.collection_name())
    }

    async fn profile_collection(&self) -> Collection<MongoProfileDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoProfileDocument>(PROFILE_COLLECTION_NAME)
    }

    async fn list(&self, owner: String, kind: ContentKind) -> MongoResult<Vec<ContentRecord>> {
        let collection = self.content_collection(kind).await;

        let documents: Vec<MongoContentDocument> = collection
            .find(doc_owner(&owner))
            .await
            .map_err(|source| MongoDaoError::ListContent {
                kind,
                owner: owner.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListContent { kind, owner, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, kind: ContentKind, record: ContentRecord) -> MongoResult<()> {
        let id = record.id.clone();
        let document: MongoContentDocument = record.into();
        let collection = self.content_collection(kind).await;

        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertContent { kind, id, source })?;

        Ok(())
    }

    /// Read-modify-replace keeps the document model typed end to end;
    /// concurrent writers to the same id resolve last-write-wins.
    async fn update(
        &self,
        kind: ContentKind,
        id: String,
        patch: ContentPatch,
    ) -> MongoResult<bool> {
        let collection = self.content_collection(kind).await;

        let document = collection
            .find_one(doc_id(&id))
            .await
            .map_err(|source| MongoDaoError::UpdateContent {
                kind,
                id: id.clone(),
                source,
            })?;

        let Some(document) = document else {
            return Ok(false);
        };

        let mut record: ContentRecord = document.into();
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(payload) = patch.payload {
            record.payload = payload;
        }

        let replacement: MongoContentDocument = record.into();
        collection
            .replace_one(doc_id(&id), &replacement)
            .await
            .map_err(|source| MongoDaoError::UpdateContent { kind, id, source })?;

        Ok(true)
    }

    async fn delete(&self, kind: ContentKind, id: String) -> MongoResult<bool> {
        let collection = self.content_collection(kind).await;
        let result = collection
            .delete_one(doc_id(&id))
            .await
            .map_err(|source| MongoDaoError::DeleteContent { kind, id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn reassign(
        &self,
        kind: ContentKind,
        old_owner: String,
        new_owner: String,
    ) -> MongoResult<u64> {
        let collection = self.content_collection(kind).await;
        let result = collection
            .update_many(
                doc_owner(&old_owner),
                doc! {"$set": {"owner": &new_owner}},
            )
            .await
            .map_err(|source| MongoDaoError::ReassignOwner {
                kind,
                owner: old_owner,
                source,
            })?;
        Ok(result.modified_count)
    }

    async fn purge(&self, kind: ContentKind, owner: String) -> MongoResult<u64> {
        let collection = self.content_collection(kind).await;
        let result = collection
            .delete_many(doc_owner(&owner))
            .await
            .map_err(|source| MongoDaoError::PurgeOwner { kind, owner, source })?;
        Ok(result.deleted_count)
    }

    async fn find_profile(&self, username: String) -> MongoResult<Option<ProfileEntity>> {
        let collection = self.profile_collection().await;
        let document = collection
            .find_one(doc_username(&username))
            .await
            .map_err(|source| MongoDaoError::Profile {
                operation: "load",
                username,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn upsert_profile(&self, profile: ProfileEntity) -> MongoResult<()> {
        let collection = self.profile_collection().await;
        let username = profile.username.clone();

        let existing = collection
            .find_one(doc_username(&username))
            .await
            .map_err(|source| MongoDaoError::Profile {
                operation: "load",
                username: username.clone(),
                source,
            })?;

        let surrogate_id = existing.map(|doc| doc.id).unwrap_or_else(Uuid::new_v4);
        let document = MongoProfileDocument::from_entity(surrogate_id, profile);

        collection
            .replace_one(doc_username(&username), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Profile {
                operation: "save",
                username,
                source,
            })?;

        Ok(())
    }

    async fn rename_profile(
        &self,
        old_username: String,
        new_username: String,
    ) -> MongoResult<bool> {
        let collection = self.profile_collection().await;
        let result = collection
            .update_one(
                doc_username(&old_username),
                doc! {"$set": {"username": &new_username}},
            )
            .await
            .map_err(|source| MongoDaoError::Profile {
                operation: "rename",
                username: old_username,
                source,
            })?;
        Ok(result.matched_count > 0)
    }

    async fn delete_profile(&self, username: String) -> MongoResult<bool> {
        let collection = self.profile_collection().await;
        let result = collection
            .delete_one(doc_username(&username))
            .await
            .map_err(|source| MongoDaoError::Profile {
                operation: "delete",
                username,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }
}

impl ContentStore for MongoContentStore {
    fn list_content(
        &self,
        owner: String,
        kind: ContentKind,
    ) -> BoxFuture<'static, StorageResult<Vec<ContentRecord>>> {
        let store = self.clone();
        Box::pin(async move { store.list(owner, kind).await.map_err(Into::into) })
    }

    fn insert_content(
        &self,
        kind: ContentKind,
        record: ContentRecord,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert(kind, record).await.map_err(Into::into) })
    }

    fn update_content(
        &self,
        kind: ContentKind,
        id: String,
        patch: ContentPatch,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update(kind, id, patch).await.map_err(Into::into) })
    }

    fn delete_content(
        &self,
        kind: ContentKind,
        id: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete(kind, id).await.map_err(Into::into) })
    }

    fn reassign_owner(
        &self,
        kind: ContentKind,
        old_owner: String,
        new_owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .reassign(kind, old_owner, new_owner)
                .await
                .map_err(Into::into)
        })
    }

    fn purge_owner(
        &self,
        kind: ContentKind,
        owner: String,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.purge(kind, owner).await.map_err(Into::into) })
    }

    fn find_profile(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<ProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_profile(username).await.map_err(Into::into) })
    }

    fn upsert_profile(&self, profile: ProfileEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_profile(profile).await.map_err(Into::into) })
    }

    fn rename_profile(
        &self,
        old_username: String,
        new_username: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .rename_profile(old_username, new_username)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_profile(&self, username: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_profile(username).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
