use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{ContentPayload, ContentRecord, ProfileEntity};

/// Stored form of a content record.
///
/// Record identifiers are normalized to strings at the model boundary, so
/// the document keys on the string form directly instead of a native id
/// type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoContentDocument {
    #[serde(rename = "_id")]
    id: String,
    owner: String,
    title: String,
    created_at: DateTime,
    #[serde(flatten)]
    payload: ContentPayload,
}

impl From<ContentRecord> for MongoContentDocument {
    fn from(value: ContentRecord) -> Self {
        Self {
            id: value.id,
            owner: value.owner,
            title: value.title,
            created_at: DateTime::from_system_time(value.created_at),
            payload: value.payload,
        }
    }
}

impl From<MongoContentDocument> for ContentRecord {
    fn from(value: MongoContentDocument) -> Self {
        Self {
            id: value.id,
            owner: value.owner,
            title: value.title,
            created_at: value.created_at.to_system_time(),
            payload: value.payload,
        }
    }
}

/// Stored form of a profile. The username carries a unique index and is
/// the lookup key; the surrogate `_id` survives renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoProfileDocument {
    #[serde(rename = "_id")]
    pub(super) id: Uuid,
    pub(super) username: String,
    pub(super) email: String,
    pub(super) avatar_id: u32,
    pub(super) created_at: DateTime,
}

impl MongoProfileDocument {
    pub(super) fn from_entity(id: Uuid, profile: ProfileEntity) -> Self {
        Self {
            id,
            username: profile.username,
            email: profile.email,
            avatar_id: profile.avatar_id,
            created_at: DateTime::from_system_time(profile.created_at),
        }
    }
}

impl From<MongoProfileDocument> for ProfileEntity {
    fn from(value: MongoProfileDocument) -> Self {
        Self {
            username: value.username,
            email: value.email,
            avatar_id: value.avatar_id,
            created_at: value.created_at.to_system_time(),
        }
    }
}

pub(super) fn doc_id(id: &str) -> Document {
    doc! {"_id": id}
}

pub(super) fn doc_owner(owner: &str) -> Document {
    doc! {"owner": owner}
}

pub(super) fn doc_username(username: &str) -> Document {
    doc! {"username": username}
}
