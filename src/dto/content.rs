use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dao::models::{ContentPayload, ContentRecord},
    dto::{format_system_time, parse_system_time},
};

/// Wire representation of a content record; `created_at` travels as an
/// RFC 3339 string regardless of which tier produced the record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentRecordDto {
    /// String identifier, whichever tier assigned it.
    pub id: String,
    /// Owning username.
    pub owner: String,
    /// User-supplied label.
    pub title: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Kind-specific body with its `kind` tag.
    #[serde(flatten)]
    pub payload: ContentPayload,
}

impl From<ContentRecord> for ContentRecordDto {
    fn from(record: ContentRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner,
            title: record.title,
            created_at: format_system_time(record.created_at),
            payload: record.payload,
        }
    }
}

impl TryFrom<ContentRecordDto> for ContentRecord {
    type Error = time::error::Parse;

    fn try_from(dto: ContentRecordDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            owner: dto.owner,
            title: dto.title,
            created_at: parse_system_time(&dto.created_at)?,
            payload: dto.payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::dao::models::ContentKind;

    #[test]
    fn record_round_trips_through_dto() {
        let record = ContentRecord {
            id: "local-123-abc".into(),
            owner: "alice".into(),
            title: "".into(),
            created_at: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            payload: ContentPayload::PromptList {
                prompts: vec!["never have I ever".into()],
            },
        };

        let dto = ContentRecordDto::from(record.clone());
        let back = ContentRecord::try_from(dto).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn dto_serializes_flat_with_kind_tag() {
        let record = ContentRecord {
            id: "abc".into(),
            owner: "alice".into(),
            title: "Party Mix".into(),
            created_at: UNIX_EPOCH,
            payload: ContentPayload::Wheel {
                questions: vec!["Q1".into()],
                target_count: 6,
            },
        };

        let json = serde_json::to_value(ContentRecordDto::from(record)).unwrap();
        assert_eq!(json["kind"], "wheel");
        assert_eq!(json["target_count"], 6);
        assert_eq!(json["title"], "Party Mix");
        assert_eq!(
            serde_json::from_value::<ContentRecordDto>(json)
                .unwrap()
                .payload
                .kind(),
            ContentKind::Wheel
        );
    }
}
