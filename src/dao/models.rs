use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The three kinds of user-created content the store manages.
///
/// The serde names double as the REST path segment for the kind, so the
/// same value deserializes straight out of a route capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ContentKind {
    /// Spinning-wheel question sets.
    #[serde(rename = "wheels")]
    Wheel,
    /// Bundles of survey questions with vote counts.
    #[serde(rename = "surveylists")]
    SurveyList,
    /// Prompt-card lists ("never have I ever" style).
    #[serde(rename = "promptlists")]
    PromptList,
}

impl ContentKind {
    /// Every kind, in cascade order: owner rename/delete walks this
    /// sequence front to back.
    pub const ALL: [ContentKind; 3] =
        [ContentKind::Wheel, ContentKind::SurveyList, ContentKind::PromptList];

    /// Path segment used in the REST routes for this kind.
    pub fn path_segment(self) -> &'static str {
        match self {
            ContentKind::Wheel => "wheels",
            ContentKind::SurveyList => "surveylists",
            ContentKind::PromptList => "promptlists",
        }
    }

    /// Name of the backing collection for this kind.
    pub fn collection_name(self) -> &'static str {
        match self {
            ContentKind::Wheel => "wheels",
            ContentKind::SurveyList => "survey_lists",
            ContentKind::PromptList => "prompt_lists",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Kind-specific body of a content record, dispatched via the `kind` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentPayload {
    /// Questions for the spinning wheel plus the slice count the wheel
    /// should be built with.
    Wheel {
        /// Ordered question texts.
        questions: Vec<String>,
        /// How many wheel slices the player asked for.
        #[serde(default = "default_target_count")]
        target_count: u32,
    },
    /// A saved bundle of surveys.
    SurveyList {
        /// Ordered survey entries.
        surveys: Vec<Survey>,
    },
    /// A saved list of prompt cards.
    PromptList {
        /// Ordered prompt texts.
        prompts: Vec<String>,
    },
}

fn default_target_count() -> u32 {
    8
}

impl ContentPayload {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentPayload::Wheel { .. } => ContentKind::Wheel,
            ContentPayload::SurveyList { .. } => ContentKind::SurveyList,
            ContentPayload::PromptList { .. } => ContentKind::PromptList,
        }
    }
}

/// One survey inside a survey-list record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Survey {
    /// Identifier local to the list (client-chosen, e.g. `s1`).
    pub id: String,
    /// The survey question text.
    pub question: String,
    /// Ordered answer options with their running vote counts.
    pub options: Vec<SurveyOption>,
}

/// A single answer option of a survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SurveyOption {
    /// Identifier local to the survey (client-chosen, e.g. `o1`).
    pub id: String,
    /// Option text.
    pub text: String,
    /// Votes collected so far.
    #[serde(default)]
    pub votes: u32,
}

/// A saved content record, shared across storage tiers.
///
/// `id` is a string in every tier: the server assigns UUIDv4 strings, the
/// device fallback assigns `local-…` identifiers. Empty titles are stored
/// as-is; the store never rejects them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRecord {
    /// Tier-assigned identifier, stable for the record's lifetime.
    pub id: String,
    /// Username of the owning identity at the last ownership update.
    pub owner: String,
    /// User-supplied label.
    pub title: String,
    /// Creation timestamp, set once and never mutated.
    pub created_at: SystemTime,
    /// Kind-specific body.
    pub payload: ContentPayload,
}

/// Title and payload of a record about to be created; the serving tier
/// supplies `id`, `owner` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ContentDraft {
    /// User-supplied label; empty strings are accepted.
    pub title: String,
    /// Kind-specific body, carrying the kind tag.
    #[serde(flatten)]
    pub payload: ContentPayload,
}

/// Partial update applied to an existing record. Absent fields are left
/// untouched; `created_at` and `owner` are never patchable this way.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ContentPatch {
    /// Replacement title, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement payload, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ContentPayload>,
}

/// Profile record backing an owner identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileEntity {
    /// Unique, user-chosen handle scoping content ownership. Mutable via
    /// the rename cascade.
    pub username: String,
    /// Contact address captured at sign-up; never verified here.
    pub email: String,
    /// Index into the predefined avatar set.
    pub avatar_id: u32,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_tag_round_trips() {
        let payload = ContentPayload::Wheel {
            questions: vec!["Q1".into(), "Q2".into()],
            target_count: 8,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "wheel");
        assert_eq!(json["questions"][1], "Q2");

        let back: ContentPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn wheel_target_count_defaults_to_eight() {
        let payload: ContentPayload =
            serde_json::from_str(r#"{"kind":"wheel","questions":[]}"#).unwrap();
        assert_eq!(
            payload,
            ContentPayload::Wheel {
                questions: vec![],
                target_count: 8
            }
        );
    }

    #[test]
    fn survey_votes_default_to_zero() {
        let payload: ContentPayload = serde_json::from_str(
            r#"{
                "kind": "survey_list",
                "surveys": [{
                    "id": "s1",
                    "question": "Best weekend activity?",
                    "options": [
                        {"id": "o1", "text": "Camping", "votes": 2},
                        {"id": "o2", "text": "Movie marathon"}
                    ]
                }]
            }"#,
        )
        .unwrap();

        let expected = ContentPayload::SurveyList {
            surveys: vec![Survey {
                id: "s1".into(),
                question: "Best weekend activity?".into(),
                options: vec![
                    SurveyOption {
                        id: "o1".into(),
                        text: "Camping".into(),
                        votes: 2,
                    },
                    SurveyOption {
                        id: "o2".into(),
                        text: "Movie marathon".into(),
                        votes: 0,
                    },
                ],
            }],
        };
        assert_eq!(payload, expected);
    }

    #[test]
    fn kind_deserializes_from_path_segment() {
        for kind in ContentKind::ALL {
            let segment = serde_json::Value::String(kind.path_segment().into());
            let parsed: ContentKind = serde_json::from_value(segment).unwrap();
            assert_eq!(parsed, kind);
        }
        assert!(serde_json::from_str::<ContentKind>("\"user\"").is_err());
    }

    #[test]
    fn draft_flattens_payload_fields() {
        let draft: ContentDraft = serde_json::from_str(
            r#"{"title":"Party Mix","kind":"prompt_list","prompts":["never have I ever"]}"#,
        )
        .unwrap();
        assert_eq!(draft.title, "Party Mix");
        assert_eq!(draft.payload.kind(), ContentKind::PromptList);
    }
}
