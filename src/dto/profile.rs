use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::ProfileEntity, dto::format_system_time};

/// Body of the identity-rename request.
///
/// An empty username would orphan every subsequent cascade, so this is
/// the one place the store validates its input.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RenameOwnerRequest {
    /// Username the identity should be known by from now on.
    #[validate(length(min = 1, max = 64))]
    pub new_username: String,
}

/// Body of the profile create/replace request.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpsertProfileRequest {
    /// Contact address captured at sign-up.
    #[validate(email)]
    pub email: String,
    /// Index into the predefined avatar set.
    #[serde(default)]
    pub avatar_id: u32,
}

/// Wire representation of a profile record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    /// Unique handle scoping content ownership.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Index into the predefined avatar set.
    pub avatar_id: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<ProfileEntity> for ProfileDto {
    fn from(profile: ProfileEntity) -> Self {
        Self {
            username: profile.username,
            email: profile.email,
            avatar_id: profile.avatar_id,
            created_at: format_system_time(profile.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_request_rejects_empty_username() {
        let request = RenameOwnerRequest {
            new_username: String::new(),
        };
        assert!(request.validate().is_err());

        let request = RenameOwnerRequest {
            new_username: "alice".into(),
        };
        assert!(request.validate().is_ok());
    }
}
