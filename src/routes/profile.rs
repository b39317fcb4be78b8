use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::ApiResponse,
        profile::{ProfileDto, RenameOwnerRequest, UpsertProfileRequest},
    },
    error::AppError,
    services::profile_service,
    state::SharedState,
};

/// Routes handling the profile record and the identity cascades.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/api/user/{username}",
        get(fetch_profile)
            .post(upsert_profile)
            .put(rename_owner)
            .delete(delete_owner),
    )
}

/// Fetch the profile backing an owner identity.
#[utoipa::path(
    get,
    path = "/api/user/{username}",
    tag = "user",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Profile record", body = ProfileDto),
        (status = 404, description = "No profile under this username")
    )
)]
pub async fn fetch_profile(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<ProfileDto>>, AppError> {
    let profile = profile_service::fetch_profile(&state, username).await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// Create or replace the profile backing an owner identity.
#[utoipa::path(
    post,
    path = "/api/user/{username}",
    tag = "user",
    params(("username" = String, Path, description = "Profile username")),
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile stored", body = ProfileDto)
    )
)]
pub async fn upsert_profile(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Valid(Json(request)): Valid<Json<UpsertProfileRequest>>,
) -> Result<Json<ApiResponse<ProfileDto>>, AppError> {
    let profile = profile_service::upsert_profile(&state, username, request).await?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// Rename an owner identity, cascading the new username across all owned
/// content.
#[utoipa::path(
    put,
    path = "/api/user/{username}",
    tag = "user",
    params(("username" = String, Path, description = "Current username")),
    request_body = RenameOwnerRequest,
    responses(
        (status = 200, description = "Rename and cascade completed")
    )
)]
pub async fn rename_owner(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Valid(Json(request)): Valid<Json<RenameOwnerRequest>>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    profile_service::rename_owner(&state, username, request.new_username).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

/// Delete an owner identity and everything it owns.
#[utoipa::path(
    delete,
    path = "/api/user/{username}",
    tag = "user",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Delete and cascade completed")
    )
)]
pub async fn delete_owner(
    State(state): State<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    profile_service::delete_owner(&state, username).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
