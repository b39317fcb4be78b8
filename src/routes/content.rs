use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};

use crate::{
    dao::models::{ContentDraft, ContentKind, ContentPatch},
    dto::{common::ApiResponse, content::ContentRecordDto},
    error::AppError,
    services::content_service,
    state::SharedState,
};

/// Routes handling owner-scoped content CRUD. The kind path segment is
/// one of `wheels`, `surveylists` or `promptlists`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/user/{username}/{kind}",
            get(list_content).post(create_content),
        )
        .route("/api/{kind}/{id}", put(update_content))
        .route("/api/user/{username}/{kind}/{id}", delete(delete_content))
}

/// List every record of one kind owned by a user.
#[utoipa::path(
    get,
    path = "/api/user/{username}/{kind}",
    tag = "content",
    params(
        ("username" = String, Path, description = "Owner username"),
        ("kind" = String, Path, description = "Content kind path segment"),
    ),
    responses(
        (status = 200, description = "Records owned by the user", body = [ContentRecordDto])
    )
)]
pub async fn list_content(
    State(state): State<SharedState>,
    Path((username, kind)): Path<(String, ContentKind)>,
) -> Result<Json<ApiResponse<Vec<ContentRecordDto>>>, AppError> {
    let records = content_service::list_content(&state, username, kind).await?;
    let records = records.into_iter().map(ContentRecordDto::from).collect();
    Ok(Json(ApiResponse::ok(records)))
}

/// Create a record owned by a user; the store assigns the identifier.
#[utoipa::path(
    post,
    path = "/api/user/{username}/{kind}",
    tag = "content",
    params(
        ("username" = String, Path, description = "Owner username"),
        ("kind" = String, Path, description = "Content kind path segment"),
    ),
    request_body = ContentDraft,
    responses(
        (status = 200, description = "Record created", body = ContentRecordDto)
    )
)]
pub async fn create_content(
    State(state): State<SharedState>,
    Path((username, kind)): Path<(String, ContentKind)>,
    Json(draft): Json<ContentDraft>,
) -> Result<Json<ApiResponse<ContentRecordDto>>, AppError> {
    let record = content_service::create_content(&state, username, kind, draft).await?;
    Ok(Json(ApiResponse::ok(record.into())))
}

/// Partially update a record addressed by id. No ownership check is
/// performed (known gap, kept as-is).
#[utoipa::path(
    put,
    path = "/api/{kind}/{id}",
    tag = "content",
    params(
        ("kind" = String, Path, description = "Content kind path segment"),
        ("id" = String, Path, description = "Record identifier"),
    ),
    request_body = ContentPatch,
    responses(
        (status = 200, description = "Update accepted")
    )
)]
pub async fn update_content(
    State(state): State<SharedState>,
    Path((kind, id)): Path<(ContentKind, String)>,
    Json(patch): Json<ContentPatch>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    content_service::update_content(&state, kind, id, patch).await?;
    Ok(Json(ApiResponse::ok_empty()))
}

/// Delete a record addressed by id. The username in the path is not
/// required to match the record's owner (same gap).
#[utoipa::path(
    delete,
    path = "/api/user/{username}/{kind}/{id}",
    tag = "content",
    params(
        ("username" = String, Path, description = "Owner username"),
        ("kind" = String, Path, description = "Content kind path segment"),
        ("id" = String, Path, description = "Record identifier"),
    ),
    responses(
        (status = 200, description = "Delete accepted")
    )
)]
pub async fn delete_content(
    State(state): State<SharedState>,
    Path((username, kind, id)): Path<(String, ContentKind, String)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    content_service::delete_content(&state, username, id, kind).await?;
    Ok(Json(ApiResponse::ok_empty()))
}
