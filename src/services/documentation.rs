use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Party Zone backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::content::list_content,
        crate::routes::content::create_content,
        crate::routes::content::update_content,
        crate::routes::content::delete_content,
        crate::routes::profile::fetch_profile,
        crate::routes::profile::upsert_profile,
        crate::routes::profile::rename_owner,
        crate::routes::profile::delete_owner,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::content::ContentRecordDto,
            crate::dto::profile::ProfileDto,
            crate::dto::profile::RenameOwnerRequest,
            crate::dto::profile::UpsertProfileRequest,
            crate::dao::models::ContentKind,
            crate::dao::models::ContentPayload,
            crate::dao::models::ContentDraft,
            crate::dao::models::ContentPatch,
            crate::dao::models::Survey,
            crate::dao::models::SurveyOption,
        )
    ),
    tags(
        (name = "content", description = "Owner-scoped content CRUD"),
        (name = "user", description = "Profile and identity management"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
