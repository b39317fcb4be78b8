use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Mount point of the interactive API documentation.
const DOCS_PATH: &str = "/docs";
/// Where the generated OpenAPI document is served from.
const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Serve the Swagger UI backed by the generated OpenAPI document.
pub fn router(state: SharedState) -> Router<SharedState> {
    let swagger = SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi());
    Router::<SharedState>::from(swagger).with_state(state)
}
