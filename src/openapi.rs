use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::validation::ValidationError;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const DOCS_PATH: &str = "/docs";

/// Document root; paths are added by the routers nested under it.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "jobboard",
        description = "Post, search and filter job listings.\n\nListings accept `field=value`, `field[gt|gte|lt|lte|in]=value`, `sort`, `fields`, `q`, `page` and `limit` query parameters."
    ),
    tags((name = "jobs", description = "Job listings")),
    components(schemas(ErrorResponse, ValidationError))
)]
pub struct ApiDoc;
