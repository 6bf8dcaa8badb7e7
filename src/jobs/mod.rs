//! The `jobs` resource: table, payloads and handlers.

pub mod entity;
pub mod handlers;
pub mod models;

use sea_orm::DatabaseConnection;
use utoipa_axum::{router::OpenApiRouter, routes};

pub use entity::{Education, Entity, Experience, Industry, JobType, Model as Job};
pub use models::{JobUpdate, NewJob, slugify};

/// Routes relative to `/api/v1/jobs`.
pub fn router(db: &DatabaseConnection) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_jobs))
        .routes(routes!(handlers::create_job))
        .routes(routes!(handlers::job_stats))
        .routes(routes!(handlers::get_job))
        .routes(routes!(handlers::update_job, handlers::delete_job))
        .with_state(db.clone())
}
