use axum::{
    Json,
    extract::{
        Path, RawQuery, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryOrder, QuerySelect,
    sea_query::{Alias, Expr, Func},
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::entity::{Column, Entity, Experience, Model};
use super::models::{JobUpdate, NewJob};
use crate::errors::{ApiError, ErrorResponse};
use crate::filtering::{
    ApiFilters, DocumentQuery, Projection, RawQueryParams, TextSearch, calculate_content_range,
};
use crate::store::{SqlQuery, apply_projection};

pub const RESOURCE_NAME: &str = "jobs";

#[derive(Debug, Serialize, ToSchema)]
pub struct JobList {
    pub success: bool,
    /// Rows in this page.
    pub results: usize,
    /// Rows matching the filters across all pages.
    pub total: u64,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceStats {
    pub experience: Experience,
    pub total_jobs: i64,
    pub avg_positions: Option<f64>,
    pub avg_salary: Option<f64>,
    pub min_salary: Option<i64>,
    pub max_salary: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub topic: String,
    pub data: Vec<ExperienceStats>,
}

/// A stored job with the fields hidden from clients removed.
fn public(job: Model) -> Result<Value, ApiError> {
    let document = serde_json::to_value(job).map_err(|err| ApiError::internal(Some(err.to_string())))?;
    Ok(apply_projection(document, &Projection::default())?)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "jobs",
    params(
        ("sort" = Option<String>, Query, description = "Comma-separated fields, `-` prefix for descending"),
        ("fields" = Option<String>, Query, description = "Fields to include, or `-`-prefixed fields to exclude"),
        ("q" = Option<String>, Query, description = "Phrase to search in titles, hyphens for spaces"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Rows per page"),
    ),
    responses(
        (status = 200, description = "One page of jobs", body = JobList),
        (status = 400, description = "Unknown field, bad literal or mixed projection", body = ErrorResponse),
    )
)]
pub async fn list_jobs(
    State(db): State<DatabaseConnection>,
    RawQuery(query): RawQuery,
) -> Result<(HeaderMap, Json<JobList>), ApiError> {
    let params = RawQueryParams::parse(query.as_deref().unwrap_or_default());
    let filters = ApiFilters::new(SqlQuery::new(Entity::find()), params).apply_all();
    let page = filters.page();
    let query = filters.into_query();

    let data = query.fetch(&db).await?;
    let total = query.count(&db).await?;
    tracing::debug!(returned = data.len(), total, page = page.page, "Listed jobs");

    let headers = calculate_content_range(page.skip(), data.len(), total, RESOURCE_NAME);
    Ok((
        headers,
        Json(JobList {
            success: true,
            results: data.len(),
            total,
            data,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/new",
    tag = "jobs",
    request_body = NewJob,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn create_job(
    State(db): State<DatabaseConnection>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let Json(payload) = payload?;
    let model = payload.into_model(Utc::now())?;

    let job = model.into_active_model().reset_all().insert(&db).await?;
    tracing::info!(id = %job.id, slug = %job.slug, "Job created");

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            success: true,
            message: Some("Successfully created a new job.".to_string()),
            data: public(job)?,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/{slug}",
    tag = "jobs",
    params(
        ("id" = Uuid, Path, description = "Job id"),
        ("slug" = String, Path, description = "Slug of the job title"),
    ),
    responses(
        (status = 200, description = "The job", body = JobResponse),
        (status = 404, description = "No job with this id and slug", body = ErrorResponse),
    )
)]
pub async fn get_job(
    State(db): State<DatabaseConnection>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let Path((id, slug)) = path?;

    let job = Entity::find_by_id(id)
        .one(&db)
        .await?
        .filter(|job| job.slug == slug)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(JobResponse {
        success: true,
        message: None,
        data: public(job)?,
    }))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job id")),
    request_body = JobUpdate,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
pub async fn update_job(
    State(db): State<DatabaseConnection>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> Result<Json<JobResponse>, ApiError> {
    let Path(id) = path?;
    let Json(update) = payload?;

    let current = Entity::find_by_id(id)
        .one(&db)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    let job = update.merge_into(current)?.update(&db).await?;
    tracing::info!(id = %job.id, version = job.version, "Job updated");

    Ok(Json(JobResponse {
        success: true,
        message: Some("Job is updated".to_string()),
        data: public(job)?,
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "jobs",
    params(("id" = Uuid, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = MessageResponse),
        (status = 404, description = "Job not found", body = ErrorResponse),
    )
)]
pub async fn delete_job(
    State(db): State<DatabaseConnection>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;

    let result = Entity::delete_by_id(id).exec(&db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::not_found("No job found"));
    }
    tracing::info!(id = %id, "Job deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "The specified job is deleted".to_string(),
    }))
}

/// Per-experience salary and position figures for jobs whose title contains
/// the topic.
#[utoipa::path(
    get,
    path = "/stats/{topic}",
    tag = "jobs",
    params(("topic" = String, Path, description = "Phrase matched against job titles")),
    responses(
        (status = 200, description = "Statistics grouped by experience, or `success: false` when nothing matched", body = StatsResponse),
    )
)]
pub async fn job_stats(
    State(db): State<DatabaseConnection>,
    Path(topic): Path<String>,
) -> Result<Response, ApiError> {
    let Some(search) = TextSearch::new(&topic) else {
        return Ok(no_stats(&topic));
    };
    tracing::debug!(phrase = %search.quoted(), "Computing job stats");

    let backend = db.get_database_backend();
    let salary = || Expr::col(Column::Salary);
    let stats = SqlQuery::new(Entity::find())
        .text_search(search)
        .compile()?
        .select_only()
        .column(Column::Experience)
        .column_as(Expr::col(Column::Id).count(), "total_jobs")
        .column_as(average(backend, Expr::col(Column::Positions)), "avg_positions")
        .column_as(average(backend, salary()), "avg_salary")
        .column_as(salary().min(), "min_salary")
        .column_as(salary().max(), "max_salary")
        .group_by(Column::Experience)
        .order_by_asc(Column::Experience)
        .into_model::<ExperienceStats>()
        .all(&db)
        .await?;

    if stats.is_empty() {
        return Ok(no_stats(&topic));
    }

    Ok(Json(StatsResponse {
        success: true,
        topic,
        data: stats,
    })
    .into_response())
}

/// `AVG` as a double precision float, spelled the way each backend accepts.
fn average(backend: DbBackend, expr: Expr) -> sea_orm::sea_query::SimpleExpr {
    Func::cast_as(Func::avg(expr), Alias::new(float_type(backend))).into()
}

fn float_type(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::MySql => "DOUBLE",
        _ => "DOUBLE PRECISION",
    }
}

fn no_stats(topic: &str) -> Response {
    Json(MessageResponse {
        success: false,
        message: format!("No stats found for - {topic}"),
    })
    .into_response()
}
