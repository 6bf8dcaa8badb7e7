use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{Json, Router, http::Uri, routing::get};
use axum_helmet::HelmetLayer;
use sea_orm::DatabaseConnection;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

use crate::config::RateLimit;
use crate::errors::ApiError;
use crate::jobs;
use crate::openapi::{ApiDoc, DOCS_PATH, OPENAPI_JSON_PATH};

pub const API_PREFIX: &str = "/api/v1";

/// The whole HTTP surface, without transport layers.
///
/// API routes carry the default security headers. The docs page is left
/// out because the default content security policy blocks its scripts.
pub fn app(db: &DatabaseConnection) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest(&format!("{API_PREFIX}/jobs"), jobs::router(db))
        .split_for_parts();

    let spec = Json(api.clone());
    router
        .route(OPENAPI_JSON_PATH, get(move || std::future::ready(spec.clone())))
        .layer(HelmetLayer::new(axum_helmet::Helmet::default()))
        .merge(Scalar::with_url(DOCS_PATH, api))
        .fallback(not_found)
}

/// Per client IP quota. Idle clients are forgotten once a minute.
///
/// The client address comes from `ConnectInfo`, so the app must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Errors
///
/// Fails when the quota cannot be expressed, e.g. a zero window.
pub fn with_rate_limit(app: Router, rate_limit: RateLimit) -> anyhow::Result<Router> {
    let governor = GovernorConfigBuilder::default()
        .period(rate_limit.replenish_period())
        .burst_size(rate_limit.max_requests)
        .finish()
        .context("Invalid rate limit configuration")?;

    let limiter = governor.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });

    tracing::info!(
        max_requests = rate_limit.max_requests,
        window_secs = rate_limit.window_secs,
        "Rate limiting enabled"
    );
    Ok(app.layer(GovernorLayer { config: Arc::new(governor) }))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("{uri} does not exist"))
}
