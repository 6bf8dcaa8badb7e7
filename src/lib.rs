//! # jobboard
//!
//! A job-board REST API built on Axum and Sea-ORM. Listings are narrowed by
//! [`filtering::ApiFilters`], which reads the request's query string and shapes
//! any [`filtering::DocumentQuery`]:
//!
//! ```rust,ignore
//! let query = ApiFilters::new(SqlQuery::new(jobs::Entity::find()), params)
//!     .filter()
//!     .sort()
//!     .limit_fields()
//!     .search_by_query()
//!     .pagination()
//!     .into_query();
//! let rows = query.fetch(&db).await?;
//! ```

pub mod config;
pub mod errors;
pub mod filtering;
pub mod jobs;
pub mod migration;
pub mod openapi;
pub mod routes;
pub mod store;
pub mod validation;

pub use errors::ApiError;
pub use filtering::{ApiFilters, DocumentQuery, RawQueryParams};
pub use routes::app;
pub use store::{MemoryCollection, SqlQuery, StoreError};
