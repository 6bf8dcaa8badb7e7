//! Query execution backends.
//!
//! Both stores accept every shaping call from [`ApiFilters`](crate::filtering::ApiFilters)
//! without complaint and only validate when the query is fetched. Errors come
//! back as [`StoreError`] exactly as the store produced them.

pub mod memory;
pub mod sql;

use sea_orm::DbErr;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::filtering::{Projection, ProjectionMode};

pub use memory::{MemoryCollection, MemoryQuery};
pub use sql::{FieldCatalog, SqlQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    #[error("Projection cannot mix included and excluded fields")]
    MixedProjection,

    #[error("Text search requires a text index")]
    MissingTextIndex,

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Keep or drop top-level fields of a serialized document.
///
/// # Errors
///
/// Returns [`StoreError::MixedProjection`] when the projection both includes
/// and excludes fields.
pub fn apply_projection(document: Value, projection: &Projection) -> Result<Value, StoreError> {
    let Value::Object(fields) = document else {
        return Ok(document);
    };

    let projected: Map<String, Value> = match projection.mode() {
        ProjectionMode::Mixed => return Err(StoreError::MixedProjection),
        ProjectionMode::Include => {
            let wanted: Vec<&str> = projection.fields().collect();
            fields
                .into_iter()
                .filter(|(name, _)| wanted.contains(&name.as_str()))
                .collect()
        }
        ProjectionMode::Exclude => {
            let dropped: Vec<&str> = projection.fields().collect();
            fields
                .into_iter()
                .filter(|(name, _)| !dropped.contains(&name.as_str()))
                .collect()
        }
    };

    Ok(Value::Object(projected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job() -> Value {
        json!({"title": "Rust Dev", "company": "Acme", "salary": 90000, "version": 3})
    }

    #[test]
    fn test_default_projection_hides_version() {
        let projected = apply_projection(job(), &Projection::default()).unwrap();
        assert_eq!(projected, json!({"title": "Rust Dev", "company": "Acme", "salary": 90000}));
    }

    #[test]
    fn test_inclusion_keeps_listed_fields_only() {
        let projection = Projection::parse(Some("title,company,missing"));
        let projected = apply_projection(job(), &projection).unwrap();
        assert_eq!(projected, json!({"title": "Rust Dev", "company": "Acme"}));
    }

    #[test]
    fn test_mixed_projection_is_rejected() {
        let projection = Projection::parse(Some("title,-salary"));
        let err = apply_projection(job(), &projection).unwrap_err();
        assert!(matches!(err, StoreError::MixedProjection));
    }

    #[test]
    fn test_non_object_passes_through() {
        let projected = apply_projection(json!(5), &Projection::default()).unwrap();
        assert_eq!(projected, json!(5));
    }
}
