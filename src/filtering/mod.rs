//! # Query-string filtering
//!
//! Turns the query string of a listing request into a structured query:
//! predicates, sort keys, a field projection, a phrase search and a page
//! window. The result is handed to any [`DocumentQuery`] implementation; see
//! [`crate::store`] for the in-memory and SQL ones.
//!
//! ## Query Parameter Examples
//!
//! ```text
//! GET /api/v1/jobs?jobType=Permanent            equality
//! GET /api/v1/jobs?salary[gt]=50000             comparison (gt, gte, lt, lte)
//! GET /api/v1/jobs?jobType[in]=Permanent,Temporary
//! GET /api/v1/jobs?sort=-salary,title           multi-key sort, '-' for descending
//! GET /api/v1/jobs?fields=title,company         keep only these fields
//! GET /api/v1/jobs?fields=-description          drop these fields
//! GET /api/v1/jobs?q=node-developer             phrase search for "node developer"
//! GET /api/v1/jobs?page=2&limit=5               skip 5, take 5
//! ```
//!
//! ## Defaults
//!
//! | parameter | when absent or unreadable |
//! |-----------|---------------------------|
//! | filters   | match everything          |
//! | `sort`    | `-postingDate`            |
//! | `fields`  | `-version`                |
//! | `q`       | no search                 |
//! | `page`    | 1                         |
//! | `limit`   | 10                        |
//!
//! Operator keywords are looked up in a fixed table; anything else in
//! brackets is discarded before it can reach a store.

pub mod builder;
pub mod operator;
pub mod pagination;
pub mod params;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod search;
pub mod sort;

pub use builder::ApiFilters;
pub use operator::ComparisonOperator;
pub use pagination::{Page, calculate_content_range};
pub use params::{ParamValue, RawQueryParams};
pub use predicate::{Filter, FilterValue, Predicate};
pub use projection::{FieldSelector, Projection, ProjectionMode};
pub use query::DocumentQuery;
pub use search::TextSearch;
pub use sort::{SortDirection, SortKey, parse_sort};
