//! SeaORM-backed [`DocumentQuery`].
//!
//! API field names are mapped to columns through a [`FieldCatalog`]. Nothing
//! is checked while the query is shaped; [`SqlQuery::fetch`] and
//! [`SqlQuery::count`] compile it first and fail with a [`StoreError`] before
//! touching the database when a field, literal or projection is unusable.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, ColumnType, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Value,
};
use serde::Serialize;
use serde_json::Value as Json;

use super::{StoreError, apply_projection};
use crate::filtering::{
    DocumentQuery, Filter, Predicate, Projection, ProjectionMode, SortKey, TextSearch,
};

/// API-facing field names of an entity.
pub trait FieldCatalog: EntityTrait {
    /// Every field that may appear in a filter or sort, with its column.
    fn fields() -> Vec<(&'static str, Self::Column)>;

    /// Columns phrase search looks at. Empty means no text index.
    fn text_fields() -> Vec<Self::Column> {
        Vec::new()
    }

    fn column(field: &str) -> Option<Self::Column> {
        Self::fields()
            .into_iter()
            .find_map(|(name, column)| (name == field).then_some(column))
    }
}

#[derive(Debug, Clone)]
pub struct SqlQuery<E: EntityTrait> {
    select: Select<E>,
    filter: Filter,
    searches: Vec<TextSearch>,
    sort: Vec<SortKey>,
    projection: Option<Projection>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl<E: FieldCatalog> SqlQuery<E> {
    /// Wrap a base select, which may already carry its own conditions.
    pub fn new(select: Select<E>) -> Self {
        Self {
            select,
            filter: Filter::new(),
            searches: Vec::new(),
            sort: Vec::new(),
            projection: None,
            offset: None,
            limit: None,
        }
    }

    /// Run the query and return the rows as projected JSON objects.
    ///
    /// # Errors
    ///
    /// [`StoreError`] for an unknown field, an uncastable literal, a mixed
    /// projection, a phrase search without text fields, or a database failure.
    pub async fn fetch<C>(&self, db: &C) -> Result<Vec<Json>, StoreError>
    where
        C: ConnectionTrait,
        E::Model: Serialize,
    {
        if let Some(projection) = &self.projection {
            if projection.mode() == ProjectionMode::Mixed {
                return Err(StoreError::MixedProjection);
            }
            if let Some(unknown) = projection.fields().find(|field| E::column(field).is_none()) {
                return Err(StoreError::UnknownField(unknown.to_string()));
            }
        }

        let select = self.compile()?;
        let models = select.all(db).await?;

        models
            .into_iter()
            .map(|model| {
                let document = serde_json::to_value(model)?;
                match &self.projection {
                    Some(projection) => apply_projection(document, projection),
                    None => Ok(document),
                }
            })
            .collect()
    }

    /// Rows matching the filter and search, ignoring sort and page window.
    ///
    /// # Errors
    ///
    /// Same as [`SqlQuery::fetch`], minus projection errors.
    pub async fn count<C>(&self, db: &C) -> Result<u64, StoreError>
    where
        C: ConnectionTrait,
        E::Model: Sync,
    {
        let select = self.conditions()?;
        Ok(select.count(db).await?)
    }

    /// The full select with sort and page window applied.
    ///
    /// # Errors
    ///
    /// [`StoreError`] for anything that cannot be turned into SQL.
    pub fn compile(&self) -> Result<Select<E>, StoreError> {
        let mut select = self.conditions()?;

        for key in &self.sort {
            let column = E::column(&key.field)
                .ok_or_else(|| StoreError::UnknownField(key.field.clone()))?;
            select = select.order_by(column, key.direction.into());
        }
        if let Some(offset) = self.offset {
            select = select.offset(clamp_to_sql(offset));
        }
        if let Some(limit) = self.limit {
            select = select.limit(clamp_to_sql(limit));
        }

        Ok(select)
    }

    fn conditions(&self) -> Result<Select<E>, StoreError> {
        let mut condition = Condition::all();

        for predicate in self.filter.predicates() {
            if let Some(expr) = predicate_expr::<E>(predicate)? {
                condition = condition.add(expr);
            }
        }

        if !self.searches.is_empty() {
            let text_fields = E::text_fields();
            if text_fields.is_empty() {
                return Err(StoreError::MissingTextIndex);
            }
            for search in &self.searches {
                condition = condition.add(phrase_condition::<E>(&text_fields, search));
            }
        }

        Ok(self.select.clone().filter(condition))
    }
}

impl<E: FieldCatalog> DocumentQuery for SqlQuery<E> {
    fn find_matching(mut self, filter: Filter) -> Self {
        self.filter = self.filter.and(filter);
        self
    }

    fn sort_by(mut self, keys: Vec<SortKey>) -> Self {
        self.sort = keys;
        self
    }

    fn project(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    fn skip(mut self, count: u64) -> Self {
        self.offset = Some(count);
        self
    }

    fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    fn text_search(mut self, search: TextSearch) -> Self {
        self.searches.push(search);
        self
    }
}

fn predicate_expr<E: FieldCatalog>(
    predicate: &Predicate,
) -> Result<Option<sea_orm::sea_query::SimpleExpr>, StoreError> {
    let column = E::column(&predicate.field)
        .ok_or_else(|| StoreError::UnknownField(predicate.field.clone()))?;

    let values = predicate
        .value
        .values()
        .into_iter()
        .map(|raw| coerce(column.def().get_column_type(), &predicate.field, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(predicate.operator.to_sql(column, values))
}

/// `UPPER(col) LIKE '%PHRASE%'` over every text field, any of which may match.
fn phrase_condition<E: FieldCatalog>(text_fields: &[E::Column], search: &TextSearch) -> Condition {
    let pattern = format!("%{}%", escape_like(&search.phrase().to_uppercase()));

    text_fields.iter().fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::upper(Expr::col((E::default(), *column))))
                .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
        )
    })
}

/// Escape character for `LIKE` patterns.
const LIKE_ESCAPE: char = '!';

fn escape_like(phrase: &str) -> String {
    let mut escaped = String::with_capacity(phrase.len());
    for ch in phrase.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Cast a query-string literal to the column's type.
fn coerce(column_type: &ColumnType, field: &str, raw: &str) -> Result<Value, StoreError> {
    let invalid = || StoreError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let trimmed = raw.trim();

    Ok(match column_type {
        ColumnType::TinyInteger
        | ColumnType::SmallInteger
        | ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::TinyUnsigned
        | ColumnType::SmallUnsigned
        | ColumnType::Unsigned
        | ColumnType::BigUnsigned => match trimmed.parse::<i64>() {
            Ok(integer) => integer.into(),
            // Fractional literals still compare numerically against integer columns
            Err(_) => parse_finite(trimmed).ok_or_else(invalid)?.into(),
        },
        ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
            parse_finite(trimmed).ok_or_else(invalid)?.into()
        }
        ColumnType::Boolean => trimmed.parse::<bool>().map_err(|_| invalid())?.into(),
        ColumnType::Uuid => uuid::Uuid::parse_str(trimmed).map_err(|_| invalid())?.into(),
        ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
            parse_datetime(trimmed).ok_or_else(invalid)?.into()
        }
        ColumnType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| invalid())?
            .into(),
        _ => raw.to_string().into(),
    })
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// SQL backends bind `LIMIT`/`OFFSET` as signed 64-bit integers.
fn clamp_to_sql(count: u64) -> u64 {
    count.min(i64::MAX.unsigned_abs())
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` read as midnight UTC.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{ComparisonOperator, FilterValue, Page};
    use crate::jobs::entity;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &SqlQuery<entity::Entity>) -> String {
        query
            .compile()
            .unwrap()
            .build(DbBackend::Sqlite)
            .to_string()
    }

    fn base() -> SqlQuery<entity::Entity> {
        SqlQuery::new(entity::Entity::find())
    }

    #[test]
    fn test_comparison_uses_column_and_typed_literal() {
        let filter: Filter = [Predicate::new(
            "salary",
            ComparisonOperator::Gt,
            FilterValue::Single("50000".to_string()),
        )]
        .into_iter()
        .collect();
        let statement = sql(&base().find_matching(filter));
        assert!(statement.contains(r#""jobs"."salary" > 50000"#), "{statement}");
    }

    #[test]
    fn test_in_lists_every_value() {
        let filter: Filter = [Predicate::new(
            "jobType",
            ComparisonOperator::In,
            FilterValue::Many(vec!["Permanent".to_string(), "Internship".to_string()]),
        )]
        .into_iter()
        .collect();
        let statement = sql(&base().find_matching(filter));
        assert!(
            statement.contains(r#""jobs"."job_type" IN ('Permanent', 'Internship')"#),
            "{statement}"
        );
    }

    #[test]
    fn test_sort_and_page_window() {
        let query = base()
            .sort_by(vec![SortKey::desc("salary"), SortKey::asc("title")])
            .paginate(Page { page: 3, limit: 5 });
        let statement = sql(&query);
        assert!(
            statement.contains(r#"ORDER BY "jobs"."salary" DESC, "jobs"."title" ASC"#),
            "{statement}"
        );
        assert!(statement.contains("LIMIT 5 OFFSET 10"), "{statement}");
    }

    #[test]
    fn test_phrase_search_compares_upper_cased_title() {
        let search = TextSearch::from_query("100%-remote").unwrap();
        let statement = sql(&base().text_search(search));
        assert!(statement.contains(r#"UPPER("jobs"."title") LIKE"#), "{statement}");
        assert!(statement.contains("%100!% REMOTE%"), "{statement}");
        assert!(statement.contains("ESCAPE"), "{statement}");
    }

    #[test]
    fn test_unknown_field_is_reported_on_compile() {
        let filter: Filter = [Predicate::equals("password", "x")].into_iter().collect();
        let query = base().find_matching(filter);
        assert!(matches!(query.compile(), Err(StoreError::UnknownField(field)) if field == "password"));
    }

    #[test]
    fn test_unknown_sort_field_is_reported() {
        let query = base().sort_by(vec![SortKey::asc("nope")]);
        assert!(matches!(query.compile(), Err(StoreError::UnknownField(_))));
    }

    #[test]
    fn test_uncastable_literal() {
        let filter: Filter = [Predicate::equals("positions", "many")].into_iter().collect();
        let query = base().find_matching(filter);
        assert!(matches!(
            query.compile(),
            Err(StoreError::InvalidValue { field, value }) if field == "positions" && value == "many"
        ));
    }

    #[test]
    fn test_fractional_literal_on_integer_column() {
        let filter: Filter = [Predicate::new(
            "salary",
            ComparisonOperator::Gt,
            FilterValue::Single("50000.5".to_string()),
        )]
        .into_iter()
        .collect();
        let statement = sql(&base().find_matching(filter));
        assert!(statement.contains(r#""jobs"."salary" > 50000.5"#), "{statement}");
    }

    #[test]
    fn test_non_finite_literal_is_invalid() {
        let filter: Filter = [Predicate::equals("salary", "inf")].into_iter().collect();
        let query = base().find_matching(filter);
        assert!(matches!(query.compile(), Err(StoreError::InvalidValue { .. })));
    }

    #[test]
    fn test_page_window_is_clamped_to_signed_range() {
        let query = base().paginate(Page {
            page: u64::MAX,
            limit: u64::MAX,
        });
        let statement = sql(&query);
        let max = i64::MAX.to_string();
        assert!(statement.contains(&format!("LIMIT {max} OFFSET {max}")), "{statement}");
    }

    #[test]
    fn test_date_literal_accepts_plain_dates() {
        assert_eq!(
            parse_datetime("2024-03-01").unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_a!b"), "50!%!_a!!b");
    }
}
