//! In-memory JSON document collection.
//!
//! Behaves like a small schemaless document store: literals are cast to the
//! type of the value they are compared with, array fields match when any
//! element matches, and a text index must be declared before phrase search
//! can be used. Listing fixtures and tests run the real builder against it.

use std::cmp::Ordering;

use serde_json::Value;

use super::{StoreError, apply_projection};
use crate::filtering::{
    ComparisonOperator, DocumentQuery, Filter, Predicate, Projection, ProjectionMode,
    SortDirection, SortKey, TextSearch,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    documents: Vec<Value>,
    text_fields: Vec<String>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents,
            text_fields: Vec::new(),
        }
    }

    /// Declare the string fields phrase search looks at.
    #[must_use]
    pub fn with_text_index<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn insert(&mut self, document: Value) {
        self.documents.push(document);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Start a query that matches every document.
    #[must_use]
    pub fn find(&self) -> MemoryQuery<'_> {
        MemoryQuery {
            collection: self,
            filter: Filter::new(),
            searches: Vec::new(),
            sort: Vec::new(),
            projection: None,
            skip: 0,
            limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryQuery<'a> {
    collection: &'a MemoryCollection,
    filter: Filter,
    searches: Vec<TextSearch>,
    sort: Vec<SortKey>,
    projection: Option<Projection>,
    skip: u64,
    limit: Option<u64>,
}

impl DocumentQuery for MemoryQuery<'_> {
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
        self.skip = count;
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

impl MemoryQuery<'_> {
    /// Run the query.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MixedProjection`] for a projection that includes and excludes
    /// - [`StoreError::MissingTextIndex`] for a phrase search without a text index
    /// - [`StoreError::InvalidValue`] when a literal cannot be cast to the field's type
    pub fn fetch(&self) -> Result<Vec<Value>, StoreError> {
        if let Some(projection) = &self.projection
            && projection.mode() == ProjectionMode::Mixed
        {
            return Err(StoreError::MixedProjection);
        }

        let mut matched = self.matching()?;
        matched.sort_by(|left, right| compare_documents(left, right, &self.sort));

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|document| match &self.projection {
                Some(projection) => apply_projection(document.clone(), projection),
                None => Ok(document.clone()),
            })
            .collect()
    }

    /// Number of documents matching the filter and search, ignoring the page window.
    ///
    /// # Errors
    ///
    /// Same as [`MemoryQuery::fetch`], minus projection errors.
    pub fn count(&self) -> Result<u64, StoreError> {
        Ok(self.matching()?.len() as u64)
    }

    fn matching(&self) -> Result<Vec<&Value>, StoreError> {
        if !self.searches.is_empty() && self.collection.text_fields.is_empty() {
            return Err(StoreError::MissingTextIndex);
        }

        let mut matched = Vec::new();
        for document in &self.collection.documents {
            if self.matches(document)? {
                matched.push(document);
            }
        }
        Ok(matched)
    }

    fn matches(&self, document: &Value) -> Result<bool, StoreError> {
        for predicate in self.filter.predicates() {
            if !predicate_matches(document, predicate)? {
                return Ok(false);
            }
        }
        Ok(self
            .searches
            .iter()
            .all(|search| phrase_matches(document, &self.collection.text_fields, search)))
    }
}

/// Resolve `a.b.c` through nested objects.
fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

fn predicate_matches(document: &Value, predicate: &Predicate) -> Result<bool, StoreError> {
    let Some(value) = lookup(document, &predicate.field) else {
        return Ok(false);
    };
    value_matches(value, predicate)
}

fn value_matches(value: &Value, predicate: &Predicate) -> Result<bool, StoreError> {
    // Array fields match when any element does
    if let Value::Array(items) = value {
        for item in items {
            if value_matches(item, predicate)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    let literals = predicate.value.values();
    match predicate.operator {
        ComparisonOperator::In => {
            for literal in literals {
                if compare_literal(value, literal, &predicate.field)? == Some(Ordering::Equal) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        operator => {
            let Some(literal) = literals.last() else {
                return Ok(false);
            };
            let Some(ordering) = compare_literal(value, literal, &predicate.field)? else {
                return Ok(false);
            };
            Ok(match operator {
                ComparisonOperator::Gt => ordering == Ordering::Greater,
                ComparisonOperator::Gte => ordering != Ordering::Less,
                ComparisonOperator::Lt => ordering == Ordering::Less,
                ComparisonOperator::Lte => ordering != Ordering::Greater,
                ComparisonOperator::Eq | ComparisonOperator::In => ordering == Ordering::Equal,
            })
        }
    }
}

/// Order of `value` relative to `literal` once the literal is cast to the
/// value's type. `None` means the two are not comparable (nulls, objects).
fn compare_literal(value: &Value, literal: &str, field: &str) -> Result<Option<Ordering>, StoreError> {
    let invalid = || StoreError::InvalidValue {
        field: field.to_string(),
        value: literal.to_string(),
    };

    Ok(match value {
        Value::Number(number) => {
            let literal: f64 = literal.trim().parse().map_err(|_| invalid())?;
            number.as_f64().and_then(|number| number.partial_cmp(&literal))
        }
        Value::String(text) => Some(text.as_str().cmp(literal)),
        Value::Bool(flag) => {
            let literal: bool = literal.trim().parse().map_err(|_| invalid())?;
            Some(flag.cmp(&literal))
        }
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    })
}

fn phrase_matches(document: &Value, text_fields: &[String], search: &TextSearch) -> bool {
    let phrase = search.phrase().to_lowercase();
    text_fields.iter().any(|field| {
        lookup(document, field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(&phrase))
    })
}

/// Rank of a JSON type in sort order; missing fields sort with nulls.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (Some(Value::Bool(left)), Some(Value::Bool(right))) => left.cmp(right),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn compare_documents(left: &Value, right: &Value, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = compare_values(lookup(left, &key.field), lookup(right, &key.field));
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
