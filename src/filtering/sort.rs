use sea_orm::sea_query::Order;

/// Field used when the request gives no `sort`: newest postings first.
pub const DEFAULT_SORT_FIELD: &str = "postingDate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// `salary` sorts ascending, `-salary` descending.
    fn parse(segment: &str) -> Option<Self> {
        let segment = segment.trim();
        let key = match segment.strip_prefix('-') {
            Some(field) => Self::desc(field.trim()),
            None => Self::asc(segment),
        };
        (!key.field.is_empty()).then_some(key)
    }
}

/// Parse `sort=a,-b` into ordered keys, primary key first. A missing or empty
/// spec falls back to descending [`DEFAULT_SORT_FIELD`].
///
/// Ties on every key are broken however the store likes; callers needing a
/// deterministic order should add a unique field as the last key.
#[must_use]
pub fn parse_sort(spec: Option<&str>) -> Vec<SortKey> {
    let keys: Vec<SortKey> = spec
        .map(|spec| spec.split(',').filter_map(SortKey::parse).collect())
        .unwrap_or_default();

    if keys.is_empty() {
        vec![SortKey::desc(DEFAULT_SORT_FIELD)]
    } else {
        keys
    }
}
