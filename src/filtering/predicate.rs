use super::operator::ComparisonOperator;
use super::params::{ParamValue, RawQueryParams, is_multi_value};

/// Literal side of a predicate, still as text. Each store coerces it to the
/// type of the field it is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// One field-level condition, e.g. `salary > 50000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: FilterValue,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, ComparisonOperator::Eq, FilterValue::Single(value.into()))
    }
}

/// Predicates combined with logical AND. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn every non-reserved parameter into a predicate.
    ///
    /// - `field=value` becomes an equality (last value wins on repeats)
    /// - repeating a [`MULTI_VALUE_KEYS`](super::params::MULTI_VALUE_KEYS) field matches any of its values
    /// - `field[op]=value` with `op` in `gt, gte, lt, lte, in` becomes that comparison
    /// - `field[in]` takes repeated values and comma-separated lists
    /// - any other bracketed keyword is dropped
    ///
    /// A plain value and operators on the same field all apply.
    #[must_use]
    pub fn from_params(params: &RawQueryParams) -> Self {
        let mut filter = Self::new();

        for (field, value) in params.predicate_entries() {
            match value {
                ParamValue::List(values) if is_multi_value(field) => {
                    filter.push(Predicate::new(
                        field,
                        ComparisonOperator::In,
                        FilterValue::Many(values.clone()),
                    ));
                }
                ParamValue::Text(_) | ParamValue::List(_) => {
                    if let Some(last) = value.last() {
                        filter.push(Predicate::equals(field, last));
                    }
                }
                ParamValue::Operators(entries) => {
                    for (keyword, values) in entries {
                        let Some(operator) = ComparisonOperator::from_keyword(keyword) else {
                            tracing::debug!(field = %field, keyword = %keyword, "Dropping unsupported filter operator");
                            continue;
                        };
                        if let Some(value) = operator_value(operator, values) {
                            filter.push(Predicate::new(field, operator, value));
                        }
                    }
                }
            }
        }

        filter
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// AND another filter onto this one.
    #[must_use]
    pub fn and(mut self, other: Filter) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

impl FromIterator<Predicate> for Filter {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

fn operator_value(operator: ComparisonOperator, values: &[String]) -> Option<FilterValue> {
    if operator.takes_list() {
        let items: Vec<String> = values
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return (!items.is_empty()).then_some(FilterValue::Many(items));
    }
    values.last().cloned().map(FilterValue::Single)
}
