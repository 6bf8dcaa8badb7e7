use sea_orm::{ColumnTrait, Value, sea_query::SimpleExpr};
use serde::Serialize;

/// Comparison applied by a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

/// Query-string keyword, operator, document-store spelling.
///
/// `Eq` has no keyword: it is what a plain `field=value` means.
static OPERATOR_TABLE: [(Option<&str>, ComparisonOperator, &str); 6] = [
    (None, ComparisonOperator::Eq, "$eq"),
    (Some("gt"), ComparisonOperator::Gt, "$gt"),
    (Some("gte"), ComparisonOperator::Gte, "$gte"),
    (Some("lt"), ComparisonOperator::Lt, "$lt"),
    (Some("lte"), ComparisonOperator::Lte, "$lte"),
    (Some("in"), ComparisonOperator::In, "$in"),
];

impl ComparisonOperator {
    /// Look up a bracketed keyword such as the `gt` in `salary[gt]`.
    /// Matching is exact; unknown keywords yield `None` and are never forwarded.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        OPERATOR_TABLE
            .iter()
            .find(|(candidate, _, _)| *candidate == Some(keyword))
            .map(|(_, operator, _)| *operator)
    }

    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        self.entry().0
    }

    /// Spelling of the operator in a document store's query language.
    #[must_use]
    pub fn native(self) -> &'static str {
        self.entry().2
    }

    fn entry(self) -> &'static (Option<&'static str>, ComparisonOperator, &'static str) {
        OPERATOR_TABLE
            .iter()
            .find(|(_, operator, _)| *operator == self)
            .unwrap_or(&OPERATOR_TABLE[0])
    }

    #[must_use]
    pub fn takes_list(self) -> bool {
        self == Self::In
    }

    /// Build the SQL comparison for a column. `values` holds exactly one value
    /// for every operator except `In`.
    pub fn to_sql<C: ColumnTrait>(self, column: C, mut values: Vec<Value>) -> Option<SimpleExpr> {
        Some(match self {
            Self::In => column.is_in(values),
            Self::Eq => column.eq(values.pop()?),
            Self::Gt => column.gt(values.pop()?),
            Self::Gte => column.gte(values.pop()?),
            Self::Lt => column.lt(values.pop()?),
            Self::Lte => column.lte(values.pop()?),
        })
    }
}
