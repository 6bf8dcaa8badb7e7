use super::pagination::Page;
use super::params::RawQueryParams;
use super::predicate::Filter;
use super::projection::Projection;
use super::query::DocumentQuery;
use super::search::TextSearch;
use super::sort::parse_sort;

/// Shapes a query from the parameters of one request.
///
/// The builder is a value: every step consumes it and hands back the updated
/// one, so a request handler reads top to bottom:
///
/// ```rust,ignore
/// let query = ApiFilters::new(SqlQuery::new(jobs::Entity::find()), params)
///     .filter()
///     .sort()
///     .limit_fields()
///     .search_by_query()
///     .pagination()
///     .into_query();
/// let rows = query.fetch(&db).await?;
/// ```
///
/// None of the steps fail. Malformed input falls back to a permissive default
/// and anything the store cannot run is reported by the store when the query
/// is executed.
#[derive(Debug, Clone)]
pub struct ApiFilters<Q> {
    query: Q,
    params: RawQueryParams,
}

impl<Q: DocumentQuery> ApiFilters<Q> {
    pub fn new(query: Q, params: RawQueryParams) -> Self {
        Self { query, params }
    }

    /// `salary[gt]=50000&jobType=Permanent` → `salary > 50000 AND jobType = Permanent`
    #[must_use]
    pub fn filter(self) -> Self {
        let filter = Filter::from_params(&self.params);
        self.map_query(|query| query.find_matching(filter))
    }

    /// `sort=salary,-jobType`; newest postings first when absent.
    #[must_use]
    pub fn sort(self) -> Self {
        let keys = parse_sort(self.params.text("sort"));
        self.map_query(|query| query.sort_by(keys))
    }

    /// `fields=title,company` or `fields=-salary`; hides `version` when absent.
    #[must_use]
    pub fn limit_fields(self) -> Self {
        let projection = Projection::parse(self.params.text("fields"));
        self.map_query(|query| query.project(projection))
    }

    /// `q=node-developer` → phrase search for `node developer`.
    #[must_use]
    pub fn search_by_query(self) -> Self {
        match self.params.text("q").and_then(TextSearch::from_query) {
            Some(search) => self.map_query(|query| query.text_search(search)),
            None => self,
        }
    }

    /// `page=2&limit=5` → skip 5, limit 5; page 1 of 10 when absent.
    #[must_use]
    pub fn pagination(self) -> Self {
        let page = self.page();
        self.map_query(|query| query.paginate(page))
    }

    /// Every step in the canonical order.
    #[must_use]
    pub fn apply_all(self) -> Self {
        self.filter()
            .sort()
            .limit_fields()
            .search_by_query()
            .pagination()
    }

    /// The page window these parameters ask for.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::from_params(self.params.text("page"), self.params.text("limit"))
    }

    #[must_use]
    pub fn params(&self) -> &RawQueryParams {
        &self.params
    }

    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn into_query(self) -> Q {
        self.query
    }

    fn map_query(self, step: impl FnOnce(Q) -> Q) -> Self {
        Self {
            query: step(self.query),
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{
        ComparisonOperator, FilterValue, Predicate, ProjectionMode, SortKey,
        projection::DEFAULT_EXCLUDED_FIELD, sort::DEFAULT_SORT_FIELD,
    };

    /// Records what the builder asked for without executing anything.
    #[derive(Debug, Default, Clone, PartialEq)]
    struct RecordingQuery {
        filter: Filter,
        sort: Vec<SortKey>,
        projection: Option<Projection>,
        skip: Option<u64>,
        limit: Option<u64>,
        search: Option<TextSearch>,
    }

    impl DocumentQuery for RecordingQuery {
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
            self.skip = Some(count);
            self
        }

        fn limit(mut self, count: u64) -> Self {
            self.limit = Some(count);
            self
        }

        fn text_search(mut self, search: TextSearch) -> Self {
            self.search = Some(search);
            self
        }
    }

    fn builder(pairs: &[(&str, &str)]) -> ApiFilters<RecordingQuery> {
        ApiFilters::new(
            RecordingQuery::default(),
            RawQueryParams::from_pairs(pairs.iter().copied()),
        )
    }

    #[test]
    fn test_empty_params_apply_defaults() {
        let query = builder(&[]).apply_all().into_query();

        assert!(query.filter.is_empty());
        assert_eq!(query.sort, vec![SortKey::desc(DEFAULT_SORT_FIELD)]);
        let projection = query.projection.unwrap();
        assert_eq!(projection.mode(), ProjectionMode::Exclude);
        assert_eq!(projection.fields().collect::<Vec<_>>(), vec![DEFAULT_EXCLUDED_FIELD]);
        assert_eq!(query.search, None);
        assert_eq!(query.skip, Some(0));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_full_request_shapes_every_part() {
        let query = builder(&[
            ("salary[gt]", "50000"),
            ("sort", "-salary"),
            ("fields", "title,company"),
            ("limit", "5"),
            ("page", "2"),
            ("q", "node-developer"),
        ])
        .apply_all()
        .into_query();

        assert_eq!(
            query.filter.predicates(),
            &[Predicate::new(
                "salary",
                ComparisonOperator::Gt,
                FilterValue::Single("50000".to_string())
            )]
        );
        assert_eq!(query.sort, vec![SortKey::desc("salary")]);
        assert_eq!(
            query.projection.unwrap().fields().collect::<Vec<_>>(),
            vec!["title", "company"]
        );
        assert_eq!(query.search.unwrap().phrase(), "node developer");
        assert_eq!(query.skip, Some(5));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_search_without_q_leaves_query_untouched() {
        let before = builder(&[("title", "x")]);
        let after = before.clone().search_by_query();
        assert_eq!(before.query(), after.query());
    }

    #[test]
    fn test_step_order_does_not_matter() {
        let pairs = [
            ("jobType", "Permanent"),
            ("sort", "salary,-postingDate"),
            ("fields", "-description"),
            ("q", "rust"),
            ("page", "3"),
            ("limit", "4"),
        ];

        let canonical = builder(&pairs).apply_all().into_query();
        let reversed = builder(&pairs)
            .pagination()
            .search_by_query()
            .limit_fields()
            .sort()
            .filter()
            .into_query();

        assert_eq!(canonical, reversed);
    }

    #[test]
    fn test_page_reads_params() {
        let filters = builder(&[("page", "4"), ("limit", "25")]);
        assert_eq!(filters.page(), Page { page: 4, limit: 25 });
    }
}
