use super::pagination::Page;
use super::predicate::Filter;
use super::projection::Projection;
use super::search::TextSearch;
use super::sort::SortKey;

/// A not-yet-executed query against a document collection.
///
/// Every method is a pure shaping step: nothing is validated or executed until
/// the implementation's own `fetch`, which is where invalid fields, bad
/// literals or an impossible projection are reported.
///
/// Each method touches one independent part of the query, so the order in
/// which they are called does not change the result:
/// - `find_matching` and `text_search` AND onto the existing conditions
/// - `sort_by`, `project`, `skip` and `limit` replace their previous setting
pub trait DocumentQuery: Sized {
    #[must_use]
    fn find_matching(self, filter: Filter) -> Self;

    #[must_use]
    fn sort_by(self, keys: Vec<SortKey>) -> Self;

    #[must_use]
    fn project(self, projection: Projection) -> Self;

    #[must_use]
    fn skip(self, count: u64) -> Self;

    #[must_use]
    fn limit(self, count: u64) -> Self;

    #[must_use]
    fn text_search(self, search: TextSearch) -> Self;

    /// Apply skip then limit for one page.
    #[must_use]
    fn paginate(self, page: Page) -> Self {
        self.skip(page.skip()).limit(page.limit)
    }
}
