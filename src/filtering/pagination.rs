use axum::http::header::HeaderMap;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// 1-based page window over a result set.
///
/// `limit` has no upper bound; a caller can ask for every row in one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Missing, non-numeric and zero values fall back to the defaults.
    #[must_use]
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: page.and_then(parse_positive).unwrap_or(DEFAULT_PAGE),
            limit: limit.and_then(parse_positive).unwrap_or(DEFAULT_LIMIT),
        }
    }

    #[must_use]
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Lenient integer read: optional leading whitespace and `+`, then as many
/// digits as are present. `"5"`, `" 5"` and `"5abc"` all read as 5.
fn parse_positive(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(index, _)| index);

    raw[..end].parse::<u64>().ok().filter(|value| *value > 0)
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Build the `Content-Range` header for one page of a listing, e.g.
/// `jobs 5-9/42`. An empty page reports `jobs */42`.
#[must_use]
pub fn calculate_content_range(skip: u64, returned: usize, total_count: u64, resource_name: &str) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);

    let content_range = if returned == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        let last = skip.saturating_add(returned as u64 - 1);
        format!("{safe_name} {skip}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
