/// Internal revision counter hidden from responses unless asked for.
pub const DEFAULT_EXCLUDED_FIELD: &str = "version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    pub field: String,
    pub excluded: bool,
}

/// How a projection reads once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Keep only the listed fields.
    Include,
    /// Keep everything except the listed fields.
    Exclude,
    /// Both forms in one list; stores reject this when the query runs.
    Mixed,
}

/// Fields selected by `fields=title,company` or dropped by `fields=-salary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    selectors: Vec<FieldSelector>,
}

impl Projection {
    #[must_use]
    pub fn parse(spec: Option<&str>) -> Self {
        let selectors: Vec<FieldSelector> = spec
            .map(|spec| spec.split(',').filter_map(parse_selector).collect())
            .unwrap_or_default();

        if selectors.is_empty() {
            Self::default()
        } else {
            Self { selectors }
        }
    }

    #[must_use]
    pub fn selectors(&self) -> &[FieldSelector] {
        &self.selectors
    }

    #[must_use]
    pub fn mode(&self) -> ProjectionMode {
        let excluded = self.selectors.iter().filter(|s| s.excluded).count();
        if excluded == 0 {
            ProjectionMode::Include
        } else if excluded == self.selectors.len() {
            ProjectionMode::Exclude
        } else {
            ProjectionMode::Mixed
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(|s| s.field.as_str())
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            selectors: vec![FieldSelector {
                field: DEFAULT_EXCLUDED_FIELD.to_string(),
                excluded: true,
            }],
        }
    }
}

fn parse_selector(segment: &str) -> Option<FieldSelector> {
    let segment = segment.trim();
    let (field, excluded) = match segment.strip_prefix('-') {
        Some(field) => (field.trim(), true),
        None => (segment, false),
    };
    (!field.is_empty()).then(|| FieldSelector {
        field: field.to_string(),
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_hides_version() {
        let projection = Projection::parse(None);
        assert_eq!(projection.mode(), ProjectionMode::Exclude);
        assert_eq!(projection.fields().collect::<Vec<_>>(), vec![DEFAULT_EXCLUDED_FIELD]);
    }

    #[test]
    fn test_inclusion_list() {
        let projection = Projection::parse(Some("title, company"));
        assert_eq!(projection.mode(), ProjectionMode::Include);
        assert_eq!(projection.fields().collect::<Vec<_>>(), vec!["title", "company"]);
    }

    #[test]
    fn test_exclusion_list() {
        let projection = Projection::parse(Some("-salary,-description"));
        assert_eq!(projection.mode(), ProjectionMode::Exclude);
    }

    #[test]
    fn test_mixed_list_is_reported_not_fixed() {
        let projection = Projection::parse(Some("title,-salary"));
        assert_eq!(projection.mode(), ProjectionMode::Mixed);
        assert_eq!(projection.selectors().len(), 2);
    }

    #[test]
    fn test_blank_segments_fall_back_to_default() {
        assert_eq!(Projection::parse(Some(" , - ")), Projection::default());
    }
}
