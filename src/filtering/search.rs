/// Free-text phrase lookup against a store's text index.
///
/// URLs carry phrases hyphenated (`q=node-developer`); the hyphens stand for
/// spaces, so the phrase searched is `node developer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    phrase: String,
}

impl TextSearch {
    /// A phrase taken as written, trimmed. Blank phrases search nothing.
    #[must_use]
    pub fn new(phrase: &str) -> Option<Self> {
        let phrase = phrase.trim();
        (!phrase.is_empty()).then(|| Self {
            phrase: phrase.to_string(),
        })
    }

    #[must_use]
    pub fn from_query(q: &str) -> Option<Self> {
        Self::new(&q.replace('-', " "))
    }

    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// The phrase wrapped in double quotes, which text engines read as
    /// "match this exact phrase".
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphens_become_spaces() {
        let search = TextSearch::from_query("node-developer").unwrap();
        assert_eq!(search.phrase(), "node developer");
        assert_eq!(search.quoted(), "\"node developer\"");
    }

    #[test]
    fn test_blank_query_is_no_search() {
        assert_eq!(TextSearch::from_query(""), None);
        assert_eq!(TextSearch::from_query("--"), None);
    }
}
