//! Decoded query-string parameters.
//!
//! Keys follow the bracket convention used by most query-string encoders:
//! `salary=50000` is a plain value, `salary[gt]=50000` is an operator entry
//! grouped under `salary`. Nothing here interprets the operator keywords; that
//! happens in [`Filter::from_params`](super::predicate::Filter::from_params).

/// Keys consumed by the builder itself rather than turned into predicates.
pub const RESERVED_KEYS: [&str; 5] = ["sort", "fields", "q", "limit", "page"];

#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Plain keys whose repeated values all count, as `positions=1&positions=2`.
/// Every other repeated plain key keeps only its last value.
pub const MULTI_VALUE_KEYS: [&str; 1] = ["positions"];

#[must_use]
pub fn is_multi_value(key: &str) -> bool {
    MULTI_VALUE_KEYS.contains(&key)
}

/// The value stored under one parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// `key=value`
    Text(String),
    /// `key=a&key=b`
    List(Vec<String>),
    /// `key[op]=value`, in first-seen order of the operator keyword.
    Operators(Vec<(String, Vec<String>)>),
}

impl ParamValue {
    /// The effective scalar for a plain key: the last value wins when a key is
    /// repeated. Operator groups have no scalar.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::List(values) => values.last().map(String::as_str),
            Self::Operators(_) => None,
        }
    }
}

/// Ordered mapping of parameter keys to values, in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl RawQueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still percent-encoded) query string such as
    /// `salary%5Bgt%5D=50000&sort=-salary`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()))
    }

    /// Build from already decoded `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.insert(key.as_ref(), value.into());
        }
        params
    }

    /// Insert one decoded pair, merging with any earlier value for the key.
    pub fn insert(&mut self, key: &str, value: String) {
        match split_operator_key(key) {
            Some((field, operator)) => self.insert_operator(field, operator, value),
            None => self.insert_plain(key, value),
        }
    }

    fn insert_plain(&mut self, key: &str, value: String) {
        match self.position(key, false) {
            Some(index) => {
                let slot = &mut self.entries[index].1;
                *slot = match std::mem::replace(slot, ParamValue::List(Vec::new())) {
                    ParamValue::Text(previous) => ParamValue::List(vec![previous, value]),
                    ParamValue::List(mut values) => {
                        values.push(value);
                        ParamValue::List(values)
                    }
                    operators @ ParamValue::Operators(_) => operators,
                };
            }
            None => self.entries.push((key.to_string(), ParamValue::Text(value))),
        }
    }

    fn insert_operator(&mut self, field: &str, operator: &str, value: String) {
        let index = if let Some(index) = self.position(field, true) {
            index
        } else {
            self.entries
                .push((field.to_string(), ParamValue::Operators(Vec::new())));
            self.entries.len() - 1
        };

        if let ParamValue::Operators(operators) = &mut self.entries[index].1 {
            match operators.iter_mut().find(|(name, _)| name == operator) {
                Some((_, values)) => values.push(value),
                None => operators.push((operator.to_string(), vec![value])),
            }
        }
    }

    /// A key holds at most one plain entry and one operator entry.
    fn position(&self, key: &str, operators: bool) -> Option<usize> {
        self.entries.iter().position(|(name, value)| {
            name == key && matches!(value, ParamValue::Operators(_)) == operators
        })
    }

    /// The plain value of `key` when there is one, otherwise its operator group.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .filter(|(name, _)| name == key)
            .min_by_key(|(_, value)| matches!(value, ParamValue::Operators(_)))
            .map(|(_, value)| value)
    }

    /// Scalar value of a plain key. Empty strings count as absent, matching how
    /// an empty `?sort=` is treated as "no sort given".
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(ParamValue::last)
            .filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Keys that are not reserved, i.e. the ones that become predicates.
    pub fn predicate_entries(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.iter().filter(|(name, _)| !is_reserved(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawQueryParams
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Split `field[op]` into `("field", "op")`. Anything else is a plain key.
fn split_operator_key(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_suffix(']')?;
    let open = inner.find('[')?;
    let (field, operator) = (&inner[..open], &inner[open + 1..]);
    if field.is_empty() || operator.is_empty() || operator.contains(['[', ']']) {
        return None;
    }
    Some((field, operator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_operator_keys() {
        let params = RawQueryParams::from_pairs([
            ("jobType", "Permanent"),
            ("salary[gt]", "50000"),
            ("salary[lte]", "90000"),
        ]);

        assert_eq!(
            params.get("jobType"),
            Some(&ParamValue::Text("Permanent".to_string()))
        );
        assert_eq!(
            params.get("salary"),
            Some(&ParamValue::Operators(vec![
                ("gt".to_string(), vec!["50000".to_string()]),
                ("lte".to_string(), vec!["90000".to_string()]),
            ]))
        );
    }

    #[test]
    fn test_repeated_plain_key_keeps_every_value_last_wins() {
        let params = RawQueryParams::from_pairs([("sort", "jobType"), ("sort", "salary")]);
        assert_eq!(
            params.get("sort"),
            Some(&ParamValue::List(vec![
                "jobType".to_string(),
                "salary".to_string()
            ]))
        );
        assert_eq!(params.text("sort"), Some("salary"));
    }

    #[test]
    fn test_plain_and_operator_on_same_key_are_both_kept() {
        for pairs in [
            [("salary", "60000"), ("salary[gt]", "1")],
            [("salary[gt]", "1"), ("salary", "60000")],
        ] {
            let params = RawQueryParams::from_pairs(pairs);
            let values: Vec<&ParamValue> = params.iter().map(|(_, value)| value).collect();
            assert_eq!(values.len(), 2);
            assert!(values.contains(&&ParamValue::Text("60000".to_string())));
            assert!(values.contains(&&ParamValue::Operators(vec![(
                "gt".to_string(),
                vec!["1".to_string()]
            )])));
            assert_eq!(params.text("salary"), Some("60000"));
        }
    }

    #[test]
    fn test_repeated_operator_accumulates() {
        let params =
            RawQueryParams::from_pairs([("jobType[in]", "Permanent"), ("jobType[in]", "Internship")]);
        assert_eq!(
            params.get("jobType"),
            Some(&ParamValue::Operators(vec![(
                "in".to_string(),
                vec!["Permanent".to_string(), "Internship".to_string()]
            )]))
        );
    }

    #[test]
    fn test_parse_percent_encoded_query() {
        let params = RawQueryParams::parse("?salary%5Bgt%5D=50000&q=node-developer&title=Rust+Dev");
        assert!(matches!(params.get("salary"), Some(ParamValue::Operators(_))));
        assert_eq!(params.text("q"), Some("node-developer"));
        assert_eq!(params.text("title"), Some("Rust Dev"));
    }

    #[test]
    fn test_malformed_brackets_are_plain_keys() {
        for key in ["a[gt", "[gt]", "a[]", "a[b[c]]"] {
            assert_eq!(split_operator_key(key), None, "key {key}");
        }
        let params = RawQueryParams::from_pairs([("a[gt", "1")]);
        assert_eq!(params.text("a[gt"), Some("1"));
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let params = RawQueryParams::from_pairs([("sort", "")]);
        assert!(params.get("sort").is_some());
        assert_eq!(params.text("sort"), None);
    }

    #[test]
    fn test_predicate_entries_skip_reserved_keys() {
        let params = RawQueryParams::from_pairs([
            ("sort", "-salary"),
            ("fields", "title"),
            ("q", "rust"),
            ("limit", "5"),
            ("page", "2"),
            ("company", "Acme"),
        ]);
        let keys: Vec<&str> = params.predicate_entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["company"]);
    }
}
