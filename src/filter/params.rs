use crate::filter::state::ANY;
use std::fmt::{Display, Formatter};

/// A single query parameter value after type normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Text(String),
    Numbers(Vec<Option<f64>>),
    Texts(Vec<Option<String>>),
}

impl ParamValue {
    /// True when the value leaves its dimension unconstrained.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Text(text) => text.is_empty() || text == ANY,
            ParamValue::Numbers(numbers) => numbers.iter().all(Option::is_none),
            ParamValue::Texts(texts) => texts.iter().all(Option::is_none),
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            ParamValue::Text(text) => write!(f, "{text}"),
            ParamValue::Numbers(numbers) => {
                let joined = numbers
                    .iter()
                    .map(|n| n.map(|n| n.to_string()).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
            ParamValue::Texts(texts) => {
                let joined = texts
                    .iter()
                    .map(|t| t.clone().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{joined}")
            }
        }
    }
}

/// Ordered key/value view of a query string.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryParams(Vec<(String, ParamValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later values for the same key replace earlier ones in place.
    pub fn insert(&mut self, key: &str, value: ParamValue) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drops every entry that leaves its dimension unconstrained: null, `"any"`,
    /// the empty string, and lists made only of nulls. Lists holding at least
    /// one value are kept with their nulls.
    pub fn cleaned(self) -> Self {
        QueryParams(
            self.0
                .into_iter()
                .filter(|(_, value)| !value.is_unconstrained())
                .collect(),
        )
    }
}

impl FromIterator<(String, ParamValue)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(&key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: Vec<(&str, ParamValue)>) -> QueryParams {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn cleaning_drops_unconstrained_entries() {
        let cleaned = params(vec![
            ("location", ParamValue::Text("Minsk".to_string())),
            ("status", ParamValue::Text("any".to_string())),
            ("currency", ParamValue::Text("".to_string())),
            ("eventType", ParamValue::Null),
            ("priceRange", ParamValue::Numbers(vec![None, None])),
            ("dateRange", ParamValue::Texts(vec![None, None])),
        ])
        .cleaned();

        assert_eq!(cleaned.len(), 1);
        assert!(cleaned.contains_key("location"));
    }

    #[test]
    fn cleaning_keeps_partial_null_lists() {
        let cleaned = params(vec![(
            "priceRange",
            ParamValue::Numbers(vec![Some(500.0), None]),
        )])
        .cleaned();
        assert_eq!(
            cleaned.get("priceRange"),
            Some(&ParamValue::Numbers(vec![Some(500.0), None]))
        );
    }

    #[test]
    fn cleaning_drops_empty_lists() {
        let cleaned = params(vec![("eventProperties", ParamValue::Texts(vec![]))]).cleaned();
        assert!(cleaned.is_empty());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut query = QueryParams::new();
        query.insert("a", ParamValue::Text("1".to_string()));
        query.insert("b", ParamValue::Text("2".to_string()));
        query.insert("a", ParamValue::Text("3".to_string()));
        let keys = query.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(query.get("a"), Some(&ParamValue::Text("3".to_string())));
    }

    #[test]
    fn lists_join_with_commas() {
        assert_eq!(
            ParamValue::Numbers(vec![Some(500.0), None]).to_string(),
            "500,"
        );
        assert_eq!(
            ParamValue::Texts(vec![None, Some("2024-02-01".to_string())]).to_string(),
            ",2024-02-01"
        );
    }
}
