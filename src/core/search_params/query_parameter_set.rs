use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key/value view of a URL query string.
///
/// A key mapped to `None` is "absent": it is carried through [`overlay`]
/// so that a merge can remove a key, but it is never written into a query
/// string and never produced by [`parse`].
///
/// [`overlay`]: QueryParameterSet::overlay
/// [`parse`]: QueryParameterSet::parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParameterSet(BTreeMap<String, Option<String>>);

impl QueryParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Never fails: undecodable segments are kept verbatim and a duplicated
    /// key keeps its last value.
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut params = BTreeMap::new();

        for segment in search.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.insert(decode_component(key), Some(decode_component(value)));
        }

        Self(params)
    }

    /// Serialize present keys as `k=v` pairs joined by `&`.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|v| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(v))
                })
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key`; `None` marks it absent.
    pub fn insert<K, V>(&mut self, key: K, value: Option<V>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.map(Into::into));
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, Some(value));
        self
    }

    pub fn without<K: Into<String>>(mut self, key: K) -> Self {
        self.insert::<K, String>(key, None);
        self
    }

    /// Right-biased key overwrite: every key mentioned in `other` wins.
    pub fn overlay(&self, other: &QueryParameterSet) -> QueryParameterSet {
        let mut merged = self.0.clone();
        for (key, value) in &other.0 {
            merged.insert(key.clone(), value.clone());
        }
        Self(merged)
    }

    /// Drop absent keys.
    pub fn present(&self) -> QueryParameterSet {
        Self(
            self.0
                .iter()
                .filter(|(_, v)| v.is_some())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Iterate present keys only.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_and_keeps_unknown_keys() {
        let params = QueryParameterSet::parse("?from=2024-01-01&q=hello+world&utm=%E4%BD%A0");
        assert_eq!(params.get("from"), Some("2024-01-01"));
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("utm"), Some("你"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn parse_handles_bare_keys_duplicates_and_garbage() {
        let params = QueryParameterSet::parse("flag&&a=1&a=2&bad=%FF");
        assert_eq!(params.get("flag"), Some(""));
        assert_eq!(params.get("a"), Some("2"));
        assert_eq!(params.get("bad"), Some("%FF"));
        assert!(QueryParameterSet::parse("").is_empty());
        assert!(QueryParameterSet::parse("?").is_empty());
    }

    #[test]
    fn absent_keys_are_never_serialized() {
        let params = QueryParameterSet::new()
            .with("a", "1")
            .without("b")
            .with("c", "x y&z");
        assert_eq!(params.to_query_string(), "a=1&c=x%20y%26z");
        assert!(!params.contains("b"));
    }

    #[test]
    fn overlay_is_right_biased_and_can_remove() {
        let base: QueryParameterSet = [("a", "1"), ("b", "2")].into_iter().collect();
        let patch = QueryParameterSet::new().with("a", "3").without("b").with("c", "4");

        let merged = base.overlay(&patch);
        assert_eq!(merged.get("a"), Some("3"));
        assert_eq!(merged.get("b"), None);
        assert_eq!(merged.get("c"), Some("4"));
        assert_eq!(merged.to_query_string(), "a=3&c=4");
    }

    #[test]
    fn serialized_output_parses_back_to_same_present_keys() {
        let params = QueryParameterSet::new()
            .with("from", "2024-01-01T00:00:00+08:00")
            .with("empty", "");
        let reparsed = QueryParameterSet::parse(&params.to_query_string());
        assert_eq!(reparsed, params.present());
    }
}
