use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractError;
use crate::extractor::MatchSet;
use crate::patterns::ExtractionType;

/// Key name of the complete source text, kept for existing JSON consumers.
pub const FULL_TEXT_KEY: &str = "allText";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Type(ExtractionType),
    FullText,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Type(kind) => kind.as_str(),
            StoreKey::FullText => FULL_TEXT_KEY,
        }
    }

    pub fn parse(name: &str) -> Result<Self, ExtractError> {
        if name == FULL_TEXT_KEY {
            Ok(StoreKey::FullText)
        } else {
            name.parse().map(StoreKey::Type)
        }
    }
}

impl From<ExtractionType> for StoreKey {
    fn from(kind: ExtractionType) -> Self {
        StoreKey::Type(kind)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Text(String),
    Matches(MatchSet),
}

impl StoreValue {
    pub fn as_matches(&self) -> Option<&MatchSet> {
        match self {
            StoreValue::Matches(matches) => Some(matches),
            StoreValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoreValue::Text(text) => Some(text),
            StoreValue::Matches(_) => None,
        }
    }
}

impl From<MatchSet> for StoreValue {
    fn from(matches: MatchSet) -> Self {
        StoreValue::Matches(matches)
    }
}

impl From<String> for StoreValue {
    fn from(text: String) -> Self {
        StoreValue::Text(text)
    }
}

/// Session-scoped results, keyed by extraction type, in insertion order.
///
/// A key is present only once its extraction has run; a present key with an
/// empty `MatchSet` means "extracted, nothing found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStore {
    entries: Vec<(StoreKey, StoreValue)>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any previous value; an existing key keeps its original position.
    pub fn put(&mut self, key: impl Into<StoreKey>, value: impl Into<StoreValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn put_matches(&mut self, kind: ExtractionType, matches: MatchSet) {
        self.put(kind, matches);
    }

    pub fn put_full_text(&mut self, text: impl Into<String>) {
        self.put(StoreKey::FullText, StoreValue::Text(text.into()));
    }

    pub fn get(&self, key: impl Into<StoreKey>) -> Option<&StoreValue> {
        let key = key.into();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn matches(&self, kind: ExtractionType) -> Option<&MatchSet> {
        self.get(kind).and_then(StoreValue::as_matches)
    }

    pub fn full_text(&self) -> Option<&str> {
        self.get(StoreKey::FullText).and_then(StoreValue::as_text)
    }

    pub fn contains(&self, key: impl Into<StoreKey>) -> bool {
        self.get(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StoreKey, &StoreValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl Serialize for AggregateStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

struct StoreVisitor;

impl<'de> Visitor<'de> for StoreVisitor {
    type Value = AggregateStore;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of extraction type to matches or text")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut store = AggregateStore::new();

        while let Some(name) = access.next_key::<String>()? {
            let key = StoreKey::parse(&name).map_err(serde::de::Error::custom)?;
            let value: StoreValue = access.next_value()?;

            let consistent = matches!(
                (key, &value),
                (StoreKey::FullText, StoreValue::Text(_)) | (StoreKey::Type(_), StoreValue::Matches(_))
            );
            if !consistent {
                return Err(serde::de::Error::custom(format!("unexpected value shape for '{}'", name)));
            }

            store.put(key, value);
        }

        Ok(store)
    }
}

impl<'de> Deserialize<'de> for AggregateStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StoreVisitor)
    }
}
