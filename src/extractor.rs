use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::patterns::{ExtractionType, PatternRegistry};

/// Distinct matches in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchSet(Vec<String>);

impl<'de> Deserialize<'de> for MatchSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(dedupe)
    }
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl FromIterator<String> for MatchSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        dedupe(iter)
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Drops later duplicates, keeping the position of the first occurrence.
pub fn dedupe<I: IntoIterator<Item = String>>(values: I) -> MatchSet {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for value in values {
        if seen.insert(value.clone()) {
            results.push(value);
        }
    }

    MatchSet(results)
}

pub fn extract(registry: &PatternRegistry, kind: ExtractionType, text: &str) -> Result<MatchSet> {
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    let rule = registry.get_rule(kind)?;
    let results = dedupe(rule.find_all(text));
    debug!(kind = %kind, matches = results.len(), "extraction finished");

    Ok(results)
}

/// Parses the type name first so integrations passing free-form names get `UnknownType`.
pub fn extract_by_name(registry: &PatternRegistry, name: &str, text: &str) -> Result<MatchSet> {
    extract(registry, name.parse()?, text)
}

/// Outcome of running several recognizers over one text snapshot.
#[derive(Debug, Default)]
pub struct BatchExtraction {
    pub results: Vec<(ExtractionType, MatchSet)>,
    pub failures: Vec<(ExtractionType, ExtractError)>,
    pub full_text: String,
}

impl BatchExtraction {
    pub fn get(&self, kind: ExtractionType) -> Option<&MatchSet> {
        self.results.iter().find(|(k, _)| *k == kind).map(|(_, matches)| matches)
    }

    pub fn failure(&self, kind: ExtractionType) -> Option<&ExtractError> {
        self.failures.iter().find(|(k, _)| *k == kind).map(|(_, err)| err)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Installs `pattern` as the custom rule, then runs it. Blank text leaves the
/// registry untouched.
pub fn extract_custom(registry: &mut PatternRegistry, pattern: &str, text: &str) -> Result<MatchSet> {
    if text.trim().is_empty() {
        return Err(ExtractError::EmptyInput);
    }
    registry.set_custom_rule(pattern)?;
    extract(registry, ExtractionType::Custom, text)
}

/// Runs every requested type against `text`. A blank or missing custom
/// pattern skips `Custom`; every other failure is recorded and the batch continues.
pub fn extract_all(
    registry: &mut PatternRegistry,
    types: &[ExtractionType],
    text: &str,
    custom_pattern: Option<&str>,
) -> BatchExtraction {
    let custom_pattern = custom_pattern.filter(|p| !p.trim().is_empty());
    let mut batch = BatchExtraction {
        full_text: text.to_string(),
        ..Default::default()
    };

    for &kind in types {
        let outcome = if kind == ExtractionType::Custom {
            match custom_pattern {
                None => continue,
                Some(pattern) => extract_custom(registry, pattern, text),
            }
        } else {
            extract(registry, kind, text)
        };

        match outcome {
            Ok(matches) => batch.results.push((kind, matches)),
            Err(err) => {
                warn!(kind = %kind, error = %err, "extraction failed");
                batch.failures.push((kind, err));
            }
        }
    }

    batch
}
