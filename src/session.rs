use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::extractor::{self, BatchExtraction, MatchSet};
use crate::patterns::{ExtractionType, PatternRegistry};
use crate::store::AggregateStore;
use crate::text::{self, TextStats, TypeCounts};

/// One editing session: the custom rule, the accumulated results and settings.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: PatternRegistry,
    store: AggregateStore,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            registry: PatternRegistry::with_size_limit(config.custom_size_limit),
            store: AggregateStore::new(),
            config,
        }
    }

    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one recognizer and records its result. `Custom` uses the rule last set.
    pub fn extract(&mut self, kind: ExtractionType, text: &str) -> Result<MatchSet> {
        let matches = extractor::extract(&self.registry, kind, text)?;
        self.store.put(kind, matches.clone());
        Ok(matches)
    }

    pub fn extract_custom(&mut self, pattern: &str, text: &str) -> Result<MatchSet> {
        let matches = extractor::extract_custom(&mut self.registry, pattern, text)?;
        self.store.put(ExtractionType::Custom, matches.clone());
        Ok(matches)
    }

    pub fn extract_full_text(&mut self, text: &str) -> Result<TextStats> {
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }
        self.store.put_full_text(text);
        Ok(text::text_stats(text))
    }

    /// Batch over every type, storing each success, then captures the full text.
    pub fn extract_all(&mut self, text: &str, custom_pattern: Option<&str>) -> BatchExtraction {
        self.extract_types(&ExtractionType::ALL, text, custom_pattern)
    }

    /// Batch over `types`, each at most once. `Custom` runs last and only with a
    /// non-blank pattern.
    pub fn extract_types(
        &mut self,
        types: &[ExtractionType],
        text: &str,
        custom_pattern: Option<&str>,
    ) -> BatchExtraction {
        let mut ordered: Vec<ExtractionType> = Vec::with_capacity(types.len());
        for &kind in types.iter().filter(|kind| **kind != ExtractionType::Custom) {
            if !ordered.contains(&kind) {
                ordered.push(kind);
            }
        }
        if types.contains(&ExtractionType::Custom) {
            ordered.push(ExtractionType::Custom);
        }

        let batch = extractor::extract_all(&mut self.registry, &ordered, text, custom_pattern);

        for (kind, matches) in &batch.results {
            self.store.put(*kind, matches.clone());
        }
        if !text.trim().is_empty() {
            self.store.put_full_text(text);
        }
        info!(
            extracted = batch.results.len(),
            failed = batch.failures.len(),
            "batch extraction finished"
        );

        batch
    }

    /// Drops every result and the custom rule.
    pub fn clear(&mut self) {
        self.store.clear();
        self.registry.clear_custom();
        info!("session cleared");
    }

    pub fn export(&self, format: ExportFormat) -> Result<ExportArtifact> {
        export::export(&self.store, format, self.config.csv_commas, &Local::now())
    }

    pub fn export_full_text(&self) -> Result<ExportArtifact> {
        export::export_full_text(&self.store, &Local::now())
    }

    pub fn copy_all(&self) -> Result<String> {
        export::copy_all(&self.store)
    }

    pub fn counts(&self) -> TypeCounts {
        text::type_counts(&self.store)
    }

    pub fn stats(&self) -> Option<TextStats> {
        self.store.full_text().map(text::text_stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Mail a@b.com or call 555-123-4567 before 2024-01-15.\nRef INV-7 and inv-7.";

    #[test]
    fn test_extract_stores_result() {
        let mut session = Session::default();
        let emails = session.extract(ExtractionType::Email, SAMPLE).unwrap();
        assert_eq!(emails.as_slice(), &["a@b.com"]);
        assert_eq!(session.store().matches(ExtractionType::Email), Some(&emails));
    }

    #[test]
    fn test_empty_input_leaves_store_untouched() {
        let mut session = Session::default();
        assert!(session.extract(ExtractionType::Email, "  ").is_err());
        assert!(session.extract_full_text("").is_err());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_custom_extraction() {
        let mut session = Session::default();
        let found = session.extract_custom(r"inv-\d+", SAMPLE).unwrap();
        assert_eq!(found.as_slice(), &["INV-7", "inv-7"]);
    }

    #[test]
    fn test_invalid_custom_keeps_prior_result() {
        let mut session = Session::default();
        session.extract_custom(r"inv-\d+", SAMPLE).unwrap();

        let err = session.extract_custom("(", SAMPLE).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPattern { .. }));
        assert_eq!(session.store().matches(ExtractionType::Custom).unwrap().len(), 2);
    }

    #[test]
    fn test_extract_all_captures_everything() {
        let mut session = Session::default();
        let batch = session.extract_all(SAMPLE, Some(r"inv-\d+"));

        assert!(batch.is_complete());
        assert_eq!(session.store().len(), 7);
        assert_eq!(session.store().full_text(), Some(SAMPLE));
        assert_eq!(session.counts().0[0], ("Emails", 1));
    }

    #[test]
    fn test_extract_all_with_bad_custom() {
        let mut session = Session::default();
        let batch = session.extract_all(SAMPLE, Some("[z-a]"));

        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failure(ExtractionType::Custom).is_some());
        assert!(session.store().matches(ExtractionType::Custom).is_none());
        assert!(session.store().matches(ExtractionType::Phone).is_some());
    }

    #[test]
    fn test_repeated_types_run_once() {
        let mut session = Session::default();
        let types = [ExtractionType::Custom, ExtractionType::Email, ExtractionType::Email, ExtractionType::Custom];
        let batch = session.extract_types(&types, SAMPLE, Some(r"inv-\d+"));

        let kinds: Vec<ExtractionType> = batch.results.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![ExtractionType::Email, ExtractionType::Custom]);
    }

    #[test]
    fn test_custom_on_blank_text_keeps_rule() {
        let mut session = Session::default();
        session.extract_custom(r"inv-\d+", SAMPLE).unwrap();

        assert!(matches!(session.extract_custom("other", "  "), Err(ExtractError::EmptyInput)));
        assert_eq!(session.registry().custom_rule().unwrap().pattern(), r"inv-\d+");
        assert_eq!(session.store().matches(ExtractionType::Custom).unwrap().len(), 2);
    }

    #[test]
    fn test_custom_size_limit_from_config() {
        let config = Config {
            custom_size_limit: 64,
            ..Config::default()
        };
        let mut session = Session::new(config);
        assert!(matches!(
            session.extract_custom(r"\w{50}", SAMPLE),
            Err(ExtractError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_clear_resets_custom_rule() {
        let mut session = Session::default();
        session.extract_custom("a", SAMPLE).unwrap();
        session.clear();

        assert!(session.store().is_empty());
        assert!(session.registry().custom_rule().is_none());
        assert!(session.extract(ExtractionType::Custom, SAMPLE).is_err());
        assert!(matches!(session.export(ExportFormat::Json), Err(ExtractError::EmptyStore)));
    }

    #[test]
    fn test_stats_after_full_text() {
        let mut session = Session::default();
        assert!(session.stats().is_none());
        session.extract_full_text("one two\nthree").unwrap();
        assert_eq!(session.stats().unwrap().words, 3);
    }
}
