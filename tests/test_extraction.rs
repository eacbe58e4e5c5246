use serde_json::Value;
use text_extractor::export::{to_csv, to_json, to_report};
use text_extractor::{
    extract, extract_all, AggregateStore, CsvCommaMode, ExportFormat, ExtractError, ExtractionType, PatternRegistry,
    Session, StoreValue,
};

const DOCUMENT: &str = "\
Invoice INV-2041 issued 2024-03-01 to billing@acme.io.
Questions? Call (555) 123-4567 or visit https://acme.io/help?topic=billing today.

Amount due: 1299.50 by March 31, 2024; contact billing@acme.io again.";

#[test]
fn test_dedup_order() {
    let registry = PatternRegistry::new();
    let results = extract(&registry, ExtractionType::Email, "a@b.com x a@b.com y c@d.com").unwrap();
    assert_eq!(results.as_slice(), &["a@b.com", "c@d.com"]);
}

#[test]
fn test_empty_input_rejection() {
    let registry = PatternRegistry::new();
    for kind in ExtractionType::BUILT_IN {
        for text in ["", "   "] {
            assert!(
                matches!(extract(&registry, kind, text), Err(ExtractError::EmptyInput)),
                "{} should reject {:?}",
                kind,
                text
            );
        }
    }
}

#[test]
fn test_idempotent_re_extraction() {
    let registry = PatternRegistry::new();
    for kind in ExtractionType::BUILT_IN {
        let first = extract(&registry, kind, DOCUMENT).unwrap();
        let second = extract(&registry, kind, DOCUMENT).unwrap();
        assert_eq!(first, second, "Re-extraction should be stable for {}", kind);
    }
}

#[test]
fn test_batch_isolation() {
    let mut registry = PatternRegistry::new();
    let batch = extract_all(
        &mut registry,
        &[ExtractionType::Email, ExtractionType::Custom],
        DOCUMENT,
        Some("[unterminated"),
    );

    assert_eq!(batch.get(ExtractionType::Email).unwrap().as_slice(), &["billing@acme.io"]);
    assert!(matches!(
        batch.failure(ExtractionType::Custom),
        Some(ExtractError::InvalidPattern { .. })
    ));
    assert_eq!(batch.full_text, DOCUMENT);
}

#[test]
fn test_round_trip_export() {
    let mut session = Session::default();
    session.extract_all(DOCUMENT, Some(r"inv-\d+"));

    let json = to_json(session.store()).unwrap();
    let parsed: AggregateStore = serde_json::from_str(&json).unwrap();
    assert_eq!(&parsed, session.store());

    let raw: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(raw["allText"], Value::String(DOCUMENT.to_string()));
    assert_eq!(raw["custom"], serde_json::json!(["INV-2041"]));
}

#[test]
fn test_csv_line_accounting() {
    let mut store = AggregateStore::new();
    store.put_full_text("line1\n\nline3");

    let csv = to_csv(&store, CsvCommaMode::Backslash).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows, vec!["\"allText\",\"line1\",1", "\"allText\",\"line3\",3"]);
}

#[test]
fn test_number_boundary() {
    let registry = PatternRegistry::new();
    let results = extract(&registry, ExtractionType::Number, "v2.5 and 100 items").unwrap();
    assert_eq!(results.as_slice(), &["2.5", "100"]);
}

#[test]
fn test_document_extraction() {
    let mut session = Session::default();
    let batch = session.extract_all(DOCUMENT, None);
    assert!(batch.is_complete());

    let store = session.store();
    assert_eq!(store.matches(ExtractionType::Email).unwrap().as_slice(), &["billing@acme.io"]);
    assert_eq!(
        store.matches(ExtractionType::Url).unwrap().as_slice(),
        &["https://acme.io/help?topic=billing"]
    );
    assert_eq!(store.matches(ExtractionType::Phone).unwrap().as_slice(), &["(555) 123-4567"]);
    assert_eq!(
        store.matches(ExtractionType::Date).unwrap().as_slice(),
        &["2024-03-01", "March 31, 2024"]
    );
    assert!(store.matches(ExtractionType::Number).unwrap().as_slice().contains(&"1299.50".to_string()));
    assert!(store.get(ExtractionType::Custom).is_none());
    assert!(matches!(store.get(text_extractor::StoreKey::FullText), Some(StoreValue::Text(_))));
}

#[test]
fn test_exports_fail_on_empty_store() {
    let session = Session::default();
    for format in [ExportFormat::Csv, ExportFormat::Txt, ExportFormat::Json] {
        assert!(
            matches!(session.export(format), Err(ExtractError::EmptyStore)),
            "{:?} should need data",
            format
        );
    }
    assert!(matches!(to_report(session.store()), Err(ExtractError::EmptyStore)));
}

#[test]
fn test_report_lists_every_entry() {
    let mut session = Session::default();
    session.extract_all(DOCUMENT, None);

    let report = to_report(session.store()).unwrap();
    assert!(report.starts_with("EXTRACTED DATA REPORT\n"));
    assert!(report.contains("EMAIL (1 items):\n"));
    assert!(report.contains("PHONE (1 items):\n"));
    assert!(report.contains("COMPLETE TEXT:\n"));
    assert!(report.contains("1. billing@acme.io\n"));
}
