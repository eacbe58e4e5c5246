use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::{ExtractError, Result};
use crate::store::{AggregateStore, StoreKey, StoreValue};

/// How commas inside a quoted CSV value are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvCommaMode {
    /// `,` becomes `\,` inside the quotes. Existing consumers of the export expect this.
    #[default]
    Backslash,
    /// RFC 4180: quoting alone protects the comma.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Txt,
    Json,
}

impl ExportFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Txt => "text/plain",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExtractError::Config(format!("unknown export format: {}", other))),
        }
    }
}

/// Serialized export plus what a download sink needs to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub content: String,
    pub filename: String,
    pub mime: &'static str,
}

fn ensure_not_empty(store: &AggregateStore) -> Result<()> {
    if store.is_empty() {
        return Err(ExtractError::EmptyStore);
    }
    Ok(())
}

/// Quotes one CSV value, doubling embedded quotes.
pub fn escape_csv_field(value: &str, mode: CsvCommaMode) -> String {
    let doubled = value.replace('"', "\"\"");
    match mode {
        CsvCommaMode::Backslash => format!("\"{}\"", doubled.replace(',', "\\,")),
        CsvCommaMode::Strict => format!("\"{}\"", doubled),
    }
}

pub fn to_csv(store: &AggregateStore, mode: CsvCommaMode) -> Result<String> {
    ensure_not_empty(store)?;

    let mut csv = String::from("Type,Value,Index\n");
    for (key, value) in store.iter() {
        let type_field = escape_csv_field(key.as_str(), mode);
        match value {
            StoreValue::Text(text) => {
                // Index is the 1-based line number, so skipped blank lines leave gaps
                for (index, line) in text.split('\n').enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    csv.push_str(&format!("{},{},{}\n", type_field, escape_csv_field(line, mode), index + 1));
                }
            }
            StoreValue::Matches(matches) => {
                for (index, item) in matches.iter().enumerate() {
                    csv.push_str(&format!("{},{},{}\n", type_field, escape_csv_field(item, mode), index + 1));
                }
            }
        }
    }

    Ok(csv)
}

pub fn to_report(store: &AggregateStore) -> Result<String> {
    to_report_at(store, &Local::now())
}

/// Plain-text report stamped with `generated`.
pub fn to_report_at<Tz: TimeZone>(store: &AggregateStore, generated: &DateTime<Tz>) -> Result<String>
where
    Tz::Offset: std::fmt::Display,
{
    ensure_not_empty(store)?;

    let rule = "=".repeat(50);
    let thin_rule = "-".repeat(30);

    let mut txt = String::from("EXTRACTED DATA REPORT\n");
    txt.push_str(&format!("{}\n", rule));
    txt.push_str(&format!("Generated: {}\n\n", generated.format("%Y-%m-%d %H:%M:%S")));

    for (key, value) in store.iter() {
        match value {
            StoreValue::Text(text) => {
                txt.push_str("COMPLETE TEXT:\n");
                txt.push_str(&format!("{}\n", thin_rule));
                txt.push_str(&format!("{}\n\n", text));
                txt.push_str(&format!("{}\n\n", rule));
            }
            StoreValue::Matches(matches) => {
                txt.push_str(&format!("{} ({} items):\n", key.as_str().to_uppercase(), matches.len()));
                txt.push_str(&format!("{}\n", thin_rule));
                for (index, item) in matches.iter().enumerate() {
                    txt.push_str(&format!("{}. {}\n", index + 1, item));
                }
                txt.push('\n');
            }
        }
    }

    Ok(txt)
}

pub fn to_json(store: &AggregateStore) -> Result<String> {
    ensure_not_empty(store)?;
    Ok(serde_json::to_string_pretty(store)?)
}

/// Clipboard summary: the full text first, then every non-empty result set.
pub fn copy_all(store: &AggregateStore) -> Result<String> {
    let mut all = String::new();

    if let Some(text) = store.full_text() {
        all.push_str("COMPLETE TEXT:\n");
        all.push_str(&format!("{}\n", "=".repeat(30)));
        all.push_str(&format!("{}\n\n", text));
    }

    for (key, value) in store.iter() {
        if let (StoreKey::Type(kind), StoreValue::Matches(matches)) = (key, value) {
            if matches.is_empty() {
                continue;
            }
            let items: Vec<&str> = matches.iter().map(String::as_str).collect();
            all.push_str(&format!("{}:\n{}\n\n", kind.as_str().to_uppercase(), items.join("\n")));
        }
    }

    if all.is_empty() {
        return Err(ExtractError::EmptyStore);
    }
    Ok(all)
}

/// Filesystem-safe sortable timestamp: UTC ISO-8601 to the second, colons replaced.
pub fn timestamp_slug<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    now.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .replace(':', "-")
}

pub fn export<Tz: TimeZone>(
    store: &AggregateStore,
    format: ExportFormat,
    mode: CsvCommaMode,
    now: &DateTime<Tz>,
) -> Result<ExportArtifact>
where
    Tz::Offset: std::fmt::Display,
{
    let content = match format {
        ExportFormat::Csv => to_csv(store, mode)?,
        ExportFormat::Txt => to_report_at(store, now)?,
        ExportFormat::Json => to_json(store)?,
    };
    let filename = format!("extracted-data-{}.{}", timestamp_slug(now), format.extension());
    info!(filename = %filename, bytes = content.len(), "export ready");

    Ok(ExportArtifact {
        content,
        filename,
        mime: format.mime(),
    })
}

/// The captured full text alone, as a `.txt` download.
pub fn export_full_text<Tz: TimeZone>(store: &AggregateStore, now: &DateTime<Tz>) -> Result<ExportArtifact> {
    let text = store.full_text().ok_or(ExtractError::EmptyStore)?;

    Ok(ExportArtifact {
        content: text.to_string(),
        filename: format!("extracted-text-{}.txt", timestamp_slug(now)),
        mime: ExportFormat::Txt.mime(),
    })
}
