use serde::Serialize;

use crate::patterns::ExtractionType;
use crate::store::AggregateStore;

/// Size of a text as a display sink reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub chars: usize,
    pub words: usize,
    pub lines: usize,
}

/// Counts Unicode scalar values, whitespace-separated words and `\n`-separated lines.
pub fn text_stats(text: &str) -> TextStats {
    if text.trim().is_empty() {
        return TextStats::default();
    }

    TextStats {
        chars: text.chars().count(),
        words: text.split_whitespace().count(),
        lines: text.split('\n').count(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Per-type result counts in chart order; types never extracted count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCounts(pub Vec<(&'static str, usize)>);

pub fn type_counts(store: &AggregateStore) -> TypeCounts {
    let labels = [
        (ExtractionType::Email, "Emails"),
        (ExtractionType::Url, "URLs"),
        (ExtractionType::Phone, "Phones"),
        (ExtractionType::Date, "Dates"),
        (ExtractionType::Number, "Numbers"),
        (ExtractionType::Custom, "Custom"),
    ];

    TypeCounts(
        labels
            .iter()
            .map(|(kind, label)| (*label, store.matches(*kind).map_or(0, |m| m.len())))
            .collect(),
    )
}
