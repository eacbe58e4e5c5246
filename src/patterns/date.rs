use regex::Regex;
use lazy_static::lazy_static;
use super::{ExtractionType, MatchRule, PatternMatcher};

lazy_static! {
    // D/M/Y, Y/M/D, "Month D, Y" and "D Month Y"
    static ref DATE_RULE: MatchRule = MatchRule::new(
        Regex::new(concat!(
            r"(?i)\b(?:",
            r"\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}",
            r"|\d{4}[/.-]\d{1,2}[/.-]\d{1,2}",
            r"|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}",
            r"|\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{4}",
            r")\b"
        )).unwrap(),
        true,
        true,
    );
}

pub fn rule() -> &'static MatchRule {
    &DATE_RULE
}

pub fn is_match(value: &str) -> bool {
    DATE_RULE.is_match(value)
}

pub fn extract_dates(text: &str) -> Vec<String> {
    DATE_RULE.find_all(text)
}

pub struct DateMatcher {}

impl PatternMatcher for DateMatcher {
    fn name(&self) -> ExtractionType {
        ExtractionType::Date
    }

    fn rule(&self) -> &MatchRule {
        rule()
    }
}
