use regex::Regex;
use lazy_static::lazy_static;
use super::{ExtractionType, MatchRule, PatternMatcher};

lazy_static! {
    // Local part is case-sensitive as written, the domain is not
    static ref EMAIL_RULE: MatchRule = MatchRule::new(
        Regex::new(r"\b[A-Za-z0-9._%+-]+@(?i:[a-z0-9.-]+\.[a-z]{2,})\b").unwrap(),
        true,
        true,
    );
}

pub fn rule() -> &'static MatchRule {
    &EMAIL_RULE
}

pub fn is_match(value: &str) -> bool {
    EMAIL_RULE.is_match(value)
}

pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL_RULE.find_all(text)
}

pub struct EmailMatcher {}

impl PatternMatcher for EmailMatcher {
    fn name(&self) -> ExtractionType {
        ExtractionType::Email
    }

    fn rule(&self) -> &MatchRule {
        rule()
    }
}
