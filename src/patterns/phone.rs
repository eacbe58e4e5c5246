use regex::Regex;
use lazy_static::lazy_static;
use super::{ExtractionType, MatchRule, PatternMatcher};

lazy_static! {
    // North American numbers: optional +1/1 country code, area code with or
    // without parentheses, then 3 + 4 digits with -, . or whitespace separators.
    static ref PHONE_RULE: MatchRule = MatchRule::new(
        Regex::new(
            r"(?:\+1[-.\s]?(?:\(\d{3}\)|\d{3})|\b1[-.\s]?(?:\(\d{3}\)|\d{3})|\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b"
        ).unwrap(),
        false,
        true,
    );
}

pub fn rule() -> &'static MatchRule {
    &PHONE_RULE
}

pub fn is_match(value: &str) -> bool {
    PHONE_RULE.is_match(value)
}

pub fn extract_phones(text: &str) -> Vec<String> {
    PHONE_RULE.find_all(text)
}

pub struct PhoneMatcher {}

impl PatternMatcher for PhoneMatcher {
    fn name(&self) -> ExtractionType {
        ExtractionType::Phone
    }

    fn rule(&self) -> &MatchRule {
        rule()
    }
}
