use regex::Regex;
use lazy_static::lazy_static;
use super::{ExtractionType, MatchRule, PatternMatcher};

lazy_static! {
    // Either a scheme (with optional www.) or a bare www. prefix is required,
    // otherwise every email domain would also be reported as a URL.
    static ref URL_RULE: MatchRule = MatchRule::new(
        Regex::new(
            r"\b(?:https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}|www\.[-a-zA-Z0-9%._+~#=]{1,256})\.[a-zA-Z][a-zA-Z0-9()]{0,5}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*"
        ).unwrap(),
        false,
        true,
    );
}

pub fn rule() -> &'static MatchRule {
    &URL_RULE
}

pub fn is_match(value: &str) -> bool {
    URL_RULE.is_match(value)
}

pub fn extract_urls(text: &str) -> Vec<String> {
    URL_RULE.find_all(text)
}

pub struct UrlMatcher {}

impl PatternMatcher for UrlMatcher {
    fn name(&self) -> ExtractionType {
        ExtractionType::Url
    }

    fn rule(&self) -> &MatchRule {
        rule()
    }
}
