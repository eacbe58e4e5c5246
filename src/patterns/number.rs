use regex::Regex;
use lazy_static::lazy_static;
use super::{ExtractionType, MatchRule, PatternMatcher};

lazy_static! {
    // Bounded by the digit run itself, so "v2.5" still yields "2.5"
    static ref NUMBER_RULE: MatchRule = MatchRule::new(
        Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap(),
        false,
        true,
    );
}

pub fn rule() -> &'static MatchRule {
    &NUMBER_RULE
}

pub fn is_match(value: &str) -> bool {
    NUMBER_RULE.is_match(value)
}

pub fn extract_numbers(text: &str) -> Vec<String> {
    NUMBER_RULE.find_all(text)
}

pub struct NumberMatcher {}

impl PatternMatcher for NumberMatcher {
    fn name(&self) -> ExtractionType {
        ExtractionType::Number
    }

    fn rule(&self) -> &MatchRule {
        rule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary() {
        assert_eq!(extract_numbers("v2.5 and 100 items"), vec!["2.5", "100"]);
    }

    #[test]
    fn test_separators_split_numbers() {
        assert_eq!(
            extract_numbers("Total: 1,200 at 3.75 each, 42."),
            vec!["1", "200", "3.75", "42"]
        );
    }

    #[test]
    fn test_no_digits() {
        for value in vec!["", "abc", ".", "one hundred"] {
            assert!(!is_match(value), "Should not match: {}", value);
        }
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        assert!(extract_numbers("٣ and ７").is_empty());
    }
}
