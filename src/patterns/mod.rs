pub mod custom;
pub mod date;
pub mod email;
pub mod number;
pub mod phone;
pub mod url;

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{ExtractError, Result};

/// The kinds of data a session can extract from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionType {
    Email,
    Url,
    Phone,
    Date,
    Number,
    Custom,
}

impl ExtractionType {
    pub const BUILT_IN: [ExtractionType; 5] = [
        ExtractionType::Email,
        ExtractionType::Url,
        ExtractionType::Phone,
        ExtractionType::Date,
        ExtractionType::Number,
    ];

    /// Order used by batch extraction.
    pub const ALL: [ExtractionType; 6] = [
        ExtractionType::Email,
        ExtractionType::Url,
        ExtractionType::Phone,
        ExtractionType::Date,
        ExtractionType::Number,
        ExtractionType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionType::Email => "email",
            ExtractionType::Url => "url",
            ExtractionType::Phone => "phone",
            ExtractionType::Date => "date",
            ExtractionType::Number => "number",
            ExtractionType::Custom => "custom",
        }
    }
}

impl fmt::Display for ExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(ExtractionType::Email),
            "url" => Ok(ExtractionType::Url),
            "phone" => Ok(ExtractionType::Phone),
            "date" => Ok(ExtractionType::Date),
            "number" => Ok(ExtractionType::Number),
            "custom" => Ok(ExtractionType::Custom),
            _ => Err(ExtractError::UnknownType(s.to_string())),
        }
    }
}

/// A compiled text-matching rule.
#[derive(Debug, Clone)]
pub struct MatchRule {
    regex: Regex,
    case_insensitive: bool,
    global: bool,
}

impl MatchRule {
    pub fn new(regex: Regex, case_insensitive: bool, global: bool) -> Self {
        Self { regex, case_insensitive, global }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn global(&self) -> bool {
        self.global
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Non-overlapping matches in document order; only the first when the rule is not global.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        if self.global {
            self.regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
        } else {
            self.regex.find(text).map(|m| m.as_str().to_string()).into_iter().collect()
        }
    }
}

pub trait PatternMatcher {
    fn name(&self) -> ExtractionType;
    fn rule(&self) -> &MatchRule;

    fn matches(&self, value: &str) -> bool {
        self.rule().is_match(value)
    }
}

/// Built-in recognizers plus at most one custom rule.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    custom: Option<MatchRule>,
    size_limit: usize,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::with_size_limit(custom::DEFAULT_SIZE_LIMIT)
    }
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose custom patterns must compile within `size_limit` bytes.
    pub fn with_size_limit(size_limit: usize) -> Self {
        Self { custom: None, size_limit }
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    pub fn get_rule(&self, kind: ExtractionType) -> Result<&MatchRule> {
        match kind {
            ExtractionType::Email => Ok(email::rule()),
            ExtractionType::Url => Ok(url::rule()),
            ExtractionType::Phone => Ok(phone::rule()),
            ExtractionType::Date => Ok(date::rule()),
            ExtractionType::Number => Ok(number::rule()),
            ExtractionType::Custom => self.custom.as_ref().ok_or_else(|| ExtractError::InvalidPattern {
                pattern: String::new(),
                reason: "no custom pattern set".to_string(),
            }),
        }
    }

    /// Looks a rule up by its type name.
    pub fn get_rule_by_name(&self, name: &str) -> Result<&MatchRule> {
        self.get_rule(name.parse()?)
    }

    /// Replaces the custom rule. On failure the previous rule is kept.
    pub fn set_custom_rule(&mut self, pattern: &str) -> Result<&MatchRule> {
        let rule = custom::compile_custom(pattern, self.size_limit)?;
        Ok(&*self.custom.insert(rule))
    }

    pub fn custom_rule(&self) -> Option<&MatchRule> {
        self.custom.as_ref()
    }

    pub fn clear_custom(&mut self) {
        self.custom = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_parse() {
        for kind in ExtractionType::ALL {
            assert_eq!(kind.as_str().parse::<ExtractionType>().unwrap(), kind);
        }
        assert_eq!("EMAIL".parse::<ExtractionType>().unwrap(), ExtractionType::Email);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let registry = PatternRegistry::new();
        for name in vec!["ssn", "", "allText", "emails"] {
            assert!(
                matches!(registry.get_rule_by_name(name), Err(ExtractError::UnknownType(_))),
                "Should be unknown: {}",
                name
            );
        }
    }

    #[test]
    fn test_built_in_rules_are_global() {
        let registry = PatternRegistry::new();
        for kind in ExtractionType::BUILT_IN {
            assert!(registry.get_rule(kind).unwrap().global(), "Rule should scan globally: {}", kind);
        }
    }

    #[test]
    fn test_failed_custom_keeps_previous_rule() {
        let mut registry = PatternRegistry::new();
        assert!(registry.get_rule(ExtractionType::Custom).is_err());

        registry.set_custom_rule(r"inv-\d+").unwrap();
        assert!(registry.set_custom_rule("(unclosed").is_err());
        assert_eq!(registry.custom_rule().unwrap().pattern(), r"inv-\d+");

        registry.clear_custom();
        assert!(registry.custom_rule().is_none());
    }

    #[test]
    fn test_size_limit_applies_to_custom_rules() {
        let mut registry = PatternRegistry::with_size_limit(64);
        assert!(matches!(
            registry.set_custom_rule(r"\w{50}"),
            Err(ExtractError::InvalidPattern { .. })
        ));
        assert!(registry.custom_rule().is_none());
        assert!(PatternRegistry::new().set_custom_rule(r"\w{50}").is_ok());
    }

    #[test]
    fn test_non_global_rule_returns_first_match() {
        let rule = MatchRule::new(Regex::new(r"\d+").unwrap(), false, false);
        assert_eq!(rule.find_all("1 2 3"), vec!["1"]);
        assert!(rule.find_all("none").is_empty());
    }
}
