use regex::RegexBuilder;
use super::MatchRule;
use crate::error::{ExtractError, Result};

/// Compiled-program budget for user supplied patterns.
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// Compiles a user pattern as a case-insensitive, global rule.
pub fn compile_custom(pattern: &str, size_limit: usize) -> Result<MatchRule> {
    if pattern.trim().is_empty() {
        return Err(ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "empty pattern".to_string(),
        });
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(size_limit)
        .build()
        .map_err(|e| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

    Ok(MatchRule::new(regex, true, true))
}
