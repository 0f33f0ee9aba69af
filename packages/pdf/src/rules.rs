//! Extraction rule table, embedded from `rules/transcript.toml`.
//!
//! The table is baked into the binary at compile time via
//! [`include_str!`]; the transcript layout is fixed and the rules are not
//! meant to be edited at runtime.

use serde::Deserialize;
use transcript_metrics_transcript_models::Field;

use crate::PdfError;

/// Rule table embedded at compile time.
const TRANSCRIPT_RULES: &str = include_str!("../rules/transcript.toml");

/// The complete rule table for one transcript layout.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSet {
    /// Header field rules, applied in order.
    #[serde(rename = "field")]
    pub fields: Vec<FieldRule>,
    /// Course row rule.
    pub rows: RowRule,
}

/// A header field and the pattern that extracts it.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    /// Field written by this rule.
    pub name: Field,
    /// Regex whose first capture group is the field value.
    pub pattern: String,
}

/// The course row pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct RowRule {
    /// Regex with four groups: period, number, number, outcome.
    pub pattern: String,
}

/// Parses a rule table from TOML.
///
/// # Errors
///
/// Returns [`PdfError::Rules`] if the TOML is malformed or names an
/// unknown field.
pub fn parse_rules(toml_str: &str) -> Result<RuleSet, PdfError> {
    toml::de::from_str(toml_str).map_err(|e| PdfError::Rules(e.to_string()))
}

/// Returns the embedded rule table.
///
/// # Errors
///
/// Returns [`PdfError::Rules`] if the embedded table fails to parse.
pub fn standard_rules() -> Result<RuleSet, PdfError> {
    parse_rules(TRANSCRIPT_RULES)
}
