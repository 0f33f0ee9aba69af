//! Header field extraction.
//!
//! Each rule pairs a [`Field`] with a regex whose first capture group holds
//! the value. Rules are applied independently against the whole text; a
//! rule that does not match leaves its field as [`FieldValue::NotFound`].

use regex::Regex;
use transcript_metrics_transcript_models::{Field, FieldRecord, FieldValue};

use crate::PdfError;
use crate::rules::FieldRule;

/// Compiled header-field rules, in rule order.
#[derive(Debug)]
pub struct FieldExtractor {
    rules: Vec<(Field, Regex)>,
}

impl FieldExtractor {
    /// Compiles the given rules.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Regex`] if a pattern fails to compile, or
    /// [`PdfError::Rules`] if a pattern has no capture group.
    pub fn new(rules: &[FieldRule]) -> Result<Self, PdfError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let re = Regex::new(&rule.pattern)?;
            if re.captures_len() < 2 {
                return Err(PdfError::Rules(format!(
                    "pattern for {} has no capture group",
                    rule.name
                )));
            }
            compiled.push((rule.name, re));
        }
        Ok(Self { rules: compiled })
    }

    /// Applies every rule to `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> FieldRecord {
        let mut record = FieldRecord::default();
        for (field, re) in &self.rules {
            record.insert(*field, extract_field(text, re));
        }
        record
    }
}

/// Returns the trimmed first capture group of the first match of `re`.
#[must_use]
pub fn extract_field(text: &str, re: &Regex) -> FieldValue {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(FieldValue::NotFound, |m| {
            FieldValue::Found(m.as_str().trim().to_owned())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: Field, pattern: &str) -> FieldRule {
        FieldRule {
            name,
            pattern: pattern.to_owned(),
        }
    }

    #[test]
    fn first_match_wins() {
        let extractor =
            FieldExtractor::new(&[rule(Field::CurrentTerm, r"Período Letivo Atual:\s+(\d+)")])
                .unwrap();

        let record =
            extractor.extract("Período Letivo Atual: 5\nPeríodo Letivo Atual: 9\n");

        assert_eq!(record.get(Field::CurrentTerm).as_str(), "5");
    }

    #[test]
    fn missing_field_is_not_found() {
        let extractor =
            FieldExtractor::new(&[rule(Field::BirthState, r"UF:\s+([A-Z]{2})")]).unwrap();

        let record = extractor.extract("Local de Nascimento: JOINVILLE");

        assert_eq!(*record.get(Field::BirthState), FieldValue::NotFound);
        assert_eq!(record.get(Field::BirthState).as_str(), "N/A");
    }

    #[test]
    fn captured_value_is_trimmed() {
        let re = Regex::new(r"Trancamentos:([^\n]+)").unwrap();
        assert_eq!(
            extract_field("Trancamentos:   2   \n", &re),
            FieldValue::Found("2".to_owned())
        );
    }

    #[test]
    fn rejects_pattern_without_group() {
        let result = FieldExtractor::new(&[rule(Field::Status, r"Status:\s+\w+")]);
        assert!(matches!(result, Err(PdfError::Rules(_))));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let result = FieldExtractor::new(&[rule(Field::Status, r"Status:(\w+")]);
        assert!(matches!(result, Err(PdfError::Regex(_))));
    }
}
