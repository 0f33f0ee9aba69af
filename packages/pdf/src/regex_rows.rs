//! Regex-based course row extraction from transcript text.
//!
//! Applies the row pattern against the full text. Each match must carry
//! four groups: the period token, two numbers whose meaning is not yet
//! known, and the outcome keyword. Telling grade from attendance is left
//! to the caller.

use regex::{Regex, RegexBuilder};
pub use transcript_metrics_transcript_models::RawRow;

use crate::PdfError;

/// Compiled course row pattern.
#[derive(Debug)]
pub struct RowExtractor {
    re: Regex,
}

impl RowExtractor {
    /// Compiles `pattern` case-insensitive with `.` matching newlines, so a
    /// row may span line breaks.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Regex`] if the pattern fails to compile, or
    /// [`PdfError::Rules`] if it does not have exactly four groups.
    pub fn new(pattern: &str) -> Result<Self, PdfError> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;

        // captures_len counts the implicit whole-match group
        if re.captures_len() != 5 {
            return Err(PdfError::Rules(format!(
                "row pattern must have 4 capture groups, found {}",
                re.captures_len() - 1
            )));
        }

        Ok(Self { re })
    }

    /// Returns every non-overlapping row match in `text`, in document order.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<RawRow> {
        let group = |caps: &regex::Captures<'_>, i: usize| {
            caps.get(i)
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default()
        };

        let rows: Vec<RawRow> = self
            .re
            .captures_iter(text)
            .map(|caps| RawRow {
                period: group(&caps, 1),
                first: group(&caps, 2),
                second: group(&caps, 3),
                outcome: group(&caps, 4),
            })
            .collect();

        log::debug!("Row pattern matched {} course rows", rows.len());

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::standard_rules;

    fn extractor() -> RowExtractor {
        RowExtractor::new(&standard_rules().unwrap().rows.pattern).unwrap()
    }

    #[test]
    fn extracts_rows_in_document_order() {
        let text = "\
2021.1 MAT101 Cálculo I 72 8,5 95,0 APROVADO
2021.2 FIS101 Física I 72 4,0 60,0 REPROVADO
2022.1 QUI101 Química 36 0,0 20,0 REP. FALTA
";
        let rows = extractor().extract(text);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            RawRow {
                period: "2021.1".to_owned(),
                first: "8,5".to_owned(),
                second: "95,0".to_owned(),
                outcome: "APROVADO".to_owned(),
            }
        );
        assert_eq!(rows[1].period, "2021.2");
        assert_eq!(rows[2].outcome, "REP. FALTA");
    }

    #[test]
    fn outcome_matches_case_insensitively() {
        let rows = extractor().extract("2020.2 ALG Álgebra 54 7.0 88 Aprovado\n");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].outcome, "Aprovado");
        assert_eq!(rows[0].first, "7.0");
        assert_eq!(rows[0].second, "88");
    }

    #[test]
    fn row_may_span_line_breaks() {
        let text = "2023.2 EEL7300 Projeto de\nSistemas Embarcados\n72 9,0 100 APROVADO";

        let rows = extractor().extract(text);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period, "2023.2");
        assert_eq!(rows[0].first, "9,0");
        assert_eq!(rows[0].second, "100");
    }

    #[test]
    fn lines_without_outcome_do_not_match() {
        let rows = extractor().extract("2023.1 EEL7051 Circuitos 72 8,0 92,0 CURSANDO\n");
        assert!(rows.is_empty());
    }

    #[test]
    fn rejects_pattern_with_wrong_group_count() {
        let result = RowExtractor::new(r"(\d{4}\.\d)\s+(\w+)");
        assert!(matches!(result, Err(PdfError::Rules(_))));
    }
}
