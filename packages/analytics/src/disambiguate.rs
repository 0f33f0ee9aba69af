//! Grade vs. attendance classification for course rows.
//!
//! Transcript rows print a grade (0–10) and an attendance percentage
//! (0–100) without labels, and not always in the same order. [`RULES`] is
//! an ordered decision table; the first rule whose predicate holds decides
//! the assignment. When none holds the row is ambiguous and dropped.
//!
//! Rules 3 and 4 can never fire after rules 1 and 2 (any pair they accept
//! is already accepted earlier). They are kept with their literal cut-offs
//! so the table stays identical to the one reports were produced with.

use transcript_metrics_transcript_models::{CourseRow, Outcome, RawRow};

use crate::RowIssue;

/// Which of the two numbers is the grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// `(grade, attendance)`
    FirstIsGrade,
    /// `(attendance, grade)`
    SecondIsGrade,
}

impl Assignment {
    /// Orders `(first, second)` as `(grade, attendance)`.
    #[must_use]
    pub const fn apply(self, first: f64, second: f64) -> (f64, f64) {
        match self {
            Self::FirstIsGrade => (first, second),
            Self::SecondIsGrade => (second, first),
        }
    }
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short label used in debug logs.
    pub name: &'static str,
    /// Whether this rule accepts the pair `(first, second)`.
    pub applies: fn(f64, f64) -> bool,
    /// Assignment made when the rule accepts.
    pub assignment: Assignment,
}

fn grade_then_attendance(first: f64, second: f64) -> bool {
    first <= 10.0 && second > 10.0
}

fn attendance_then_grade(first: f64, second: f64) -> bool {
    second <= 10.0 && first > 10.0
}

fn high_attendance_first(first: f64, second: f64) -> bool {
    first >= 70.0 && second <= 10.0
}

fn high_attendance_second(first: f64, second: f64) -> bool {
    second >= 70.0 && first <= 10.0
}

/// The decision table, evaluated top to bottom.
pub const RULES: &[Rule] = &[
    Rule {
        name: "grade_then_attendance",
        applies: grade_then_attendance,
        assignment: Assignment::FirstIsGrade,
    },
    Rule {
        name: "attendance_then_grade",
        applies: attendance_then_grade,
        assignment: Assignment::SecondIsGrade,
    },
    Rule {
        name: "high_attendance_first",
        applies: high_attendance_first,
        assignment: Assignment::SecondIsGrade,
    },
    Rule {
        name: "high_attendance_second",
        applies: high_attendance_second,
        assignment: Assignment::FirstIsGrade,
    },
];

/// Returns the first rule that accepts `(first, second)`.
#[must_use]
pub fn matching_rule(first: f64, second: f64) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.applies)(first, second))
}

/// Splits `(first, second)` into `(grade, attendance)`, or `None` when the
/// pair is ambiguous.
#[must_use]
pub fn classify(first: f64, second: f64) -> Option<(f64, f64)> {
    matching_rule(first, second).map(|rule| rule.assignment.apply(first, second))
}

/// Parses a printed number, accepting a comma as the decimal separator.
///
/// # Errors
///
/// Returns [`RowIssue::Malformed`] if the token is not a number.
pub fn parse_number(period: &str, token: &str) -> Result<f64, RowIssue> {
    token
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| RowIssue::Malformed {
            period: period.to_owned(),
            token: token.to_owned(),
        })
}

/// Interprets one raw row as a [`CourseRow`].
///
/// # Errors
///
/// Returns [`RowIssue::Malformed`] if either number fails to parse,
/// [`RowIssue::Ambiguous`] if no rule classifies the pair, or
/// [`RowIssue::UnknownOutcome`] if the outcome keyword is not recognized.
pub fn classify_row(raw: &RawRow) -> Result<CourseRow, RowIssue> {
    let first = parse_number(&raw.period, &raw.first)?;
    let second = parse_number(&raw.period, &raw.second)?;

    let rule = matching_rule(first, second).ok_or_else(|| RowIssue::Ambiguous {
        period: raw.period.clone(),
        first,
        second,
    })?;

    let (grade, attendance) = rule.assignment.apply(first, second);

    let outcome = Outcome::from_token(&raw.outcome).ok_or_else(|| RowIssue::UnknownOutcome {
        period: raw.period.clone(),
        outcome: raw.outcome.clone(),
    })?;

    log::trace!(
        "[{}] {} / {} classified by {}",
        raw.period,
        raw.first,
        raw.second,
        rule.name
    );

    Ok(CourseRow {
        period: raw.period.clone(),
        grade,
        attendance,
        outcome,
    })
}
