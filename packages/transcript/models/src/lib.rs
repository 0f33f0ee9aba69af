#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Transcript field, outcome, metric and report column types.
//!
//! This crate defines the vocabulary shared by every stage of the
//! transcript pipeline: the fixed set of extracted [`Field`]s, the course
//! [`Outcome`] taxonomy, per-period [`PeriodMetrics`], and the fixed
//! [`Column`] layout of the final report. Column and field names are the
//! headers consumers of the report already depend on, so they are spelled
//! exactly as the report writes them.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap as _;
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder written for any value that could not be extracted.
pub const NOT_FOUND: &str = "N/A";

/// Number of most recent periods summarized per transcript.
pub const RECENCY_DEPTH: usize = 3;

/// A field extracted from the transcript header by a single pattern rule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Field {
    /// Student enrollment number
    #[serde(rename = "Matricula")]
    #[strum(serialize = "Matricula")]
    EnrollmentNumber,
    /// Enrollment status text (e.g. `ATIVO`)
    #[serde(rename = "Status")]
    #[strum(serialize = "Status")]
    Status,
    /// Cumulative academic coefficient
    #[serde(rename = "CAA")]
    #[strum(serialize = "CAA")]
    Caa,
    /// City of birth
    #[serde(rename = "Cidade_Nascimento")]
    #[strum(serialize = "Cidade_Nascimento")]
    BirthCity,
    /// Two-letter state of birth
    #[serde(rename = "UF_Nascimento")]
    #[strum(serialize = "UF_Nascimento")]
    BirthState,
    /// Nationality
    #[serde(rename = "Nacionalidade")]
    #[strum(serialize = "Nacionalidade")]
    Nationality,
    /// Birth date as `DD/MM/YYYY`
    #[serde(rename = "Data_Nascimento")]
    #[strum(serialize = "Data_Nascimento")]
    BirthDate,
    /// Number of enrollment locks / withdrawals
    #[serde(rename = "Qtd_Trancamentos")]
    #[strum(serialize = "Qtd_Trancamentos")]
    WithdrawalCount,
    /// Current term number
    #[serde(rename = "Periodo_Letivo_Atual")]
    #[strum(serialize = "Periodo_Letivo_Atual")]
    CurrentTerm,
}

impl Field {
    /// Returns all variants of this enum, in rule order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::EnrollmentNumber,
            Self::Status,
            Self::Caa,
            Self::BirthCity,
            Self::BirthState,
            Self::Nationality,
            Self::BirthDate,
            Self::WithdrawalCount,
            Self::CurrentTerm,
        ]
    }

    /// Returns the report column this field is written to.
    ///
    /// The birth date only feeds the derived age and has no column.
    #[must_use]
    pub const fn column(self) -> Option<Column> {
        match self {
            Self::EnrollmentNumber => Some(Column::EnrollmentNumber),
            Self::Status => Some(Column::Status),
            Self::Caa => Some(Column::Caa),
            Self::BirthCity => Some(Column::BirthCity),
            Self::BirthState => Some(Column::BirthState),
            Self::Nationality => Some(Column::Nationality),
            Self::BirthDate => None,
            Self::WithdrawalCount => Some(Column::WithdrawalCount),
            Self::CurrentTerm => Some(Column::CurrentTerm),
        }
    }
}

/// The value extracted for one [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The pattern matched; holds the trimmed first capture group.
    Found(String),
    /// The pattern did not match.
    NotFound,
}

impl FieldValue {
    /// Returns the extracted text, or [`NOT_FOUND`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(value) => value,
            Self::NotFound => NOT_FOUND,
        }
    }

    /// Returns the extracted text if the field was found.
    #[must_use]
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static MISSING: FieldValue = FieldValue::NotFound;

/// Values extracted for every [`Field`] of one transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    values: BTreeMap<Field, FieldValue>,
}

impl FieldRecord {
    /// Records the value extracted for `field`.
    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Returns the value for `field`, treating fields never recorded as
    /// not found.
    #[must_use]
    pub fn get(&self, field: Field) -> &FieldValue {
        self.values.get(&field).unwrap_or(&MISSING)
    }

    /// Iterates over the recorded fields in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

/// Per-course result as printed on the transcript.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Outcome {
    /// Course passed
    #[serde(rename = "APROVADO")]
    #[strum(serialize = "APROVADO")]
    Approved,
    /// Course failed on grade
    #[serde(rename = "REPROVADO")]
    #[strum(serialize = "REPROVADO")]
    Failed,
    /// Course failed for insufficient attendance
    #[serde(rename = "REP. FALTA")]
    #[strum(serialize = "REP. FALTA")]
    FailedForAbsence,
}

impl Outcome {
    /// Parses an outcome token as matched in the text, in any letter case.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        token.trim().to_uppercase().parse().ok()
    }

    /// Whether the course counts as approved.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether the course counts as failed (any outcome labelled `REP…`).
    #[must_use]
    pub fn is_failure(self) -> bool {
        self.as_ref().starts_with("REP")
    }
}

/// One course line as matched in the text, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Period token, `YYYY.N`.
    pub period: String,
    /// First numeric token, as printed (may use a decimal comma).
    pub first: String,
    /// Second numeric token, as printed.
    pub second: String,
    /// Outcome keyword, in the letter case found in the text.
    pub outcome: String,
}

/// One course line whose grade and attendance have been told apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRow {
    /// Period token, `YYYY.N`.
    pub period: String,
    /// Grade on a 0–10 scale.
    pub grade: f64,
    /// Attendance percentage, 0–100.
    pub attendance: f64,
    /// Course outcome.
    pub outcome: Outcome,
}

/// Position of a period when periods are sorted most recent first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RecencyRank {
    /// Most recent period
    #[strum(serialize = "Ultimo")]
    Latest = 0,
    /// Second most recent period
    #[strum(serialize = "Penultimo")]
    Previous = 1,
    /// Third most recent period
    #[strum(serialize = "Antepenultimo")]
    BeforePrevious = 2,
}

impl RecencyRank {
    /// Returns all ranks, most recent first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Latest, Self::Previous, Self::BeforePrevious]
    }

    /// Zero-based distance from the most recent period.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the four summary values reported per period.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Metric {
    /// Mean grade
    #[strum(serialize = "Media_Nota")]
    MeanGrade,
    /// Mean attendance
    #[strum(serialize = "Media_Freq")]
    MeanAttendance,
    /// Approved course count
    #[strum(serialize = "Aprov")]
    Approved,
    /// Failed course count
    #[strum(serialize = "Reprov")]
    Failed,
}

impl Metric {
    /// Returns all metrics in report order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::MeanGrade,
            Self::MeanAttendance,
            Self::Approved,
            Self::Failed,
        ]
    }
}

/// Summary of the courses taken in one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodMetrics {
    /// Mean grade, rounded to 2 decimals.
    pub mean_grade: f64,
    /// Mean attendance, rounded to 2 decimals.
    pub mean_attendance: f64,
    /// Number of approved courses.
    pub approved: u32,
    /// Number of failed courses (any `REP…` outcome).
    pub failed: u32,
}

impl PeriodMetrics {
    /// Metrics reported for a rank with no period behind it.
    pub const ZERO: Self = Self {
        mean_grade: 0.0,
        mean_attendance: 0.0,
        approved: 0,
        failed: 0,
    };

    /// Returns the report cell for `metric`.
    #[must_use]
    pub fn cell(&self, metric: Metric) -> Cell {
        match metric {
            Metric::MeanGrade => Cell::Decimal(self.mean_grade),
            Metric::MeanAttendance => Cell::Decimal(self.mean_attendance),
            Metric::Approved => Cell::Integer(i64::from(self.approved)),
            Metric::Failed => Cell::Integer(i64::from(self.failed)),
        }
    }
}

/// A column of the report, in the fixed report vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// `Matricula`
    EnrollmentNumber,
    /// `Status`
    Status,
    /// `CAA`
    Caa,
    /// `Nacionalidade`
    Nationality,
    /// `Cidade_Nascimento`
    BirthCity,
    /// `UF_Nascimento`
    BirthState,
    /// `Idade`, derived from the birth date
    Age,
    /// `Periodo_Letivo_Atual`
    CurrentTerm,
    /// `Qtd_Trancamentos`
    WithdrawalCount,
    /// Completion year/term; never populated by the extractor.
    CompletionTerm,
    /// `{metric}_{rank}_Sem`, one of the twelve recency metric columns
    Metric(RecencyRank, Metric),
    /// `Arquivo_Origem`, the transcript's file name
    SourceFile,
}

impl Column {
    /// Number of columns in every report row.
    pub const COUNT: usize = 11 + RECENCY_DEPTH * 4;

    /// Returns every column in report order.
    #[must_use]
    pub fn ordered() -> Vec<Self> {
        let mut columns = vec![
            Self::EnrollmentNumber,
            Self::Status,
            Self::Caa,
            Self::Nationality,
            Self::BirthCity,
            Self::BirthState,
            Self::Age,
            Self::CurrentTerm,
            Self::WithdrawalCount,
            Self::CompletionTerm,
        ];
        for &rank in RecencyRank::all() {
            for &metric in Metric::all() {
                columns.push(Self::Metric(rank, metric));
            }
        }
        columns.push(Self::SourceFile);
        columns
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnrollmentNumber => f.write_str("Matricula"),
            Self::Status => f.write_str("Status"),
            Self::Caa => f.write_str("CAA"),
            Self::Nationality => f.write_str("Nacionalidade"),
            Self::BirthCity => f.write_str("Cidade_Nascimento"),
            Self::BirthState => f.write_str("UF_Nascimento"),
            Self::Age => f.write_str("Idade"),
            Self::CurrentTerm => f.write_str("Periodo_Letivo_Atual"),
            Self::WithdrawalCount => f.write_str("Qtd_Trancamentos"),
            Self::CompletionTerm => f.write_str("Ano_Periodo_Conclusao"),
            Self::Metric(rank, metric) => write!(f, "{metric}_{rank}_Sem"),
            Self::SourceFile => f.write_str("Arquivo_Origem"),
        }
    }
}

/// A single report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Extracted or derived text
    Text(String),
    /// Whole number (age, course counts)
    Integer(i64),
    /// Rounded mean
    Decimal(f64),
    /// Value could not be extracted; written as [`NOT_FOUND`]
    NotFound,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl From<&FieldValue> for Cell {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Found(text) => Self::Text(text.clone()),
            FieldValue::NotFound => Self::NotFound,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Decimal(value) => serializer.serialize_f64(*value),
            Self::NotFound => serializer.serialize_str(NOT_FOUND),
        }
    }
}

/// One report row: everything extracted and derived from one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRecord {
    cells: BTreeMap<Column, Cell>,
}

impl OutputRecord {
    /// Starts a record from the extracted header fields.
    #[must_use]
    pub fn from_fields(fields: &FieldRecord) -> Self {
        let mut record = Self::default();
        for (field, value) in fields.iter() {
            if let Some(column) = field.column() {
                record.set(column, Cell::from(value));
            }
        }
        record
    }

    /// Sets the cell for `column`, replacing any previous value.
    pub fn set(&mut self, column: Column, cell: Cell) {
        self.cells.insert(column, cell);
    }

    /// Returns the cell for `column`, if one was set.
    #[must_use]
    pub fn get(&self, column: Column) -> Option<&Cell> {
        self.cells.get(&column)
    }

    /// Writes the four metrics of `metrics` under `rank`.
    pub fn set_period(&mut self, rank: RecencyRank, metrics: &PeriodMetrics) {
        for &metric in Metric::all() {
            self.set(Column::Metric(rank, metric), metrics.cell(metric));
        }
    }

    /// Projects the record onto the fixed column order, filling columns
    /// that were never set with [`Cell::NotFound`].
    #[must_use]
    pub fn row(&self) -> Vec<Cell> {
        Column::ordered()
            .into_iter()
            .map(|column| self.get(column).cloned().unwrap_or(Cell::NotFound))
            .collect()
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = Column::ordered();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (column, cell) in columns.iter().zip(self.row()) {
            map.serialize_entry(&column.to_string(), &cell)?;
        }
        map.end()
    }
}
