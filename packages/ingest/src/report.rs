//! Tabular report output.
//!
//! One row per successfully processed transcript, always with the full
//! fixed column set, under a header row. The file format follows the
//! output path: `.xlsx` writes a single-sheet workbook, anything else
//! writes CSV.

use std::io;
use std::path::Path;

use chrono::{Datelike as _, NaiveDate};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, XlsxError};
use transcript_metrics_transcript_models::{Cell, Column, NOT_FOUND, OutputRecord};

/// Errors raised while rendering or saving a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The report has more rows than a worksheet holds.
    #[error("{0} rows do not fit in a worksheet")]
    TooManyRows(usize),

    /// The run date cannot be stored as workbook metadata.
    #[error("{0} cannot be used as the workbook creation date")]
    Date(NaiveDate),
}

/// On-disk report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Xlsx,
}

impl ReportFormat {
    /// Picks the format from the extension of `path`: `.xlsx` in any case,
    /// CSV otherwise.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Csv,
        }
    }
}

/// Report rows accumulated over a batch.
#[derive(Debug, Clone, Default)]
pub struct Report {
    records: Vec<OutputRecord>,
}

impl Report {
    /// Appends a record.
    pub fn push(&mut self, record: OutputRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column headers, in report order.
    #[must_use]
    pub fn header() -> Vec<String> {
        Column::ordered().iter().map(ToString::to_string).collect()
    }

    /// Writes the header and every record as CSV.
    ///
    /// # Errors
    ///
    /// Returns a [`csv::Error`] if writing fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(Self::header())?;
        for record in &self.records {
            csv_writer.write_record(record.row().iter().map(ToString::to_string))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Renders the header and every record as an `.xlsx` workbook.
    ///
    /// Numbers are stored as numeric cells and everything else as text.
    /// The workbook's creation date is set to `created`, so the same
    /// records rendered on the same day give identical bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if the workbook cannot be built.
    #[allow(clippy::cast_precision_loss)]
    pub fn xlsx_bytes(&self, created: NaiveDate) -> Result<Vec<u8>, ReportError> {
        let mut workbook = Workbook::new();
        let properties = DocProperties::new().set_creation_datetime(&excel_date(created)?);
        workbook.set_properties(&properties);

        let worksheet = workbook.add_worksheet();
        for (col, name) in (0u16..).zip(Self::header()) {
            worksheet.write_string(0, col, name)?;
        }

        for (index, record) in self.records.iter().enumerate() {
            let row = u32::try_from(index + 1).map_err(|_| ReportError::TooManyRows(index + 1))?;
            for (col, cell) in (0u16..).zip(record.row()) {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row, col, text)?,
                    Cell::Integer(value) => worksheet.write_number(row, col, value as f64)?,
                    Cell::Decimal(value) => worksheet.write_number(row, col, value)?,
                    Cell::NotFound => worksheet.write_string(row, col, NOT_FOUND)?,
                };
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Renders the report in `format`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if rendering fails.
    pub fn render(&self, format: ReportFormat, created: NaiveDate) -> Result<Vec<u8>, ReportError> {
        match format {
            ReportFormat::Csv => {
                let mut buffer = Vec::new();
                self.write_csv(&mut buffer)?;
                Ok(buffer)
            }
            ReportFormat::Xlsx => self.xlsx_bytes(created),
        }
    }

    /// Writes the report to `path`, replacing any existing file. The format
    /// follows the path's extension.
    ///
    /// The whole report is rendered in memory first so a failed render
    /// leaves no partial file behind.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if rendering or writing the file fails.
    pub fn write_to_path(&self, path: &Path, created: NaiveDate) -> Result<(), ReportError> {
        let buffer = self.render(ReportFormat::from_path(path), created)?;
        std::fs::write(path, buffer)?;
        Ok(())
    }
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, ReportError> {
    let year = u16::try_from(date.year()).map_err(|_| ReportError::Date(date))?;
    let month = u8::try_from(date.month()).map_err(|_| ReportError::Date(date))?;
    let day = u8::try_from(date.day()).map_err(|_| ReportError::Date(date))?;
    ExcelDateTime::from_ymd(year, month, day).map_err(|_| ReportError::Date(date))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader as _, Xlsx, open_workbook_from_rs};
    use transcript_metrics_transcript_models::{PeriodMetrics, RecencyRank};

    use super::*;

    fn record(source: &str) -> OutputRecord {
        let mut record = OutputRecord::default();
        record.set(Column::EnrollmentNumber, Cell::Text("123".to_owned()));
        record.set(Column::Nationality, Cell::Text("BRASILEIRA, NATA".to_owned()));
        record.set(Column::Age, Cell::Integer(22));
        record.set_period(
            RecencyRank::Latest,
            &PeriodMetrics {
                mean_grade: 7.35,
                mean_attendance: 88.0,
                approved: 4,
                failed: 1,
            },
        );
        record.set_period(RecencyRank::Previous, &PeriodMetrics::ZERO);
        record.set(Column::SourceFile, Cell::Text(source.to_owned()));
        record
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn header_has_every_column() {
        let header = Report::header();
        assert_eq!(header.len(), Column::COUNT);
        assert_eq!(header[0], "Matricula");
        assert_eq!(header[Column::COUNT - 1], "Arquivo_Origem");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("out.xlsx")), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::from_path(Path::new("OUT.XLSX")), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::from_path(Path::new("out.csv")), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_path(Path::new("relatorio")), ReportFormat::Csv);
    }

    #[test]
    fn writes_header_and_rows() {
        let mut report = Report::default();
        report.push(record("a.pdf"));
        report.push(record("b.pdf"));

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Report::header().join(","));
        assert_eq!(
            lines[1],
            "123,N/A,N/A,\"BRASILEIRA, NATA\",N/A,N/A,22,N/A,N/A,N/A,\
             7.35,88,4,1,0,0,0,0,N/A,N/A,N/A,N/A,a.pdf"
        );
    }

    #[test]
    fn every_row_has_the_same_width() {
        let mut report = Report::default();
        report.push(OutputRecord::default());
        report.push(record("a.pdf"));

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        for row in reader.records() {
            assert_eq!(row.unwrap().len(), Column::COUNT);
        }
    }

    #[test]
    fn workbook_holds_header_and_typed_cells() {
        let mut report = Report::default();
        report.push(record("a.pdf"));

        let bytes = report.xlsx_bytes(run_date()).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();

        assert_eq!(range.get_size(), (2, Column::COUNT));
        assert_eq!(range.get((0, 0)), Some(&Data::String("Matricula".to_owned())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("123".to_owned())));
        assert_eq!(range.get((1, 1)), Some(&Data::String("N/A".to_owned())));
        assert_eq!(range.get((1, 6)), Some(&Data::Float(22.0)));
        assert_eq!(range.get((1, 10)), Some(&Data::Float(7.35)));
        assert_eq!(
            range.get((1, Column::COUNT - 1)),
            Some(&Data::String("a.pdf".to_owned()))
        );
    }

    #[test]
    fn workbook_is_repeatable_on_the_same_day() {
        let mut report = Report::default();
        report.push(record("a.pdf"));

        assert_eq!(
            report.xlsx_bytes(run_date()).unwrap(),
            report.xlsx_bytes(run_date()).unwrap()
        );
    }

    #[test]
    fn write_to_path_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut report = Report::default();
        report.push(record("a.pdf"));
        report.write_to_path(&path, run_date()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Matricula,"));
        assert!(!written.contains("stale"));
        assert_eq!(
            written
                .lines()
                .nth(1)
                .map(|line| line.ends_with("a.pdf")),
            Some(true)
        );
    }

    #[test]
    fn write_to_path_writes_xlsx_for_xlsx_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relatorio.xlsx");

        let mut report = Report::default();
        report.push(record("a.pdf"));
        report.write_to_path(&path, run_date()).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"PK"));
    }
}
