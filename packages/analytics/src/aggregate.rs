//! Per-period grouping and recency-ranked metrics.
//!
//! Period tokens are zero-padded `YYYY.N`, so plain string order is
//! chronological order. The most recent periods are read from the end of
//! an ordered map.
//!
//! A rank with no period behind it reports [`PeriodMetrics::ZERO`], not
//! the `N/A` sentinel used for header fields: downstream consumers do
//! arithmetic on these columns.

use std::collections::BTreeMap;

use transcript_metrics_transcript_models::{CourseRow, PeriodMetrics, RecencyRank};

/// Course rows grouped by period token.
#[derive(Debug, Clone, Default)]
pub struct PeriodBuckets {
    buckets: BTreeMap<String, Vec<CourseRow>>,
}

impl PeriodBuckets {
    /// Adds a row to the bucket for its period.
    pub fn insert(&mut self, row: CourseRow) {
        self.buckets.entry(row.period.clone()).or_default().push(row);
    }

    /// Number of distinct periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no rows were bucketed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the period token and rows at `rank`, if that many periods
    /// exist.
    #[must_use]
    pub fn at_rank(&self, rank: RecencyRank) -> Option<(&str, &[CourseRow])> {
        self.buckets
            .iter()
            .rev()
            .nth(rank.index())
            .map(|(period, rows)| (period.as_str(), rows.as_slice()))
    }

    /// Metrics for the period at `rank`, or zeros if there is none.
    #[must_use]
    pub fn metrics_at(&self, rank: RecencyRank) -> PeriodMetrics {
        self.at_rank(rank)
            .map_or(PeriodMetrics::ZERO, |(_, rows)| period_metrics(rows))
    }

    /// Metrics for every recency rank, most recent first.
    #[must_use]
    pub fn recent_metrics(&self) -> Vec<(RecencyRank, PeriodMetrics)> {
        RecencyRank::all()
            .iter()
            .map(|&rank| (rank, self.metrics_at(rank)))
            .collect()
    }
}

impl FromIterator<CourseRow> for PeriodBuckets {
    fn from_iter<I: IntoIterator<Item = CourseRow>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for row in iter {
            buckets.insert(row);
        }
        buckets
    }
}

/// Summarizes the rows of one period.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn period_metrics(rows: &[CourseRow]) -> PeriodMetrics {
    if rows.is_empty() {
        return PeriodMetrics::ZERO;
    }

    let count = rows.len() as f64;
    let grade_total: f64 = rows.iter().map(|row| row.grade).sum();
    let attendance_total: f64 = rows.iter().map(|row| row.attendance).sum();
    let approved = rows.iter().filter(|row| row.outcome.is_approved()).count();
    let failed = rows.iter().filter(|row| row.outcome.is_failure()).count();

    PeriodMetrics {
        mean_grade: round2(grade_total / count),
        mean_attendance: round2(attendance_total / count),
        approved: u32::try_from(approved).unwrap_or(u32::MAX),
        failed: u32::try_from(failed).unwrap_or(u32::MAX),
    }
}

/// Rounds to 2 decimal places using the exact decimal value of `value`
/// (so `2.675`, stored as `2.67499…`, rounds down). Exact ties such as
/// `0.125` round half to even.
#[must_use]
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use transcript_metrics_transcript_models::Outcome;

    use super::*;

    fn row(period: &str, grade: f64, attendance: f64, outcome: Outcome) -> CourseRow {
        CourseRow {
            period: period.to_owned(),
            grade,
            attendance,
            outcome,
        }
    }

    #[test]
    fn single_period_metrics() {
        let buckets: PeriodBuckets = vec![
            row("2023.1", 8.5, 95.0, Outcome::Approved),
            row("2023.1", 4.0, 60.0, Outcome::Failed),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            buckets.metrics_at(RecencyRank::Latest),
            PeriodMetrics {
                mean_grade: 6.25,
                mean_attendance: 77.5,
                approved: 1,
                failed: 1,
            }
        );
        assert_eq!(
            buckets.metrics_at(RecencyRank::Previous),
            PeriodMetrics::ZERO
        );
        assert_eq!(
            buckets.metrics_at(RecencyRank::BeforePrevious),
            PeriodMetrics::ZERO
        );
    }

    #[test]
    fn no_rows_means_zero_everywhere() {
        let buckets = PeriodBuckets::default();

        assert!(buckets.is_empty());
        for (_, metrics) in buckets.recent_metrics() {
            assert_eq!(metrics, PeriodMetrics::ZERO);
        }
    }

    #[test]
    fn ranks_follow_period_order_not_insertion_order() {
        let buckets: PeriodBuckets = vec![
            row("2022.2", 6.0, 80.0, Outcome::Approved),
            row("2023.2", 9.0, 100.0, Outcome::Approved),
            row("2021.1", 3.0, 40.0, Outcome::FailedForAbsence),
            row("2023.1", 7.0, 90.0, Outcome::Approved),
        ]
        .into_iter()
        .collect();

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets.at_rank(RecencyRank::Latest).unwrap().0, "2023.2");
        assert_eq!(buckets.at_rank(RecencyRank::Previous).unwrap().0, "2023.1");
        assert_eq!(
            buckets.at_rank(RecencyRank::BeforePrevious).unwrap().0,
            "2022.2"
        );
    }

    #[test]
    fn both_failing_outcomes_are_counted() {
        let metrics = period_metrics(&[
            row("2022.1", 2.0, 30.0, Outcome::FailedForAbsence),
            row("2022.1", 4.5, 80.0, Outcome::Failed),
            row("2022.1", 7.0, 90.0, Outcome::Approved),
        ]);

        assert_eq!(metrics.approved, 1);
        assert_eq!(metrics.failed, 2);
        assert!((metrics.mean_grade - 4.5).abs() < f64::EPSILON);
        assert!((metrics.mean_attendance - 66.67).abs() < f64::EPSILON);
    }

    #[test]
    fn means_are_rounded_to_two_places() {
        assert!((round2(7.666_666) - 7.67).abs() < f64::EPSILON);
        assert!((round2(2.675) - 2.67).abs() < f64::EPSILON);
        assert!((round2(95.0) - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_ties_round_half_to_even() {
        assert!((round2(0.125) - 0.12).abs() < f64::EPSILON);
        assert!((round2(8.125) - 8.12).abs() < f64::EPSILON);
        assert!((round2(77.125) - 77.12).abs() < f64::EPSILON);
        assert!((round2(0.375) - 0.38).abs() < f64::EPSILON);
    }

    #[test]
    fn rows_of_one_period_share_a_bucket() {
        let buckets: PeriodBuckets = vec![
            row("2022.2", 6.0, 80.0, Outcome::Approved),
            row("2022.2", 5.0, 75.0, Outcome::Failed),
            row("2023.1", 7.0, 90.0, Outcome::Approved),
        ]
        .into_iter()
        .collect();

        assert_eq!(buckets.len(), 2);
        let (period, rows) = buckets.at_rank(RecencyRank::Previous).unwrap();
        assert_eq!(period, "2022.2");
        assert_eq!(rows.len(), 2);
    }
}
