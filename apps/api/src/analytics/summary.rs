//! Pipeline analytics — grouped stage counts and a trailing 4-week trend,
//! computed fresh per request from one fetch of (stage, date) pairs.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// The per-application fields the aggregation needs.
#[derive(Debug, Clone, FromRow)]
pub struct StageSample {
    pub stage_id: i32,
    pub date_applied: chrono::NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct StageCount {
    pub stage_id: i32,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct WeekCount {
    pub week: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub response_rate: String,
    pub by_stage: Vec<StageCount>,
    pub weekly: Vec<WeekCount>,
}

/// Display name for a stage code. Unknown codes render as "Stage {n}".
pub fn stage_name(stage_id: i32) -> String {
    match stage_id {
        1 => "Wishlist".to_string(),
        2 => "Applied".to_string(),
        3 => "Interview".to_string(),
        4 => "Offer".to_string(),
        5 => "Rejected".to_string(),
        n => format!("Stage {n}"),
    }
}

/// Aggregates the summary relative to `as_of`. Passing a fixed instant makes
/// the weekly windows deterministic.
pub fn compute_summary(samples: &[StageSample], as_of: DateTime<Utc>) -> Summary {
    let total = samples.len();

    // Anything past "Applied" counts as a response. Integer percent, truncated.
    let responded = samples.iter().filter(|s| s.stage_id > 2).count();
    let response_rate = if total > 0 {
        format!("{}%", responded * 100 / total)
    } else {
        "0%".to_string()
    };

    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.stage_id).or_default() += 1;
    }
    let by_stage = counts
        .into_iter()
        .map(|(stage_id, count)| StageCount {
            stage_id,
            name: stage_name(stage_id),
            count,
        })
        .collect();

    // Trailing 4 weeks, oldest first. Each window is [start, end) on the
    // date level; the label is the Sunday-based week-of-year of the start.
    let mut weekly = Vec::with_capacity(4);
    for i in (0..4i64).rev() {
        let start = (as_of - Duration::weeks(i + 1)).date_naive();
        let end = (as_of - Duration::weeks(i)).date_naive();
        let count = samples
            .iter()
            .filter(|s| s.date_applied >= start && s.date_applied < end)
            .count();
        weekly.push(WeekCount {
            week: start.format("W%U").to_string(),
            count,
        });
    }

    Summary {
        total,
        response_rate,
        by_stage,
        weekly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn sample(stage_id: i32, date: &str) -> StageSample {
        StageSample {
            stage_id,
            date_applied: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_pipeline_has_zero_rate_not_a_division_error() {
        let summary = compute_summary(&[], as_of());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.response_rate, "0%");
        assert!(summary.by_stage.is_empty());
        assert_eq!(summary.weekly.len(), 4);
        assert!(summary.weekly.iter().all(|w| w.count == 0));
    }

    #[test]
    fn response_rate_truncates() {
        // 1 of 3 past Applied -> 33%, not 33.33 or 34.
        let samples = vec![
            sample(2, "2024-05-14"),
            sample(2, "2024-05-14"),
            sample(3, "2024-05-14"),
        ];
        let summary = compute_summary(&samples, as_of());
        assert_eq!(summary.response_rate, "33%");
    }

    #[test]
    fn by_stage_counts_sum_to_total() {
        let samples = vec![
            sample(1, "2024-05-01"),
            sample(2, "2024-05-02"),
            sample(2, "2024-05-03"),
            sample(5, "2024-05-04"),
            sample(7, "2024-05-05"),
        ];
        let summary = compute_summary(&samples, as_of());
        assert_eq!(summary.total, 5);
        let summed: usize = summary.by_stage.iter().map(|s| s.count).sum();
        assert_eq!(summed, summary.total);
        // Ascending by stage code, names resolved, unknown codes fall back.
        assert_eq!(summary.by_stage[0].name, "Wishlist");
        assert_eq!(summary.by_stage[1].count, 2);
        assert_eq!(summary.by_stage.last().unwrap().name, "Stage 7");
    }

    #[test]
    fn weekly_windows_are_half_open_and_oldest_first() {
        // as_of is 2024-05-15; the most recent window is [2024-05-08, 2024-05-15).
        let samples = vec![
            sample(2, "2024-05-08"), // start of last window: included
            sample(2, "2024-05-15"), // as_of date itself: excluded
            sample(2, "2024-05-01"), // start of the window before
            sample(2, "2024-04-16"), // older than 4 weeks: excluded
        ];
        let summary = compute_summary(&samples, as_of());
        let counts: Vec<usize> = summary.weekly.iter().map(|w| w.count).collect();
        assert_eq!(counts, vec![0, 0, 1, 1]);
    }

    #[test]
    fn weekly_labels_use_zero_padded_week_of_year() {
        let early = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let summary = compute_summary(&[], early);
        // 4 weeks before Feb 1 is Jan 4, still in Sunday-based week 0.
        assert_eq!(summary.weekly[0].week, "W00");
        assert_eq!(summary.weekly[1].week, "W01");
        assert!(summary.weekly.iter().all(|w| w.week.starts_with('W')));
        assert!(summary.weekly.iter().all(|w| w.week.len() == 3));
    }
}
