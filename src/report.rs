use chrono::{Days, NaiveDate};

use crate::models::{Status, TrackedProject};

/// Aggregates for the summary line. Only produced for a non-empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub in_progress: usize,
    pub due_this_week: usize,
    pub on_track: usize,
    /// on_track / total * 100, truncated to an integer
    pub on_track_pct: u32,
}

impl Summary {
    pub fn sentence(&self) -> String {
        format!(
            "You have {} project(s) in progress, {} due this week. {}% of your projects are on track.",
            self.in_progress, self.due_this_week, self.on_track_pct
        )
    }
}

/// Pure aggregation over the loaded table. "Due this week" means a due date
/// in [today, today + 7 days] inclusive; "on track" means In Progress or
/// Completed. Returns `None` for an empty table.
pub fn summarize(table: &[TrackedProject], today: NaiveDate) -> Option<Summary> {
    if table.is_empty() {
        return None;
    }

    let week_end = today + Days::new(7);
    let in_progress = table
        .iter()
        .filter(|p| p.record.status == Status::InProgress)
        .count();
    let due_this_week = table
        .iter()
        .filter(|p| p.record.due_date >= today && p.record.due_date <= week_end)
        .count();
    let on_track = table
        .iter()
        .filter(|p| {
            matches!(p.record.status, Status::InProgress | Status::Completed)
        })
        .count();

    Some(Summary {
        total: table.len(),
        in_progress,
        due_this_week,
        on_track,
        on_track_pct: (on_track * 100 / table.len()) as u32,
    })
}

/// Group-and-count by status for the distribution chart, most frequent
/// first; ties keep first appearance order. Statuses with no records are
/// omitted.
pub fn status_counts(table: &[TrackedProject]) -> Vec<(Status, usize)> {
    let mut counts: Vec<(Status, usize)> = Vec::new();
    for project in table {
        match counts
            .iter_mut()
            .find(|(status, _)| *status == project.record.status)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((project.record.status.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// One timeline lane per project for the schedule chart
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSpan {
    pub name: String,
    pub start: NaiveDate,
    pub due: NaiveDate,
    pub status: Status,
}

/// Project each record to its [start, due] interval, sorted by start date
/// ascending. Rendering and coloring stay with the caller.
pub fn timeline_spans(table: &[TrackedProject]) -> Vec<TimelineSpan> {
    let mut spans: Vec<TimelineSpan> = table
        .iter()
        .map(|p| TimelineSpan {
            name: p.record.name.clone(),
            start: p.record.start_date,
            due: p.record.due_date,
            status: p.record.status.clone(),
        })
        .collect();
    spans.sort_by_key(|span| span.start);
    spans
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::ProjectRecord;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn tracked(name: &str, status: Status, start: NaiveDate, due: NaiveDate) -> TrackedProject {
        TrackedProject::derive(
            ProjectRecord {
                name: name.to_string(),
                description: String::new(),
                status,
                start_date: start,
                due_date: due,
            },
            today(),
        )
    }

    fn sample(status: Status, due: NaiveDate) -> TrackedProject {
        tracked("P", status, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), due)
    }

    #[test]
    fn summary_counts_mixed_statuses() {
        let due = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let table = vec![
            sample(Status::InProgress, due),
            sample(Status::Completed, due),
            sample(Status::NotStarted, due),
            sample(Status::OnHold, due),
        ];

        let summary = summarize(&table, today()).unwrap();

        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.on_track, 2);
        assert_eq!(summary.on_track_pct, 50);
    }

    #[test]
    fn due_this_week_bounds_are_inclusive() {
        let table = vec![
            sample(Status::InProgress, today()),
            sample(Status::InProgress, today() + Days::new(7)),
            sample(Status::InProgress, today() + Days::new(8)),
            sample(Status::InProgress, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()),
        ];

        let summary = summarize(&table, today()).unwrap();
        assert_eq!(summary.due_this_week, 2);
    }

    #[test]
    fn on_track_percentage_truncates() {
        let due = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let table = vec![
            sample(Status::InProgress, due),
            sample(Status::NotStarted, due),
            sample(Status::NotStarted, due),
        ];

        // 1/3 -> 33.33..% -> 33
        assert_eq!(summarize(&table, today()).unwrap().on_track_pct, 33);
    }

    #[test]
    fn empty_table_has_no_summary() {
        assert_eq!(summarize(&[], today()), None);
    }

    #[test]
    fn status_counts_group_and_rank_by_frequency() {
        let due = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let table = vec![
            sample(Status::NotStarted, due),
            sample(Status::Completed, due),
            sample(Status::Completed, due),
        ];

        assert_eq!(
            status_counts(&table),
            vec![(Status::Completed, 2), (Status::NotStarted, 1)]
        );
    }

    #[test]
    fn timeline_spans_sort_by_start_date() {
        let table = vec![
            tracked(
                "Later",
                Status::InProgress,
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ),
            tracked(
                "Earlier",
                Status::Completed,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            ),
        ];

        let spans = timeline_spans(&table);
        assert_eq!(spans[0].name, "Earlier");
        assert_eq!(spans[1].name, "Later");
    }
}
