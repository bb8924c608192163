use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{ProjectRecord, STATUS_CHOICES, Status, TrackedProject};
use crate::sheet::{self, Worksheet};

/// `Status` lives in the third worksheet column
pub const STATUS_COLUMN: u32 = 3;

/// Read every record from the worksheet and derive the computed fields.
/// Dates must be ISO `YYYY-MM-DD`; a malformed date is fatal since nothing
/// validates the format on write.
pub async fn load_table<W: Worksheet>(ws: &W, today: NaiveDate) -> Result<Vec<TrackedProject>> {
    let records = sheet::records(ws).await?;

    let mut table = Vec::with_capacity(records.len());
    for record in records {
        let field = |label: &str| record.get(label).cloned().unwrap_or_default();

        let name = field("Project Name");
        let start_date = parse_date(&field("Start Date"))
            .with_context(|| format!("invalid Start Date for project '{name}'"))?;
        let due_date = parse_date(&field("Due Date"))
            .with_context(|| format!("invalid Due Date for project '{name}'"))?;

        let record = ProjectRecord {
            name,
            description: field("Description"),
            status: Status::parse(&field("Status")),
            start_date,
            due_date,
        };
        table.push(TrackedProject::derive(record, today));
    }

    Ok(table)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("unparseable date '{raw}'"))
}

/// Append a new project as the last worksheet row. The in-memory table is
/// not touched; the row shows up on the next reload.
pub async fn append_project<W: Worksheet>(ws: &W, record: &ProjectRecord) -> Result<()> {
    ws.append_row(&record.row_fields()).await
}

/// Store row addressed for the record at 1-based table `position`: one
/// offset for the header row, one for the store's 1-indexing.
pub fn store_row(position: usize) -> u32 {
    position as u32 + 2
}

/// Write a new status for the record at 1-based `position` in the loaded
/// table. Position-based addressing is rebuilt from the last load and has
/// no stable record id behind it; nothing verifies the row still holds the
/// same record.
pub async fn update_status<W: Worksheet>(ws: &W, position: usize, status: &Status) -> Result<()> {
    ws.update_cell(store_row(position), STATUS_COLUMN, status.as_str())
        .await
}

/// Multi-select over the four fixed statuses. Default: all selected.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusFilter {
    selected: [bool; 4],
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self {
            selected: [true; 4],
        }
    }
}

impl StatusFilter {
    pub fn toggle(&mut self, choice: usize) {
        if let Some(flag) = self.selected.get_mut(choice) {
            *flag = !*flag;
        }
    }

    pub fn is_enabled(&self, choice: usize) -> bool {
        self.selected.get(choice).copied().unwrap_or(false)
    }

    /// Whether records with this status pass the filter. Statuses outside
    /// the fixed set never match, same as a multiselect that cannot offer
    /// them.
    pub fn matches(&self, status: &Status) -> bool {
        STATUS_CHOICES
            .iter()
            .position(|choice| choice == status)
            .is_some_and(|i| self.selected[i])
    }

    /// Pure subset of the table, preserving row order
    pub fn apply(&self, table: &[TrackedProject]) -> Vec<TrackedProject> {
        table
            .iter()
            .filter(|project| self.matches(&project.record.status))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::HEADER;
    use crate::sheet::memory::MemorySheet;

    fn header_row() -> Vec<String> {
        HEADER.iter().map(|label| label.to_string()).collect()
    }

    fn data_row(name: &str, status: &str, start: &str, due: &str) -> Vec<String> {
        vec![
            name.to_string(),
            String::new(),
            status.to_string(),
            start.to_string(),
            due.to_string(),
        ]
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn load_derives_days_left_and_progress() {
        let sheet = MemorySheet::from_rows(vec![
            header_row(),
            data_row("Launch", " in progress ", "2024-01-01", "2024-01-13"),
        ]);

        let table = load_table(&sheet, today()).await.unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].record.status, Status::InProgress);
        assert_eq!(table[0].days_left, 3);
        assert_eq!(table[0].progress, Some(50));
    }

    #[tokio::test]
    async fn load_leaves_unknown_status_without_progress() {
        let sheet = MemorySheet::from_rows(vec![
            header_row(),
            data_row("Launch", "Cancelled", "2024-01-01", "2024-01-13"),
        ]);

        let table = load_table(&sheet, today()).await.unwrap();

        assert_eq!(table[0].record.status, Status::Other("Cancelled".to_string()));
        assert_eq!(table[0].progress, None);
    }

    #[tokio::test]
    async fn load_fails_on_malformed_date() {
        let sheet = MemorySheet::from_rows(vec![
            header_row(),
            data_row("Launch", "Completed", "01/02/2024", "2024-01-13"),
        ]);

        let err = load_table(&sheet, today()).await.unwrap_err();
        assert!(err.to_string().contains("Start Date"));
    }

    #[tokio::test]
    async fn append_adds_one_row_and_keeps_the_rest() {
        let sheet = MemorySheet::from_rows(vec![
            header_row(),
            data_row("Existing", "Completed", "2023-12-01", "2023-12-31"),
        ]);
        let record = ProjectRecord {
            name: "Launch".to_string(),
            description: String::new(),
            status: Status::InProgress,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        };

        append_project(&sheet, &record).await.unwrap();

        let rows = sheet.snapshot();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], data_row("Existing", "Completed", "2023-12-01", "2023-12-31"));
        assert_eq!(
            rows[2],
            data_row("Launch", "In Progress", "2024-01-01", "2024-01-31")
        );
    }

    #[test]
    fn store_row_offsets_position_by_header_and_indexing() {
        // 3rd in-memory record -> store row 5
        assert_eq!(store_row(3), 5);
        assert_eq!(store_row(1), 3);
    }

    #[tokio::test]
    async fn update_status_writes_one_cell_and_nothing_else() {
        let sheet = MemorySheet::from_rows(vec![
            header_row(),
            data_row("First", "Not Started", "2024-01-01", "2024-02-01"),
            data_row("Second", "Not Started", "2024-01-01", "2024-02-01"),
            data_row("Third", "Not Started", "2024-01-01", "2024-02-01"),
            data_row("Fourth", "Not Started", "2024-01-01", "2024-02-01"),
        ]);
        let before = sheet.snapshot();

        // 3rd in-memory record -> store coordinates (row 5, col 3)
        update_status(&sheet, 3, &Status::Completed).await.unwrap();

        let after = sheet.snapshot();
        assert_eq!(after[4][2], "Completed");
        for (row_idx, row) in after.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                if (row_idx, col_idx) != (4, 2) {
                    assert_eq!(cell, &before[row_idx][col_idx]);
                }
            }
        }
    }

    fn tracked(name: &str, status: Status) -> TrackedProject {
        TrackedProject::derive(
            ProjectRecord {
                name: name.to_string(),
                description: String::new(),
                status,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
            today(),
        )
    }

    #[test]
    fn full_filter_returns_table_unchanged() {
        let table = vec![
            tracked("A", Status::InProgress),
            tracked("B", Status::Completed),
            tracked("C", Status::NotStarted),
        ];

        assert_eq!(StatusFilter::default().apply(&table), table);
    }

    #[test]
    fn empty_filter_returns_no_rows() {
        let table = vec![tracked("A", Status::InProgress)];
        let mut filter = StatusFilter::default();
        for choice in 0..4 {
            filter.toggle(choice);
        }

        assert!(filter.apply(&table).is_empty());
    }

    #[test]
    fn filter_keeps_only_selected_statuses() {
        let table = vec![
            tracked("A", Status::InProgress),
            tracked("B", Status::Completed),
            tracked("C", Status::Other("Cancelled".to_string())),
        ];
        let mut filter = StatusFilter::default();
        filter.toggle(3); // drop Completed

        let visible = filter.apply(&table);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].record.name, "A");
    }
}
