use chrono::NaiveDate;

use crate::models::Status;

/// The fixed worksheet header, always the first row of the backing store.
pub const HEADER: [&str; 5] = [
    "Project Name",
    "Description",
    "Status",
    "Start Date",
    "Due Date",
];

/// A project record as stored in the worksheet: the five raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub status: Status,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl ProjectRecord {
    /// The five cell values in header order, dates serialized as ISO
    /// `YYYY-MM-DD`. This is exactly what gets appended on create.
    pub fn row_fields(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.description.clone(),
            self.status.as_str().to_string(),
            self.start_date.format("%Y-%m-%d").to_string(),
            self.due_date.format("%Y-%m-%d").to_string(),
        ]
    }
}

/// A loaded record plus its derived fields. Derived values are computed at
/// load time and never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedProject {
    pub record: ProjectRecord,
    pub days_left: i64,
    pub progress: Option<u8>,
}

impl TrackedProject {
    pub fn derive(record: ProjectRecord, today: NaiveDate) -> Self {
        let days_left = (record.due_date - today).num_days();
        let progress = record.status.progress();
        Self {
            record,
            days_left,
            progress,
        }
    }
}
