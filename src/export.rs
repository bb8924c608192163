use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::{HEADER, TrackedProject};

pub const CSV_FILENAME: &str = "project_tracker.csv";
pub const TXT_FILENAME: &str = "project_tracker.txt";

/// A downloadable byte payload with its fixed filename and MIME type
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Column labels for exports: the five stored fields plus the two derived
/// ones, matching what the dashboard displays.
fn export_header() -> Vec<String> {
    let mut labels: Vec<String> = HEADER.iter().map(|label| label.to_string()).collect();
    labels.push("Days Left".to_string());
    labels.push("Progress".to_string());
    labels
}

fn export_row(project: &TrackedProject) -> Vec<String> {
    let mut cells = project.record.row_fields().to_vec();
    cells.push(project.days_left.to_string());
    cells.push(
        project
            .progress
            .map(|p| p.to_string())
            .unwrap_or_default(),
    );
    cells
}

/// Serialize the filtered table as comma-separated text, header included,
/// no index column.
pub fn to_csv(table: &[TrackedProject]) -> ExportFile {
    let mut content = String::new();

    content.push_str(&join_csv_row(&export_header()));
    content.push('\n');
    for project in table {
        content.push_str(&join_csv_row(&export_row(project)));
        content.push('\n');
    }

    ExportFile {
        filename: CSV_FILENAME,
        content_type: mime::TEXT_CSV,
        bytes: content.into_bytes(),
    }
}

fn join_csv_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| csv_field(cell))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote fields containing commas, quotes or newlines, doubling embedded
/// quotes
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serialize the filtered table as a column-aligned plain-text rendering
pub fn to_text(table: &[TrackedProject]) -> ExportFile {
    let header = export_header();
    let rows: Vec<Vec<String>> = table.iter().map(export_row).collect();

    // Column width: widest cell wins, header included
    let mut widths: Vec<usize> = header.iter().map(String::len).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut content = String::new();
    content.push_str(&pad_row(&header, &widths));
    content.push('\n');
    for row in &rows {
        content.push_str(&pad_row(row, &widths));
        content.push('\n');
    }

    ExportFile {
        filename: TXT_FILENAME,
        content_type: mime::TEXT_PLAIN,
        bytes: content.into_bytes(),
    }
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Write an export payload into the output directory, creating it if
/// needed, and return the full path.
pub fn write_to_dir(export: &ExportFile, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(export.filename);
    let mut file = File::create(&path)?;
    file.write_all(&export.bytes)?;

    Ok(path)
}
