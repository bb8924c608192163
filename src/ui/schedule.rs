use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::models::{HEADER, TrackedProject};

pub enum ScheduleAction {
    Back,
    NextView,
    Quit,
}

/// Calendar view: the full table as a read-only date grid, unaffected by
/// the status filter.
pub fn render_schedule<B: Backend>(frame: &mut Frame<B>, table: &[TrackedProject]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(frame.size());

    if table.is_empty() {
        let empty = Paragraph::new("No projects to display.")
            .block(Block::default().title("Calendar View").borders(Borders::ALL));
        frame.render_widget(empty, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from(HEADER[0]),
            Cell::from(HEADER[3]),
            Cell::from(HEADER[4]),
            Cell::from(HEADER[2]),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = table
            .iter()
            .map(|project| {
                let record = &project.record;
                Row::new(vec![
                    Cell::from(record.name.clone()),
                    Cell::from(record.start_date.format("%Y-%m-%d").to_string()),
                    Cell::from(record.due_date.format("%Y-%m-%d").to_string()),
                    Cell::from(record.status.as_str().to_string())
                        .style(Style::default().fg(record.status.color())),
                ])
            })
            .collect();

        let grid = Table::new(rows)
            .header(header)
            .block(Block::default().title("Calendar View").borders(Borders::ALL))
            .widths(&[
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ]);
        frame.render_widget(grid, chunks[0]);
    }

    let bar = Paragraph::new("<Tab> Charts | <Esc> Board | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(bar, chunks[1]);
}

pub fn handle_input() -> Result<Option<ScheduleAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Tab => return Ok(Some(ScheduleAction::NextView)),
            KeyCode::Esc | KeyCode::Backspace => return Ok(Some(ScheduleAction::Back)),
            KeyCode::Char('q') => return Ok(Some(ScheduleAction::Quit)),
            _ => {}
        }
    }

    Ok(None)
}
