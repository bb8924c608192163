use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph},
};

use crate::models::TrackedProject;
use crate::report;

pub enum ChartsAction {
    Back,
    NextView,
    Quit,
}

/// Visual overview: status distribution on top, project timeline below.
/// Both read the full table; the chart data itself comes from `report`.
pub fn render_charts<B: Backend>(frame: &mut Frame<B>, table: &[TrackedProject]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(12),
                Constraint::Min(5),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    if table.is_empty() {
        let empty = Paragraph::new("No projects to display.")
            .block(Block::default().title("Visual Overview").borders(Borders::ALL));
        frame.render_widget(empty, chunks[0]);
    } else {
        render_distribution(frame, table, chunks[0]);
        render_timeline(frame, table, chunks[1]);
    }

    let bar = Paragraph::new("<Tab> Board | <Esc> Board | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(bar, chunks[2]);
}

fn render_distribution<B: Backend>(frame: &mut Frame<B>, table: &[TrackedProject], area: Rect) {
    let counts = report::status_counts(table);
    let data: Vec<(&str, u64)> = counts
        .iter()
        .map(|(status, count)| (status.as_str(), *count as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title("Project Status Distribution")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(14)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    frame.render_widget(chart, area);
}

fn render_timeline<B: Backend>(frame: &mut Frame<B>, table: &[TrackedProject], area: Rect) {
    let spans = report::timeline_spans(table);

    // The lane scale runs from the earliest start to the latest due date
    let Some(min_start) = spans.iter().map(|s| s.start).min() else {
        return;
    };
    let max_due = spans.iter().map(|s| s.due).max().unwrap_or(min_start);
    let total_days = (max_due - min_start).num_days().max(1);

    let label_width = spans
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let lane_width = (area.width as usize).saturating_sub(label_width + 4).max(10) as i64;

    let items: Vec<ListItem> = spans
        .iter()
        .map(|span| {
            let offset = (span.start - min_start).num_days() * lane_width / total_days;
            let length =
                ((span.due - span.start).num_days() * lane_width / total_days).max(1) as usize;

            let label: String = span.name.chars().take(label_width).collect();

            ListItem::new(Spans::from(vec![
                Span::raw(format!("{label:<label_width$} ")),
                Span::raw(" ".repeat(offset as usize)),
                Span::styled(
                    "█".repeat(length),
                    Style::default().fg(span.status.color()),
                ),
            ]))
        })
        .collect();

    let timeline = List::new(items)
        .block(Block::default().title("Project Timeline").borders(Borders::ALL));
    frame.render_widget(timeline, area);
}

pub fn handle_input() -> Result<Option<ChartsAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Tab => return Ok(Some(ChartsAction::NextView)),
            KeyCode::Esc | KeyCode::Backspace => return Ok(Some(ChartsAction::Back)),
            KeyCode::Char('q') => return Ok(Some(ChartsAction::Quit)),
            _ => {}
        }
    }

    Ok(None)
}
