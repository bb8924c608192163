use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::models::{STATUS_CHOICES, TrackedProject};
use crate::report::{self, Summary};
use crate::table::StatusFilter;

// Represents the state of the main dashboard screen
pub struct BoardState {
    table: Vec<TrackedProject>,
    filter: StatusFilter,
    /// Visible records with their 1-based position in the full table; the
    /// position is the only handle a status update has.
    visible: Vec<(usize, TrackedProject)>,
    list_state: ListState,
    summary: Option<Summary>,
    show_filter: bool,
    notice: Option<String>,
}

impl BoardState {
    pub fn new(table: Vec<TrackedProject>, filter: StatusFilter, today: NaiveDate) -> Self {
        let summary = report::summarize(&table, today);
        let mut state = Self {
            table,
            filter,
            visible: Vec::new(),
            list_state: ListState::default(),
            summary,
            show_filter: false,
            notice: None,
        };
        state.refresh_visible();
        state
    }

    fn refresh_visible(&mut self) {
        self.visible = self
            .table
            .iter()
            .enumerate()
            .filter(|(_, project)| self.filter.matches(&project.record.status))
            .map(|(i, project)| (i + 1, project.clone()))
            .collect();

        let selection = match self.list_state.selected() {
            Some(i) if i < self.visible.len() => Some(i),
            _ if self.visible.is_empty() => None,
            _ => Some(0),
        };
        self.list_state.select(selection);
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&(usize, TrackedProject)> {
        self.list_state.selected().and_then(|i| self.visible.get(i))
    }

    pub fn table(&self) -> &[TrackedProject] {
        &self.table
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter.clone()
    }

    /// The filtered table, what exports serialize
    pub fn filtered(&self) -> Vec<TrackedProject> {
        self.filter.apply(&self.table)
    }

    pub fn toggle_filter_popup(&mut self) {
        self.show_filter = !self.show_filter;
    }

    pub fn toggle_status(&mut self, choice: usize) {
        self.filter.toggle(choice);
        self.refresh_visible();
    }

    pub fn set_notice(&mut self, notice: String) {
        self.notice = Some(notice);
    }
}

pub enum BoardAction {
    Quit,
    NewProject,
    UpdateStatus(usize), // Contains the record's 1-based position in the full table
    ExportCsv,
    ExportTxt,
    NextView,
}

pub fn render_board<B: Backend>(frame: &mut Frame<B>, state: &mut BoardState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let title = Paragraph::new("Internal Project Tracker")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    render_project_list(frame, state, body[0]);
    render_detail_card(frame, state, body[1]);
    render_summary(frame, state, chunks[2]);

    // Bottom bar: last write/export notice when present, key legend otherwise
    let bar_text = match &state.notice {
        Some(notice) => notice.clone(),
        None => {
            "<N> New | <U> Update Status | <F> Filter | <C> CSV | <T> TXT | <Tab> Views | <Q> Quit"
                .to_string()
        }
    };
    let bar = Paragraph::new(bar_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(bar, chunks[3]);

    if state.show_filter {
        render_filter_popup(frame, state, size);
    }
}

fn render_project_list<B: Backend>(frame: &mut Frame<B>, state: &mut BoardState, area: Rect) {
    if state.visible.is_empty() {
        let empty = Paragraph::new("No projects to display.")
            .block(Block::default().title("Projects").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .visible
        .iter()
        .map(|(_, project)| {
            ListItem::new(Spans::from(vec![
                Span::raw(&project.record.name),
                Span::raw(" "),
                Span::styled(
                    format!("({})", project.record.status.as_str()),
                    Style::default().fg(project.record.status.color()),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

fn render_detail_card<B: Backend>(frame: &mut Frame<B>, state: &BoardState, area: Rect) {
    let block = Block::default().title("Details").borders(Borders::ALL);

    let Some((_, project)) = state.selected() else {
        frame.render_widget(block, area);
        return;
    };

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(area);
    frame.render_widget(block, area);

    let record = &project.record;
    let lines = vec![
        Spans::from(vec![
            Span::styled("Description: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(&record.description),
        ]),
        Spans::from(vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                record.status.as_str(),
                Style::default().fg(record.status.color()),
            ),
        ]),
        Spans::from(vec![
            Span::styled("Start Date: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(record.start_date.format("%Y-%m-%d").to_string()),
        ]),
        Spans::from(vec![
            Span::styled("Due Date: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(record.due_date.format("%Y-%m-%d").to_string()),
        ]),
        Spans::from(vec![
            Span::styled("Days Left: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(project.days_left.to_string()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner_chunks[0]);

    // Statuses outside the fixed set have no progress to show
    if let Some(progress) = project.progress {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(record.status.color()))
            .percent(progress as u16);
        frame.render_widget(gauge, inner_chunks[1]);
    }
}

fn render_summary<B: Backend>(frame: &mut Frame<B>, state: &BoardState, area: Rect) {
    let text = match &state.summary {
        Some(summary) => summary.sentence(),
        None => "No projects yet.".to_string(),
    };

    let summary = Paragraph::new(text)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().title("Project Summary").borders(Borders::ALL));
    frame.render_widget(summary, area);
}

fn render_filter_popup<B: Backend>(frame: &mut Frame<B>, state: &BoardState, size: Rect) {
    let popup_area = centered_rect(40, 40, size);

    let mut lines = vec![Spans::from(""), Spans::from("Filter by Status")];
    for (i, status) in STATUS_CHOICES.iter().enumerate() {
        let mark = if state.filter.is_enabled(i) { "[x]" } else { "[ ]" };
        lines.push(Spans::from(vec![
            Span::raw(format!(" {mark} <{}> ", i + 1)),
            Span::styled(
                status.as_str(),
                Style::default().fg(status.color()),
            ),
        ]));
    }
    lines.push(Spans::from(""));
    lines.push(Spans::from("<1-4> Toggle  <Esc> Close"));

    let popup = Paragraph::new(lines)
        .block(Block::default().title("Filter").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn handle_input(state: &mut BoardState) -> Result<Option<BoardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.show_filter {
            match key.code {
                KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
                    state.toggle_filter_popup();
                }
                KeyCode::Char(c) if ('1'..='4').contains(&c) => {
                    state.toggle_status(c as usize - '1' as usize);
                }
                _ => {}
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(BoardAction::Quit)),
            KeyCode::Char('n') => return Ok(Some(BoardAction::NewProject)),
            KeyCode::Char('u') => {
                if let Some((position, _)) = state.selected() {
                    return Ok(Some(BoardAction::UpdateStatus(*position)));
                }
            }
            KeyCode::Char('f') => state.toggle_filter_popup(),
            KeyCode::Char('c') => return Ok(Some(BoardAction::ExportCsv)),
            KeyCode::Char('t') => return Ok(Some(BoardAction::ExportTxt)),
            KeyCode::Tab => return Ok(Some(BoardAction::NextView)),
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{ProjectRecord, Status};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
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
    fn visible_records_keep_their_table_position() {
        let table = vec![
            tracked("A", Status::NotStarted),
            tracked("B", Status::Completed),
            tracked("C", Status::NotStarted),
        ];
        let mut state = BoardState::new(table, StatusFilter::default(), today());

        // Hide Not Started; only B at table position 2 remains
        state.toggle_filter_popup();
        state.toggle_status(0);

        assert_eq!(state.visible.len(), 1);
        assert_eq!(
            state.selected().map(|(pos, p)| (*pos, p.record.name.clone())),
            Some((2, "B".to_string()))
        );
    }

    #[test]
    fn selection_clears_when_filter_empties_the_board() {
        let table = vec![tracked("A", Status::NotStarted)];
        let mut state = BoardState::new(table, StatusFilter::default(), today());

        state.toggle_status(0);

        assert_eq!(state.selected(), None);
    }

    #[test]
    fn summary_is_absent_for_an_empty_table() {
        let state = BoardState::new(Vec::new(), StatusFilter::default(), today());
        assert!(state.summary.is_none());
    }
}
