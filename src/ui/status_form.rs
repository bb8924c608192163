use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::models::{STATUS_CHOICES, Status, TrackedProject};

pub enum StatusFormAction {
    Cancel,
    Save { position: usize, status: Status },
}

// Represents the state of the per-record status update form
pub struct StatusFormState {
    position: usize,
    project_name: String,
    choice: usize,
}

impl StatusFormState {
    /// `position` is the record's 1-based position in the loaded table,
    /// the only handle the store update has.
    pub fn new(position: usize, project: &TrackedProject) -> Self {
        let choice = STATUS_CHOICES
            .iter()
            .position(|status| *status == project.record.status)
            .unwrap_or(0);

        Self {
            position,
            project_name: project.record.name.clone(),
            choice,
        }
    }

    pub fn next_choice(&mut self) {
        self.choice = (self.choice + 1) % STATUS_CHOICES.len();
    }

    pub fn previous_choice(&mut self) {
        self.choice = (self.choice + STATUS_CHOICES.len() - 1) % STATUS_CHOICES.len();
    }

    pub fn selected_status(&self) -> Status {
        STATUS_CHOICES[self.choice].clone()
    }
}

pub fn render_status_form<B: Backend>(f: &mut Frame<B>, state: &mut StatusFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(format!("Update Status - {}", state.project_name))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = STATUS_CHOICES
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let marker = if i == state.choice { "> " } else { "  " };
            let style = if i == state.choice {
                Style::default()
                    .fg(status.color())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Spans::from(vec![Span::styled(
                format!("{marker}{}", status.as_str()),
                style,
            )]))
        })
        .collect();

    let choices = List::new(items).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(choices, chunks[1]);

    let help = Paragraph::new("Up/Down - Pick status | Enter - Save | Esc - Cancel")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn handle_input(state: &mut StatusFormState) -> Result<Option<StatusFormAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => return Ok(Some(StatusFormAction::Cancel)),
            KeyCode::Down | KeyCode::Right => state.next_choice(),
            KeyCode::Up | KeyCode::Left => state.previous_choice(),
            KeyCode::Enter | KeyCode::Char('s') => {
                return Ok(Some(StatusFormAction::Save {
                    position: state.position,
                    status: state.selected_status(),
                }));
            }
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::ProjectRecord;

    fn project(status: Status) -> TrackedProject {
        TrackedProject::derive(
            ProjectRecord {
                name: "Launch".to_string(),
                description: String::new(),
                status,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
    }

    #[test]
    fn selector_starts_on_the_current_status() {
        let state = StatusFormState::new(1, &project(Status::OnHold));
        assert_eq!(state.selected_status(), Status::OnHold);
    }

    #[test]
    fn unknown_status_falls_back_to_the_first_choice() {
        let state = StatusFormState::new(1, &project(Status::Other("Cancelled".to_string())));
        assert_eq!(state.selected_status(), Status::NotStarted);
    }

    #[test]
    fn choices_wrap_in_both_directions() {
        let mut state = StatusFormState::new(1, &project(Status::NotStarted));
        state.previous_choice();
        assert_eq!(state.selected_status(), Status::Completed);
        state.next_choice();
        assert_eq!(state.selected_status(), Status::NotStarted);
    }
}
