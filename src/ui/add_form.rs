use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::models::{ProjectRecord, STATUS_CHOICES};
use crate::ui::components::date_input::DateInput;

pub enum AddFormAction {
    Cancel,
    Save(ProjectRecord),
}

#[derive(Clone, Copy, PartialEq)]
pub enum AddField {
    Name,
    Description,
    Status,
    StartDate,
    DueDate,
}

// Represents the state of the add-project form
pub struct AddFormState {
    pub name: String,
    pub description: String,
    pub status_choice: usize,
    pub start_date: DateInput,
    pub due_date: DateInput,
    pub current_field: AddField,
    pub editing: bool,
}

impl AddFormState {
    pub fn new(today: chrono::NaiveDate) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status_choice: 0,
            start_date: DateInput::new(today),
            due_date: DateInput::new(today),
            current_field: AddField::Name,
            editing: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            match self.current_field {
                AddField::StartDate => self.start_date.toggle_editing(),
                AddField::DueDate => self.due_date.toggle_editing(),
                _ => {}
            }
        } else {
            self.start_date.stop_editing();
            self.due_date.stop_editing();
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            AddField::Name => AddField::Description,
            AddField::Description => AddField::Status,
            AddField::Status => AddField::StartDate,
            AddField::StartDate => AddField::DueDate,
            AddField::DueDate => AddField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            AddField::Name => AddField::DueDate,
            AddField::Description => AddField::Name,
            AddField::Status => AddField::Description,
            AddField::StartDate => AddField::Status,
            AddField::DueDate => AddField::StartDate,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            AddField::Name => match key {
                KeyCode::Char(c) => self.name.push(c),
                KeyCode::Backspace => {
                    self.name.pop();
                }
                _ => {}
            },
            AddField::Description => match key {
                KeyCode::Char(c) => self.description.push(c),
                KeyCode::Backspace => {
                    self.description.pop();
                }
                _ => {}
            },
            AddField::Status => match key {
                KeyCode::Right | KeyCode::Down => {
                    self.status_choice = (self.status_choice + 1) % STATUS_CHOICES.len();
                }
                KeyCode::Left | KeyCode::Up => {
                    self.status_choice =
                        (self.status_choice + STATUS_CHOICES.len() - 1) % STATUS_CHOICES.len();
                }
                _ => {}
            },
            AddField::StartDate => self.start_date.handle_key(key),
            AddField::DueDate => self.due_date.handle_key(key),
        }
    }

    /// A project needs at least a name; saving without one is refused
    /// silently.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn record(&self) -> ProjectRecord {
        ProjectRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            status: STATUS_CHOICES[self.status_choice].clone(),
            start_date: self.start_date.date,
            due_date: self.due_date.date,
        }
    }
}

pub fn render_add_form<B: Backend>(f: &mut Frame<B>, state: &mut AddFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new("Add New Project")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    // Help text
    let help_text = if state.editing {
        match state.current_field {
            AddField::Status => "Left/Right - Pick status | Enter - Save field | Esc - Cancel editing",
            AddField::StartDate | AddField::DueDate => {
                "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing"
            }
            _ => "Enter - Save field | Esc - Cancel editing",
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &mut AddFormState, area: Rect) {
    let field_names = ["Project Name", "Description", "Status", "Start Date", "Due Date"];

    let status_value = if state.current_field == AddField::Status && state.editing {
        format!("< {} >", STATUS_CHOICES[state.status_choice].as_str())
    } else {
        STATUS_CHOICES[state.status_choice].as_str().to_string()
    };

    let field_values = [
        state.name.clone(),
        state.description.clone(),
        status_value,
        state.start_date.display(),
        state.due_date.display(),
    ];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let content = if i == state.current_field as usize && state.editing {
                let displayed_value = match state.current_field {
                    AddField::Name | AddField::Description => format!("{value}|"),
                    _ => value.clone(),
                };

                Spans::from(vec![
                    Span::styled(format!("{name}: "), Style::default().fg(Color::Yellow)),
                    Span::styled(displayed_value, Style::default().add_modifier(Modifier::BOLD)),
                ])
            } else {
                let style = if i == state.current_field as usize {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                Spans::from(vec![
                    Span::styled(format!("{name}: "), style),
                    Span::raw(value.clone()),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut AddFormState) -> Result<Option<AddFormAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(AddFormAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() {
                    return Ok(Some(AddFormAction::Save(state.record())));
                }
                // Empty name: silent no-op, matching the original form
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}
