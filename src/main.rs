mod config;
mod export;
mod models;
mod report;
mod sheet;
mod table;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::sheet::SheetsClient;
use crate::table::StatusFilter;
use crate::ui::{
    add_form::{
        AddFormAction, AddFormState, handle_input as handle_add_form_input, render_add_form,
    },
    board::{BoardAction, BoardState, handle_input as handle_board_input, render_board},
    charts::{ChartsAction, handle_input as handle_charts_input, render_charts},
    schedule::{ScheduleAction, handle_input as handle_schedule_input, render_schedule},
    status_form::{
        StatusFormAction, StatusFormState, handle_input as handle_status_form_input,
        render_status_form,
    },
};

#[derive(Parser)]
#[command(
    name = "project-tracker",
    about = "Terminal dashboard for the shared project tracker worksheet"
)]
struct Cli {
    /// Directory receiving exported files
    #[arg(long, default_value = "exports")]
    output_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write the tracker table to a file without opening the dashboard
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Txt,
}

// Represents the current screen in the app
enum AppScreen {
    Board,
    Schedule,
    Charts,
    AddForm,
    StatusForm,
}

// Main application state
struct AppState {
    sheet: SheetsClient,
    screen: AppScreen,
    board_state: Option<BoardState>,
    add_form_state: Option<AddFormState>,
    status_form_state: Option<StatusFormState>,
}

impl AppState {
    fn new(sheet: SheetsClient) -> Self {
        Self {
            sheet,
            screen: AppScreen::Board,
            board_state: None,
            add_form_state: None,
            status_form_state: None,
        }
    }
}

/// Logs go to a file: stdout belongs to the terminal UI
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(".", "project_tracker.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing();

    // Load configuration
    let config = config::init()?;

    // One long-lived client handle for the whole process
    let sheet = SheetsClient::new(&config);
    sheet::ensure_header(&sheet).await?;

    if let Some(Command::Export { format }) = cli.command {
        return run_export(&sheet, format, &cli.output_dir).await;
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state and load the first board
    let mut app_state = AppState::new(sheet);
    let result = match load_board_screen(&mut app_state, StatusFilter::default(), None).await {
        Ok(()) => run_app(&mut terminal, &mut app_state, &cli.output_dir).await,
        Err(err) => Err(err),
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

/// Headless export: load, filter with everything selected, write one file
async fn run_export(sheet: &SheetsClient, format: ExportFormat, output_dir: &Path) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let table = table::load_table(sheet, today).await?;
    let filtered = StatusFilter::default().apply(&table);

    let export = match format {
        ExportFormat::Csv => export::to_csv(&filtered),
        ExportFormat::Txt => export::to_text(&filtered),
    };
    let path = export::write_to_dir(&export, output_dir)?;
    println!("Exported {} record(s) to {}", filtered.len(), path.display());

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    output_dir: &Path,
) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Board => {
                if let Some(state) = &mut app_state.board_state {
                    render_board(f, state);
                }
            }
            AppScreen::Schedule => {
                if let Some(state) = &app_state.board_state {
                    render_schedule(f, state.table());
                }
            }
            AppScreen::Charts => {
                if let Some(state) = &app_state.board_state {
                    render_charts(f, state.table());
                }
            }
            AppScreen::AddForm => {
                if let Some(state) = &mut app_state.add_form_state {
                    render_add_form(f, state);
                }
            }
            AppScreen::StatusForm => {
                if let Some(state) = &mut app_state.status_form_state {
                    render_status_form(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Board => handle_board_screen(app_state, output_dir).await?,
            AppScreen::Schedule => handle_schedule_screen(app_state)?,
            AppScreen::Charts => handle_charts_screen(app_state)?,
            AppScreen::AddForm => handle_add_form_screen(app_state).await?,
            AppScreen::StatusForm => handle_status_form_screen(app_state).await?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Reload the table from the store, re-derive, and show the board. Every
/// path that wrote to the store comes back through here.
async fn load_board_screen(
    app_state: &mut AppState,
    filter: StatusFilter,
    notice: Option<String>,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let table = table::load_table(&app_state.sheet, today).await?;

    let mut board = BoardState::new(table, filter, today);
    if let Some(notice) = notice {
        board.set_notice(notice);
    }

    app_state.board_state = Some(board);
    app_state.screen = AppScreen::Board;

    Ok(())
}

fn current_filter(app_state: &AppState) -> StatusFilter {
    app_state
        .board_state
        .as_ref()
        .map(|board| board.filter())
        .unwrap_or_default()
}

async fn handle_board_screen(app_state: &mut AppState, output_dir: &Path) -> Result<bool> {
    if let Some(state) = &mut app_state.board_state {
        match handle_board_input(state)? {
            Some(BoardAction::Quit) => {
                return Ok(true);
            }
            Some(BoardAction::NewProject) => {
                app_state.add_form_state =
                    Some(AddFormState::new(chrono::Local::now().date_naive()));
                app_state.screen = AppScreen::AddForm;
            }
            Some(BoardAction::UpdateStatus(position)) => {
                if let Some(project) = state.table().get(position - 1) {
                    app_state.status_form_state = Some(StatusFormState::new(position, project));
                    app_state.screen = AppScreen::StatusForm;
                }
            }
            Some(BoardAction::ExportCsv) => {
                let export = export::to_csv(&state.filtered());
                let path = export::write_to_dir(&export, output_dir)?;
                state.set_notice(format!("Saved {}", path.display()));
            }
            Some(BoardAction::ExportTxt) => {
                let export = export::to_text(&state.filtered());
                let path = export::write_to_dir(&export, output_dir)?;
                state.set_notice(format!("Saved {}", path.display()));
            }
            Some(BoardAction::NextView) => {
                app_state.screen = AppScreen::Schedule;
            }
            None => {}
        }
    }

    Ok(false)
}

fn handle_schedule_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_schedule_input()? {
        Some(ScheduleAction::NextView) => {
            app_state.screen = AppScreen::Charts;
        }
        Some(ScheduleAction::Back) => {
            app_state.screen = AppScreen::Board;
        }
        Some(ScheduleAction::Quit) => {
            return Ok(true);
        }
        None => {}
    }

    Ok(false)
}

fn handle_charts_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_charts_input()? {
        Some(ChartsAction::NextView) | Some(ChartsAction::Back) => {
            app_state.screen = AppScreen::Board;
        }
        Some(ChartsAction::Quit) => {
            return Ok(true);
        }
        None => {}
    }

    Ok(false)
}

async fn handle_add_form_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.add_form_state {
        match handle_add_form_input(state)? {
            Some(AddFormAction::Cancel) => {
                let filter = current_filter(app_state);
                load_board_screen(app_state, filter, None).await?;
            }
            Some(AddFormAction::Save(record)) => {
                // Append, then pick the row up again on the reload
                table::append_project(&app_state.sheet, &record).await?;

                let notice = format!("Project '{}' added!", record.name);
                let filter = current_filter(app_state);
                load_board_screen(app_state, filter, Some(notice)).await?;
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_status_form_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.status_form_state {
        match handle_status_form_input(state)? {
            Some(StatusFormAction::Cancel) => {
                // Nothing written, the loaded board is still current
                app_state.screen = AppScreen::Board;
            }
            Some(StatusFormAction::Save { position, status }) => {
                table::update_status(&app_state.sheet, position, &status).await?;

                let notice = format!("Status updated to '{}'", status.as_str());
                let filter = current_filter(app_state);
                load_board_screen(app_state, filter, Some(notice)).await?;
            }
            None => {}
        }
    }

    Ok(false)
}
