use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use studyflow_core::{FileBackend, PersistenceStore, StorageBackend};

mod app;
mod config;
mod ui;

use app::{App, AppMode, Page};

fn main() -> Result<()> {
    init_logging()?;
    let config = config::load_config()?;
    let store = PersistenceStore::new(FileBackend::open()?);
    let app = App::new(store, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

// The terminal runs in raw mode, so diagnostics go to a log file.
fn init_logging() -> Result<()> {
    let proj_dirs = ProjectDirs::from("com", "studyflow", "studyflow")
        .context("Could not determine data directory")?;
    let dir = proj_dirs.data_dir();
    std::fs::create_dir_all(dir)?;
    let file = std::fs::File::create(dir.join("studyflow.log"))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: Backend, S: StorageBackend>(
    terminal: &mut Terminal<B>,
    mut app: App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        // Countdown ticks and completion announcements
        if let Some(done) = app.update(Instant::now())? {
            app.notify_completion(done);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.mode {
                        AppMode::Normal => match key.code {
                            KeyCode::Char('q') => return Ok(()),
                            KeyCode::Tab => app.page = app.page.next(),
                            KeyCode::Char('1') => app.page = Page::Dashboard,
                            KeyCode::Char('2') => app.page = Page::Analytics,
                            KeyCode::Char('3') => app.page = Page::Settings,
                            _ if app.page == Page::Dashboard => match key.code {
                                KeyCode::Char(' ') => app.toggle_timer(Instant::now()),
                                KeyCode::Char('r') => app.reset_timer(),
                                KeyCode::Char('a') => app.begin_add_task(),
                                KeyCode::Char('s') => app.cycle_subject(),
                                KeyCode::Char('x') => app.toggle_selected_task()?,
                                KeyCode::Char('d') => app.delete_selected_task()?,
                                KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
                                KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
                                _ => {}
                            },
                            _ => {}
                        },
                        AppMode::AddingTask => match key.code {
                            KeyCode::Esc => app.cancel_input(),
                            KeyCode::Enter => app.handle_char('\n')?,
                            KeyCode::Backspace => app.handle_backspace(),
                            KeyCode::Char(c) => app.handle_char(c)?,
                            _ => {}
                        },
                    }
                }
            }
        }
    }
}
