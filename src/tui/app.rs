//! TUI Application - main event loop and terminal management
//!
//! This module contains the core TUI application logic including:
//! - Terminal setup and restoration
//! - The live subscription to the task collection
//! - Keyboard handling for the board and the task form

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use super::connection::SyncStatus;
use super::notifications::NotificationManager;
use super::views::{BoardView, render_form};
use crate::board::Board;
use crate::editor::{Editor, FormField, SubmitOutcome};
use crate::models::Team;
use crate::sync::{StoreAdapter, SyncEvent};

/// Input poll interval
const TICK: Duration = Duration::from_millis(100);

/// Progress step for ←/→ in the form
const PROGRESS_STEP: i16 = 5;

/// Progress step for Shift+←/→
const PROGRESS_FINE_STEP: i16 = 1;

/// TUI Application state
pub struct App {
    adapter: StoreAdapter,
    team: Team,
    board: Board,
    view: BoardView,
    editor: Editor,
    notifications: NotificationManager,
    status: SyncStatus,
    should_quit: bool,
}

impl App {
    pub fn new(adapter: StoreAdapter, team: Team) -> Self {
        Self {
            adapter,
            team,
            board: Board::new(),
            view: BoardView::new(),
            editor: Editor::new(),
            notifications: NotificationManager::new(),
            status: SyncStatus::Loading,
            should_quit: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply an event from the subscription.
    pub fn handle_sync_event(&mut self, event: SyncEvent) {
        self.status = self.status.after(&event);
        match event {
            SyncEvent::Snapshot(tasks) => {
                self.board.apply_snapshot(tasks);
                self.view.clamp(self.board.visible_tasks().len());
            }
            SyncEvent::Failed(detail) => self.board.subscription_failed(detail),
        }
    }

    /// Handle a key press.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.editor.is_open() {
            self.handle_form_key(key).await;
        } else {
            self.handle_board_key(key.code);
        }
    }

    fn handle_board_key(&mut self, key: KeyCode) {
        let len = self.board.visible_tasks().len();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') => self.editor.open_create(),
            KeyCode::Enter => {
                let visible = self.board.visible_tasks();
                if let Some(task) = self.view.selected_task(&visible) {
                    self.editor.open_edit(task);
                }
            }
            KeyCode::Char('l') | KeyCode::Right => self.view.select_next(len),
            KeyCode::Char('h') | KeyCode::Left => self.view.select_previous(),
            KeyCode::Char('j') | KeyCode::Down => self.view.select_down(len),
            KeyCode::Char('k') | KeyCode::Up => self.view.select_up(),
            KeyCode::Char('s') => {
                self.board.cycle_status_filter();
                self.view.select_first();
            }
            KeyCode::Char('a') => {
                self.board.cycle_responsible_filter(&self.team);
                self.view.select_first();
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        let options = self.team.responsible_options();
        let Some(form) = self.editor.form_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.editor.cancel(),
            KeyCode::Enter => self.submit().await,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match form.focus {
                    FormField::Responsible => form.cycle_responsible(&options, forward),
                    FormField::Status => form.cycle_status(),
                    FormField::Progress => {
                        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
                            PROGRESS_FINE_STEP
                        } else {
                            PROGRESS_STEP
                        };
                        form.adjust_progress(if forward { step } else { -step });
                    }
                    _ => {}
                }
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
    }

    async fn submit(&mut self) {
        match self.editor.submit(&self.adapter).await {
            SubmitOutcome::Created(_) => self.notifications.success("Tarefa criada com sucesso!"),
            SubmitOutcome::Updated(_) => {
                self.notifications.success("Tarefa atualizada com sucesso!")
            }
            SubmitOutcome::Failed => self.notifications.error("Erro ao salvar tarefa."),
            // Shown inline in the form.
            SubmitOutcome::Invalid(_) | SubmitOutcome::NotOpen => {}
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.view
            .render(frame, area, &self.board, &self.team, &self.status);

        if let (Some(form), Some(mode)) = (self.editor.form(), self.editor.mode()) {
            render_form(frame, area, form, mode);
        }

        self.notifications.render(frame, area);
    }
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard until the user quits.
///
/// Opens one subscription to the collection for the whole session and
/// drops it on exit.
pub async fn run_dashboard(adapter: StoreAdapter, team: Team) -> crate::Result<()> {
    tracing::info!(location = %adapter.location(), "Starting dashboard");
    let mut app = App::new(adapter, team);
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut app).await;

    restore_terminal()?;
    tracing::info!("Dashboard closed");
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> crate::Result<()> {
    let mut subscription = app.adapter.subscribe();
    let mut subscription_open = true;
    let mut revisions = app.board.watch();
    let mut dirty = true;

    loop {
        if app.notifications.cleanup() {
            dirty = true;
        }
        if dirty {
            terminal.draw(|f| app.render(f))?;
            dirty = false;
        }

        tokio::select! {
            // Check for keyboard events
            _ = tokio::time::sleep(TICK) => {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            app.handle_key(key).await;
                            dirty = true;
                        }
                        Event::Resize(..) => dirty = true,
                        _ => {}
                    }
                }
            }
            // Snapshots from the store
            event = subscription.next(), if subscription_open => {
                match event {
                    Some(event) => app.handle_sync_event(event),
                    None => subscription_open = false,
                }
            }
            // Board state changed
            changed = revisions.changed() => {
                if changed.is_ok() {
                    dirty = true;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    drop(subscription);
    Ok(())
}
