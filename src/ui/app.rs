use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;

use crate::application::{cache::Tag, todo_api::{ListSnapshot, TodoApi}};
use crate::domain::{error::ApiError, remote::TodoRemote, todo::{Todo, TodoId}};

/// Top-level screen state. Starts in `Loading`; `Error` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Create,
    /// Modal edit of the captured todo; the draft holds the new title.
    Edit(Todo),
}

/// Work for the data-access layer, produced by key handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load,
    Refresh,
    Create(String),
    Update(Todo),
    Delete(TodoId),
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Command::Load => "load",
            Command::Refresh => "refresh",
            Command::Create(_) => "create",
            Command::Update(_) => "update",
            Command::Delete(_) => "delete",
        }
    }
}

/// Result of running a [`Command`]: the mutation's own result followed by the
/// list as read back through the cache.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub label: &'static str,
    pub mutation: Result<(), ApiError>,
    pub list: Result<ListSnapshot, ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    Run(Command),
}

/// Runs a command against the api and reads the list back. Only entries the
/// mutation invalidated are refetched; everything else comes from cache.
pub async fn execute<R: TodoRemote>(api: &TodoApi<R>, command: Command) -> Outcome {
    let label = command.label();
    let mutation = match command {
        Command::Load => Ok(()),
        Command::Refresh => {
            api.invalidate(&[Tag::TodoList]);
            Ok(())
        }
        Command::Create(title) => api.create(&title).await.map(drop),
        Command::Update(todo) => api.update(&todo).await.map(drop),
        Command::Delete(id) => api.hard_delete(id).await.map(drop),
    };
    let list = api.list_snapshot().await;
    Outcome { label, mutation, list }
}

pub struct App {
    pub state: ViewState,
    pub mode: Mode,
    pub items: Arc<Vec<Todo>>,
    pub selected: usize,
    pub list_state: ListState,
    pub draft: String,
    pub status: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
    /// Cache generation of the list on screen.
    pub list_generation: u64,
    pub in_flight: usize,
}

impl Default for App {
    fn default() -> Self { Self::new() }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            mode: Mode::View,
            items: Arc::new(Vec::new()),
            selected: 0,
            list_state: ListState::default(),
            draft: String::new(),
            status: None,
            synced_at: None,
            list_generation: 0,
            in_flight: 0,
        }
    }

    /// The initial fetch.
    pub fn start(&mut self) -> Command {
        self.in_flight += 1;
        Command::Load
    }

    pub fn selected_todo(&self) -> Option<&Todo> { self.items.get(self.selected) }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if self.state != ViewState::Ready {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Control::Quit,
                _ => Control::Continue,
            };
        }
        let control = match self.mode.clone() {
            Mode::View => self.view_key(key.code),
            Mode::Create => self.create_key(key.code),
            Mode::Edit(todo) => self.edit_key(key.code, todo),
        };
        if matches!(control, Control::Run(_)) { self.in_flight += 1; }
        control
    }

    fn view_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Up | KeyCode::Char('k') => { self.selected = self.selected.saturating_sub(1); }
            KeyCode::Down | KeyCode::Char('j') => { if self.selected + 1 < self.items.len() { self.selected += 1; } }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(todo) = self.selected_todo() { return Control::Run(Command::Update(todo.toggled())); }
            }
            KeyCode::Char('n') => {
                self.mode = Mode::Create;
                self.draft.clear();
                self.status = None;
            }
            KeyCode::Char('e') => {
                if let Some(todo) = self.selected_todo().cloned() {
                    self.draft = todo.title.clone();
                    self.mode = Mode::Edit(todo);
                    self.status = None;
                }
            }
            KeyCode::Char('d') => {
                if let Some(todo) = self.selected_todo() { return Control::Run(Command::Delete(todo.id)); }
            }
            KeyCode::Char('r') => return Control::Run(Command::Refresh),
            _ => {}
        }
        Control::Continue
    }

    fn create_key(&mut self, code: KeyCode) -> Control {
        match self.edit_draft(code) {
            Some(title) => {
                self.close_form();
                Control::Run(Command::Create(title))
            }
            None => Control::Continue,
        }
    }

    fn edit_key(&mut self, code: KeyCode, todo: Todo) -> Control {
        match self.edit_draft(code) {
            Some(title) => {
                self.close_form();
                Control::Run(Command::Update(todo.retitled(title)))
            }
            None => Control::Continue,
        }
    }

    /// Shared form input. Returns the trimmed title on a valid submit.
    fn edit_draft(&mut self, code: KeyCode) -> Option<String> {
        match code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => {
                let title = self.draft.trim();
                if !title.is_empty() { return Some(title.to_string()); }
                self.status = Some("Title is required".into());
            }
            KeyCode::Backspace => { self.draft.pop(); }
            KeyCode::Char(c) => self.draft.push(c),
            _ => {}
        }
        None
    }

    fn close_form(&mut self) {
        self.mode = Mode::View;
        self.draft.clear();
        self.status = None;
    }

    /// Folds a finished command into the view. Outcomes may arrive in any
    /// order: a list older than the one on screen is dropped, and a list that
    /// a mutation overtook asks for a follow-up [`Command::Load`], which the
    /// caller must run.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Command> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if matches!(self.state, ViewState::Error(_)) { return None; }
        let mut follow_up = None;
        match outcome.list {
            Ok(snapshot) if snapshot.generation < self.list_generation => {
                tracing::debug!(
                    command = outcome.label,
                    generation = snapshot.generation,
                    shown = self.list_generation,
                    "superseded list dropped"
                );
            }
            Ok(snapshot) => {
                self.items = snapshot.todos;
                self.synced_at = Some(snapshot.fetched_at);
                self.list_generation = snapshot.generation;
                self.state = ViewState::Ready;
                self.clamp_selection();
                if snapshot.stale {
                    self.in_flight += 1;
                    follow_up = Some(Command::Load);
                }
            }
            Err(e) if self.state == ViewState::Loading => {
                self.state = ViewState::Error(e.to_string());
                return None;
            }
            Err(e) => self.status = Some(format!("refresh failed: {e}")),
        }
        if let Err(e) = outcome.mutation {
            tracing::warn!(command = outcome.label, error = %e, "mutation failed");
            self.status = Some(format!("{} failed: {e}", outcome.label));
        }
        follow_up
    }

    fn clamp_selection(&mut self) {
        let len = self.items.len();
        if len == 0 { self.selected = 0; } else if self.selected >= len { self.selected = len - 1; }
    }
}
