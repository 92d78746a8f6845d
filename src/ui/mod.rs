mod render;

pub use render::{block_rows, format_transactions, short_hash, BlockRow};

use crate::core::{NoticeLevel, PanelSnapshot, StatusNotice, SubmitRequest};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::info;

const UI_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Sender,
    Recipient,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Amount => FormField::Sender,
            FormField::Sender => FormField::Recipient,
            FormField::Recipient => FormField::Amount,
        }
    }
}

/// One set of input fields per node, keyed by endpoint position.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub amount: String,
    pub sender: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct UiState {
    pub endpoints: Vec<String>,
    pub selected_endpoint: usize,
    pub forms: Vec<FormState>,
    pub input_mode: InputMode,
    pub focus: FormField,
    pub selected_row: usize,
    pub detail: Option<String>,
    pub status: Option<StatusNotice>,
    pub should_quit: bool,
}

impl UiState {
    pub fn new(endpoints: Vec<String>) -> Self {
        let forms = vec![FormState::default(); endpoints.len()];
        Self {
            endpoints,
            selected_endpoint: 0,
            forms,
            input_mode: InputMode::Normal,
            focus: FormField::Amount,
            selected_row: 0,
            detail: None,
            status: None,
            should_quit: false,
        }
    }

    pub fn current_endpoint(&self) -> &str {
        &self.endpoints[self.selected_endpoint]
    }

    pub fn current_form(&self) -> &FormState {
        &self.forms[self.selected_endpoint]
    }

    fn current_form_mut(&mut self) -> &mut FormState {
        &mut self.forms[self.selected_endpoint]
    }

    fn focused_field_mut(&mut self) -> &mut String {
        let focus = self.focus;
        let form = self.current_form_mut();
        match focus {
            FormField::Amount => &mut form.amount,
            FormField::Sender => &mut form.sender,
            FormField::Recipient => &mut form.recipient,
        }
    }
}

pub fn run(
    endpoints: Vec<String>,
    snapshots: watch::Receiver<PanelSnapshot>,
    submits: mpsc::UnboundedSender<SubmitRequest>,
    mut notices: mpsc::UnboundedReceiver<StatusNotice>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = UiState::new(endpoints);
    let result = event_loop(&mut terminal, &mut state, snapshots, &submits, &mut notices);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut UiState,
    snapshots: watch::Receiver<PanelSnapshot>,
    submits: &mpsc::UnboundedSender<SubmitRequest>,
    notices: &mut mpsc::UnboundedReceiver<StatusNotice>,
) -> Result<()> {
    info!(event = "ui_started", nodes = state.endpoints.len());

    loop {
        let snapshot = snapshots.borrow().clone();
        while let Ok(notice) = notices.try_recv() {
            state.status = Some(notice);
        }

        let rows = render::block_rows(&snapshot);
        if !rows.is_empty() && state.selected_row >= rows.len() {
            state.selected_row = rows.len() - 1;
        }

        terminal.draw(|frame| render::draw(frame, &snapshot, &rows, state))?;

        if event::poll(UI_TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(state, &rows, key.code, submits);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(
    state: &mut UiState,
    rows: &[BlockRow],
    code: KeyCode,
    submits: &mpsc::UnboundedSender<SubmitRequest>,
) {
    if state.detail.is_some() {
        if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            state.detail = None;
        }
        return;
    }

    match state.input_mode {
        InputMode::Normal => match code {
            KeyCode::Char('q') => state.should_quit = true,
            KeyCode::Char('e') => state.input_mode = InputMode::Editing,
            KeyCode::Char('s') => submit_current(state, submits),
            KeyCode::Tab => {
                state.selected_endpoint = (state.selected_endpoint + 1) % state.endpoints.len();
            }
            KeyCode::Up => state.selected_row = state.selected_row.saturating_sub(1),
            KeyCode::Down => {
                if state.selected_row + 1 < rows.len() {
                    state.selected_row += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(row) = rows.get(state.selected_row) {
                    state.detail = Some(render::format_transactions(&row.transactions));
                }
            }
            _ => {}
        },
        InputMode::Editing => match code {
            KeyCode::Esc => state.input_mode = InputMode::Normal,
            KeyCode::Tab => state.focus = state.focus.next(),
            KeyCode::Enter => {
                state.input_mode = InputMode::Normal;
                submit_current(state, submits);
            }
            KeyCode::Backspace => {
                state.focused_field_mut().pop();
            }
            KeyCode::Char(c) => state.focused_field_mut().push(c),
            _ => {}
        },
    }
}

fn submit_current(state: &mut UiState, submits: &mpsc::UnboundedSender<SubmitRequest>) {
    let endpoint = state.current_endpoint().to_string();
    let form = state.current_form();
    let request = SubmitRequest {
        endpoint: endpoint.clone(),
        amount: form.amount.clone(),
        sender: form.sender.clone(),
        recipient: form.recipient.clone(),
    };

    state.status = Some(if submits.send(request).is_ok() {
        StatusNotice {
            level: NoticeLevel::Info,
            text: format!("submitting to {endpoint}..."),
        }
    } else {
        StatusNotice {
            level: NoticeLevel::Error,
            text: "submitter is not running".to_string(),
        }
    });
}
