use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::application::ChatSession;
use crate::tui::event::{Event, EventHandler};
use crate::tui::ui;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Newline,
    Insert(char),
    Backspace,
    ScrollUp,
    ScrollDown,
    DismissError,
    None,
}

/// Map a key press to an [`Action`].
///
/// Enter without modifiers submits; Shift+Enter or Alt+Enter inserts a
/// newline. Editing keys are ignored while an answer is pending.
pub fn key_action(key: KeyEvent, awaiting_response: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Action::Quit,
        KeyCode::Up | KeyCode::PageUp => Action::ScrollUp,
        KeyCode::Down | KeyCode::PageDown => Action::ScrollDown,
        _ if awaiting_response => Action::None,
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            Action::Newline
        }
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char('l') if ctrl => Action::DismissError,
        KeyCode::Char(_) if ctrl => Action::None,
        KeyCode::Char(c) => Action::Insert(c),
        _ => Action::None,
    }
}

/// Terminal application state.
pub struct App {
    pub(crate) session: ChatSession,
    /// Rows scrolled back from the bottom of the conversation, clamped to the
    /// top on every render.
    pub(crate) scroll_back: u16,
    /// Advances every tick while an answer is pending.
    pub(crate) spinner: usize,
    running: bool,
    events: EventHandler,
}

impl App {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            scroll_back: 0,
            spinner: 0,
            running: true,
            events: EventHandler::new(),
        }
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while self.running {
            terminal.draw(|frame| ui::render(&mut self, frame))?;
            match self.events.next().await? {
                Event::Tick => self.on_tick(),
                Event::Crossterm(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key)
                }
                Event::Crossterm(_) => {}
                Event::Answer(outcome) => {
                    if self.session.apply(outcome) {
                        self.scroll_back = 0;
                    }
                }
            }
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        if self.session.is_awaiting_response() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key_action(key, self.session.is_awaiting_response()) {
            Action::Quit => self.running = false,
            Action::Submit => self.submit(),
            Action::Newline => self.session.push_newline(),
            Action::Insert(c) => self.session.push_char(c),
            Action::Backspace => self.session.backspace(),
            Action::ScrollUp => self.scroll_back = self.scroll_back.saturating_add(1),
            Action::ScrollDown => self.scroll_back = self.scroll_back.saturating_sub(1),
            Action::DismissError => self.session.clear_error(),
            Action::None => {}
        }
    }

    /// Start a turn and resolve it on a background task. The outcome comes
    /// back through the event channel; if the UI is gone by then it is
    /// dropped.
    fn submit(&mut self) {
        let Some(pending) = self.session.submit_input() else {
            return;
        };
        self.scroll_back = 0;
        self.spinner = 0;

        let sender = self.events.sender();
        tokio::spawn(async move {
            let outcome = pending.resolve().await;
            if sender.send(Event::Answer(outcome)).is_err() {
                debug!("UI closed before the answer arrived; dropping it");
            }
        });
    }
}
