//! Chat screen state and event loop

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc;

use super::compose::ComposeState;
use super::log_capture::LogBuffer;
use super::ui;
use crate::chat::{ChatEvent, ChatSession};
use crate::models::Message;

/// Redraw interval when nothing else happens, so new log lines show up
const TICK_MS: u64 = 250;

/// What the chat screen displays
pub struct ChatScreen {
    pub recipient: String,
    pub messages: Vec<Message>,
    pub typing: bool,
    pub compose: ComposeState,
    /// Latest captured log line
    pub status: Option<String>,
    pub should_exit: bool,
}

impl ChatScreen {
    pub fn new(session: &ChatSession) -> Self {
        Self {
            recipient: session.recipient().to_string(),
            messages: session.messages(),
            typing: session.is_typing(),
            compose: ComposeState::default(),
            status: None,
            should_exit: false,
        }
    }

    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::MessageAdded(msg) => self.messages.push(msg),
            ChatEvent::StatusChanged { id, status } => {
                if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
                    msg.advance(status);
                }
            }
            ChatEvent::Typing(on) => self.typing = on,
        }
    }

    /// Handle a key press. Returns text to send when Enter submits the box.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('c') if ctrl => self.should_exit = true,
            KeyCode::Char('u') if ctrl => self.compose.clear(),
            KeyCode::Enter => return self.compose.send(),
            KeyCode::Backspace => self.compose.backspace(),
            KeyCode::Delete => self.compose.delete(),
            KeyCode::Left => self.compose.move_left(),
            KeyCode::Right => self.compose.move_right(),
            KeyCode::Home => self.compose.move_home(),
            KeyCode::End => self.compose.move_end(),
            KeyCode::Char(c) if !ctrl => self.compose.insert_char(c),
            _ => {}
        }
        None
    }
}

/// Run the chat screen until the user closes it. The session is closed on
/// the way out, whatever the outcome.
pub async fn run(
    mut session: ChatSession,
    mut events: mpsc::UnboundedReceiver<ChatEvent>,
    logs: LogBuffer,
) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut session, &mut events, &logs).await;
    ratatui::restore();
    session.close();
    result
}

async fn run_app(
    terminal: &mut DefaultTerminal,
    session: &mut ChatSession,
    events: &mut mpsc::UnboundedReceiver<ChatEvent>,
    logs: &LogBuffer,
) -> Result<()> {
    let mut screen = ChatScreen::new(session);
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));

    while !screen.should_exit {
        screen.status = logs.latest();
        terminal
            .draw(|frame| ui::render(frame, &screen))
            .context("Failed to draw chat screen")?;

        tokio::select! {
            maybe = input.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(text) = screen.handle_key(key) {
                        session.send(&text);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal input"),
                None => break,
            },
            Some(event) = events.recv() => screen.apply(event),
            _ = tick.tick() => {}
        }
    }

    Ok(())
}
