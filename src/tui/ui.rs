//! Layout of the chat screen

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::ChatScreen;
use super::compose;
use super::messages;

const HINTS: &str = "Enter: enviar | Esc: fechar";

pub fn render(frame: &mut Frame, screen: &ChatScreen) {
    let area = frame.area();

    let [header_area, transcript_area, compose_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(compose::COMPOSE_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(header_area, frame.buffer_mut(), screen);
    messages::render(
        transcript_area,
        frame.buffer_mut(),
        &screen.messages,
        screen.typing,
    );
    compose::render(compose_area, frame, &screen.compose, !screen.should_exit);
    render_status(status_area, frame.buffer_mut(), screen);
}

fn render_header(area: Rect, buf: &mut Buffer, screen: &ChatScreen) {
    let name = format!(" {}", screen.recipient);
    let (presence, color) = if screen.typing {
        ("Digitando... ", Color::Yellow)
    } else {
        ("Online agora ", Color::Green)
    };

    let padding = (area.width as usize).saturating_sub(name.width() + presence.width());
    let line = Line::from(vec![
        Span::styled(
            name,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(presence, Style::default().fg(color)),
    ]);

    Paragraph::new(line)
        .style(Style::default().bg(Color::Blue))
        .render(area, buf);
}

fn render_status(area: Rect, buf: &mut Buffer, screen: &ChatScreen) {
    let text = match screen.status {
        Some(ref log) => format!(" {} ", log),
        None => format!(" {} ", HINTS),
    };
    let truncated: String = text.chars().take(area.width as usize).collect();

    Paragraph::new(Line::from(Span::styled(
        truncated,
        Style::default().fg(Color::Gray),
    )))
    .style(Style::default().bg(Color::DarkGray))
    .render(area, buf);
}
