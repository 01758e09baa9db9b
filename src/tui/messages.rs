//! Transcript pane: chat bubbles with time and delivery ticks.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::{DeliveryStatus, Message, Sender};

/// Render the transcript, pinned to the newest message.
pub fn render(area: Rect, buf: &mut Buffer, messages: &[Message], typing: bool) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let lines = build_lines(messages, typing, area.width as usize);
    let height = area.height as usize;
    let start = lines.len().saturating_sub(height);

    for (row, line) in lines.into_iter().skip(start).enumerate() {
        let line_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
        Paragraph::new(line).render(line_area, buf);
    }
}

fn build_lines(messages: &[Message], typing: bool, width: usize) -> Vec<Line<'static>> {
    // bubbles take at most 85% of the width
    let bubble_width = (width * 85 / 100).max(10);
    let mut lines = Vec::new();

    for msg in messages {
        let mine = msg.sender == Sender::Me;
        let text_style = if mine {
            Style::default().fg(Color::White).bg(Color::Blue)
        } else {
            Style::default().fg(Color::Black).bg(Color::Gray)
        };

        for chunk in wrap_text(&msg.text, bubble_width.saturating_sub(2)) {
            let bubble = format!(" {} ", chunk);
            lines.push(aligned(vec![Span::styled(bubble, text_style)], mine, width));
        }

        let time = msg.timestamp.with_timezone(&Local).format("%H:%M").to_string();
        let mut meta = vec![Span::styled(time, Style::default().fg(Color::DarkGray))];
        if mine {
            meta.push(Span::raw(" "));
            meta.push(ticks(msg.status));
        }
        lines.push(aligned(meta, mine, width));
        lines.push(Line::from(""));
    }

    if typing {
        lines.push(Line::from(Span::styled(
            " Digitando...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn ticks(status: DeliveryStatus) -> Span<'static> {
    let style = match status {
        DeliveryStatus::Read => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::DarkGray),
    };
    Span::styled(status.ticks(), style)
}

/// Right-align own messages, left-align the other party's.
fn aligned(mut spans: Vec<Span<'static>>, right: bool, width: usize) -> Line<'static> {
    if right {
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        spans.insert(0, Span::raw(" ".repeat(width.saturating_sub(used + 1))));
    } else {
        spans.insert(0, Span::raw(" "));
    }
    Line::from(spans)
}

/// Word-wrap by display width. Words longer than a line are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }

    let mut result = Vec::new();
    for line in text.lines() {
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };
            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            for c in word.chars() {
                if current.width() + c.width().unwrap_or(0) > max_width {
                    result.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
        }
        result.push(current);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Olá tudo bem", 8), vec!["Olá tudo", "bem"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("", 4).is_empty());
    }

    #[test]
    fn test_own_message_right_aligned_with_ticks() {
        let msg = Message::text("9", "Oi", Sender::Me, DeliveryStatus::Sent);
        let lines = build_lines(&[msg], false, 40);

        assert_eq!(lines.len(), 3);
        let bubble = text_of(&lines[0]);
        assert_eq!(bubble.width(), 39);
        assert!(bubble.ends_with(" Oi "));
        assert!(text_of(&lines[1]).ends_with(" ✓"));
    }

    #[test]
    fn test_other_party_has_no_ticks() {
        let msg = Message::text("9", "Olá", Sender::Them, DeliveryStatus::Read);
        let lines = build_lines(&[msg], false, 40);

        assert!(text_of(&lines[0]).starts_with("  Olá"));
        assert!(!text_of(&lines[1]).contains('✓'));
    }

    #[test]
    fn test_read_ticks_highlighted() {
        let msg = Message::text("9", "Oi", Sender::Me, DeliveryStatus::Read);
        let lines = build_lines(&[msg], false, 40);
        let last = lines[1].spans.last().unwrap();
        assert_eq!(last.content, "✓✓");
        assert_eq!(last.style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_typing_indicator_is_last_line() {
        let lines = build_lines(&[], true, 40);
        assert_eq!(text_of(lines.last().unwrap()), " Digitando...");
    }

    #[test]
    fn test_render_shows_newest_lines() {
        let messages: Vec<Message> = (0..20)
            .map(|i| {
                Message::text(
                    i.to_string(),
                    format!("msg {}", i),
                    Sender::Them,
                    DeliveryStatus::Read,
                )
            })
            .collect();
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        render(area, &mut buf, &messages, false);

        let rows: Vec<String> = (0..6)
            .map(|y| (0..30).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect();
        assert!(rows.iter().any(|r| r.contains("msg 19")));
        assert!(!rows.iter().any(|r| r.contains("msg 0 ")));
    }
}
