//! Compose box: single-line message input.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const PLACEHOLDER: &str = "Digite sua mensagem...";

/// Text being typed and the cursor within it.
#[derive(Debug, Default)]
pub struct ComposeState {
    pub input: String,
    /// Cursor position as a character offset into `input`
    pub cursor_pos: usize,
}

impl ComposeState {
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.char_to_byte(self.cursor_pos);
        self.input.insert(byte_pos, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let prev_byte_pos = self.char_to_byte(self.cursor_pos - 1);
            self.input.drain(prev_byte_pos..byte_pos);
            self.cursor_pos -= 1;
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            let byte_pos = self.char_to_byte(self.cursor_pos);
            let next_byte_pos = self.char_to_byte(self.cursor_pos + 1);
            self.input.drain(byte_pos..next_byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.input.chars().count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Take the trimmed text and empty the box. Whitespace-only input is
    /// left in place and yields None.
    pub fn send(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.clear();
        Some(text)
    }

    fn char_to_byte(&self, char_pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }
}

/// Border + input line + border
pub const COMPOSE_HEIGHT: u16 = 3;

pub fn render(area: Rect, frame: &mut Frame, state: &ComposeState, enabled: bool) {
    let border_style = if enabled {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    let (visible, cursor_col) =
        visible_window(&state.input, state.cursor_pos, inner.width as usize);
    render_input(input_area, frame.buffer_mut(), state, &visible);

    if enabled {
        frame.set_cursor_position((input_area.x + 1 + cursor_col as u16, input_area.y));
    }
}

fn render_input(area: Rect, buf: &mut Buffer, state: &ComposeState, visible: &str) {
    let line = if state.input.is_empty() {
        Line::from(Span::styled(
            format!(" {}", PLACEHOLDER),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {}", visible),
            Style::default().fg(Color::White),
        ))
    };
    Paragraph::new(line).render(area, buf);
}

/// The slice of `input` that fits in `width` columns (one column reserved
/// for the left margin) and the cursor column within it. Scrolls
/// horizontally so the cursor stays visible.
fn visible_window(input: &str, cursor_pos: usize, width: usize) -> (String, usize) {
    let avail = width.saturating_sub(2);
    if avail == 0 {
        return (String::new(), 0);
    }

    let chars: Vec<char> = input.chars().collect();
    let col = |range: &[char]| -> usize { range.iter().map(|c| c.width().unwrap_or(0)).sum() };

    let mut start = 0;
    while start < cursor_pos && col(&chars[start..cursor_pos.min(chars.len())]) >= avail {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = c.width().unwrap_or(0);
        if used + w > avail {
            break;
        }
        visible.push(*c);
        used += w;
    }

    let cursor_col = col(&chars[start..cursor_pos.min(chars.len())]);
    (visible, cursor_col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> ComposeState {
        let mut state = ComposeState::default();
        for c in text.chars() {
            state.insert_char(c);
        }
        state
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut state = typed("Olá");
        assert_eq!(state.cursor_pos, 3);

        state.backspace();
        assert_eq!(state.input, "Ol");

        state.move_home();
        state.delete();
        assert_eq!(state.input, "l");

        state.move_end();
        state.insert_char('é');
        assert_eq!(state.input, "lé");
    }

    #[test]
    fn test_send_trims_and_clears() {
        let mut state = typed("  Bom dia  ");
        assert_eq!(state.send().as_deref(), Some("Bom dia"));
        assert!(state.input.is_empty());
        assert_eq!(state.cursor_pos, 0);
    }

    #[test]
    fn test_send_blank_keeps_input() {
        let mut state = typed("   ");
        assert_eq!(state.send(), None);
        assert_eq!(state.input, "   ");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut state = typed("ab");
        state.move_right();
        assert_eq!(state.cursor_pos, 2);
        state.move_home();
        state.move_left();
        assert_eq!(state.cursor_pos, 0);
        state.backspace();
        assert_eq!(state.input, "ab");
    }

    #[test]
    fn test_visible_window_scrolls_to_cursor() {
        let (visible, col) = visible_window("abcdef", 6, 6);
        assert_eq!(col, 3);
        assert_eq!(visible, "def");

        let (visible, col) = visible_window("abcdef", 0, 6);
        assert_eq!(col, 0);
        assert_eq!(visible, "abcd");
    }
}
