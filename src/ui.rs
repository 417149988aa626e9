use ratatui::{prelude::*, widgets::*};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::Message;

const USER_COLOR: Color = Color::Rgb(0x00, 0x5C, 0xFF);
const JARVIS_COLOR: Color = Color::Rgb(0x26, 0x26, 0x26);

/// Renders a text input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Password shown as one bullet per character
pub fn mask(len: usize) -> String {
    "•".repeat(len)
}

/// Greedy word wrap on display width. Words wider than `width` are split.
/// Every line of the input yields at least one output line, blank ones included.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            for piece in split_to_width(word, width) {
                let piece_width = piece.width();
                if current_width > 0 && current_width + 1 + piece_width > width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if current_width > 0 {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(&piece);
                current_width += piece_width;
            }
        }

        lines.push(current);
    }

    lines
}

/// Break one word into pieces no wider than `width`
fn split_to_width(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Lay the conversation out as bubbles: user on the right, Jarvis on the left.
/// Bubbles take at most three quarters of the width.
pub fn message_lines(messages: &[Message], width: u16) -> Vec<Line<'static>> {
    let bubble_width = ((width as usize) * 3 / 4).saturating_sub(2).max(1);
    let mut lines = Vec::new();

    for message in messages {
        let (alignment, bg) = if message.is_from_user() {
            (Alignment::Right, USER_COLOR)
        } else {
            (Alignment::Left, JARVIS_COLOR)
        };

        lines.push(
            Line::from(Span::styled(message.sender.clone(), Style::default().fg(Color::DarkGray).italic()))
                .alignment(alignment),
        );
        for chunk in wrap_text(&message.text, bubble_width) {
            lines.push(
                Line::from(Span::styled(
                    format!(" {} ", chunk),
                    Style::default().fg(Color::White).bg(bg),
                ))
                .alignment(alignment),
            );
        }
        lines.push(Line::default());
    }

    lines
}

/// Top line offset that keeps the view `from_bottom` lines above the tail
pub fn scroll_offset(total_lines: usize, height: u16, from_bottom: u16) -> u16 {
    let max_offset = total_lines.saturating_sub(height as usize);
    let offset = max_offset.saturating_sub(from_bottom as usize);
    offset.min(u16::MAX as usize) as u16
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
