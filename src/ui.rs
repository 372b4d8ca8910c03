use ratatui::{prelude::*, widgets::*};

/// Border style shared by every focusable panel
pub fn panel_border(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Bordered block with a title, styled for focus
pub fn panel_block(title: impl Into<Line<'static>>, is_focused: bool, is_editing: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(is_focused, is_editing))
        .title(title)
}

/// Row and column of a byte offset inside possibly multi-line text
pub fn cursor_offset(text: &str, position: usize) -> (u16, u16) {
    let position = position.min(text.len());
    let before = text.get(..position).unwrap_or(text);
    let row = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0);
    (row as u16, col as u16)
}

fn flush_plain(spans: &mut Vec<Span<'static>>, current: &mut String) {
    if current.is_empty() {
        return;
    }
    let word = std::mem::take(current);
    let trimmed = word.trim();
    let style = if matches!(trimmed, "true" | "false" | "null") {
        Style::default().fg(Color::Magenta)
    } else if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    spans.push(Span::styled(word, style));
}

/// Simple JSON syntax highlighting, one `Line` per input line
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut chars = line.char_indices();

    while let Some((start, c)) = chars.next() {
        match c {
            '"' => {
                flush_plain(&mut spans, &mut current);
                let mut end = line.len();
                let mut escaped = false;
                for (i, ch) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        end = i + 1;
                        break;
                    }
                }
                let literal = &line[start..end];
                // A string followed by a colon is an object key
                let is_key = line[end..].trim_start().starts_with(':');
                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(literal.to_string(), Style::default().fg(color)));
            }
            '{' | '}' | '[' | ']' => {
                flush_plain(&mut spans, &mut current);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
            }
            ':' | ',' => {
                flush_plain(&mut spans, &mut current);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::White)));
            }
            _ => current.push(c),
        }
    }
    flush_plain(&mut spans, &mut current);
    Line::from(spans)
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method.to_ascii_uppercase().as_str() {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        _ => Color::White,
    }
}
