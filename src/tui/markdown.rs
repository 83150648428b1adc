//! Lightweight markdown styling for assistant answers.
//!
//! Maps the constructs models commonly emit (headings, lists, quotes, fenced
//! code, `**bold**`, `*italic*` and `` `code` ``) onto ratatui styles. Anything
//! else is shown verbatim.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const FENCE: &str = "```";
const BULLET: &str = "  • ";
const QUOTE_BAR: &str = "│ ";
const CODE_INDENT: &str = "  ";

fn code_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Render `text` into styled lines.
pub fn to_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for raw in text.lines() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with(FENCE) {
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            lines.push(Line::from(vec![
                Span::raw(CODE_INDENT),
                Span::styled(raw.to_string(), code_style()),
            ]));
            continue;
        }

        if let Some((level, heading)) = heading(trimmed) {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            lines.push(Line::from(inline_spans(heading, style)));
            continue;
        }

        if let Some(item) = bullet(trimmed) {
            let mut spans = vec![Span::raw(BULLET)];
            spans.extend(inline_spans(item, Style::default()));
            lines.push(Line::from(spans));
            continue;
        }

        if let Some(quoted) = trimmed.strip_prefix('>') {
            let style = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC);
            let mut spans = vec![Span::styled(QUOTE_BAR, style)];
            spans.extend(inline_spans(quoted.trim_start(), style));
            lines.push(Line::from(spans));
            continue;
        }

        lines.push(Line::from(inline_spans(raw, Style::default())));
    }

    lines
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|rest| (level, rest.trim()))
}

fn bullet(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
}

/// Split one line into spans, toggling bold, italic and code on their
/// markers. Markers inside inline code are literal.
fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut code = false;

    let style_for = |bold: bool, italic: bool, code: bool| {
        if code {
            return code_style();
        }
        let mut style = base;
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    };

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };

        let toggle = if c == '`' {
            Some(Marker::Code)
        } else if code {
            None
        } else if c == '*' && next == Some('*') {
            Some(Marker::Bold)
        } else if c == '*' && !italic && next.is_some_and(|n| !n.is_whitespace()) {
            Some(Marker::Italic)
        } else if c == '*' && italic && prev.is_some_and(|p| !p.is_whitespace()) {
            Some(Marker::Italic)
        } else {
            None
        };

        match toggle {
            Some(marker) => {
                if !current.is_empty() {
                    spans.push(Span::styled(
                        std::mem::take(&mut current),
                        style_for(bold, italic, code),
                    ));
                }
                match marker {
                    Marker::Code => code = !code,
                    Marker::Bold => {
                        bold = !bold;
                        i += 1;
                    }
                    Marker::Italic => italic = !italic,
                }
            }
            None => current.push(c),
        }
        i += 1;
    }

    if !current.is_empty() {
        spans.push(Span::styled(current, style_for(bold, italic, code)));
    }
    spans
}

enum Marker {
    Bold,
    Italic,
    Code,
}
