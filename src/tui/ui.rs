use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Message, Role};
use crate::tui::app::App;
use crate::tui::markdown;

const GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
const INPUT_PLACEHOLDER: &str = "Type your question here...";
const SPINNER: [&str; 4] = [".  ", ".. ", "...", " .."];

pub fn render(app: &mut App, frame: &mut Frame) {
    let error = app.session.last_error().map(str::to_owned);
    let input_height = (app.session.pending_input().split('\n').count() as u16 + 2).min(8);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                                  // Title
            Constraint::Min(1),                                     // Conversation
            Constraint::Length(if error.is_some() { 3 } else { 0 }), // Error banner
            Constraint::Length(input_height),                       // Input box
            Constraint::Length(1),                                  // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("AI Chatbot · Powered by Google Gemini")
        .block(Block::bordered().border_type(BorderType::Rounded))
        .fg(Color::Cyan)
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    render_conversation(app, frame, layout[1]);

    if let Some(error) = error {
        let banner = Paragraph::new(error)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .fg(Color::LightRed)
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, layout[2]);
    }

    render_input(app, frame, layout[3]);

    let help = Paragraph::new("Enter: send · Shift+Enter: newline · ↑/↓: scroll · Ctrl+L: dismiss error · Esc: quit")
        .fg(Color::DarkGray)
        .alignment(Alignment::Center);
    frame.render_widget(help, layout[4]);
}

fn render_conversation(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .title("Conversation")
        .border_type(BorderType::Rounded);
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let lines = conversation_lines(app.session.messages(), app.session.is_awaiting_response(), app.spinner);

    if lines.is_empty() {
        let greeting = Paragraph::new(GREETING)
            .block(block)
            .fg(Color::Gray)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(greeting, area);
        return;
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = rendered_rows(&paragraph, inner_width);
    let (offset, scroll_back) = scroll_offset(total, inner_height, app.scroll_back);
    app.scroll_back = scroll_back;

    frame.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let awaiting = app.session.is_awaiting_response();
    let (title, style) = if awaiting {
        ("Waiting for answer...", Style::default().fg(Color::DarkGray))
    } else {
        (INPUT_PLACEHOLDER, Style::default().fg(Color::Yellow))
    };

    let input = Paragraph::new(format!("> {}", app.session.pending_input()))
        .block(
            Block::bordered()
                .title(title)
                .border_type(BorderType::Rounded),
        )
        .style(style)
        .wrap(Wrap { trim: false });
    frame.render_widget(input, area);
}

/// Build the display lines for every message, plus the thinking indicator
/// while an answer is pending.
pub fn conversation_lines(
    messages: &[Message],
    awaiting_response: bool,
    spinner: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in messages {
        lines.push(role_header(message.role()));
        match message.role() {
            Role::User => lines.extend(
                message
                    .text()
                    .lines()
                    .map(|l| Line::from(l.to_string())),
            ),
            Role::Assistant => lines.extend(markdown::to_lines(message.text())),
        }
        lines.push(Line::default());
    }

    if awaiting_response {
        lines.push(role_header(Role::Assistant));
        lines.push(Line::from(Span::styled(
            format!("AI is thinking{}", SPINNER[spinner % SPINNER.len()]),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn role_header(role: Role) -> Line<'static> {
    let (label, color) = match role {
        Role::User => ("You", Color::Blue),
        Role::Assistant => ("Gemini", Color::Cyan),
    };
    Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

/// Rows a block-less `paragraph` occupies when wrapped to `width` columns.
fn rendered_rows(paragraph: &Paragraph<'_>, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    paragraph.line_count(width).min(u16::MAX as usize) as u16
}

/// Top row to show for a view of `height` rows anchored `scroll_back` rows
/// above the bottom, and `scroll_back` clamped to the top of the content.
fn scroll_offset(total: u16, height: u16, scroll_back: u16) -> (u16, u16) {
    let bottom = total.saturating_sub(height);
    let scroll_back = scroll_back.min(bottom);
    (bottom - scroll_back, scroll_back)
}
