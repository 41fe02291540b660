use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::commentary::{GameEvent, OperatorLog};
use crate::config::{COLOR_ACCENT, COLOR_BORDER, COLOR_MUTED, COLOR_OPERATOR, OPERATOR_NAME};

/// What the chat panel needs to draw.
#[derive(Debug, Clone, Copy)]
pub struct OperatorView<'a> {
    pub log: &'a OperatorLog,
    /// At least one commentary request is still in flight.
    pub typing: bool,
}

/// Draws the operator chat, newest message at the bottom.
pub fn render_operator_panel(frame: &mut Frame<'_>, area: Rect, view: OperatorView<'_>) {
    let block = Block::bordered()
        .title(format!(" {OPERATOR_NAME} // operator "))
        .border_style(Style::default().fg(COLOR_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = chat_lines(view);
    // Keep the tail of the conversation visible; wrapped lines may still
    // push the oldest entries off the top.
    let overflow = lines.len().saturating_sub(usize::from(inner.height));
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .scroll((scroll, 0)),
        inner,
    );
}

fn chat_lines(view: OperatorView<'_>) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    if view.log.is_empty() && !view.typing {
        lines.push(Line::styled(
            "Waiting for signal...",
            Style::default().fg(COLOR_MUTED),
        ));
        return lines;
    }

    for message in view.log.iter() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", event_tag(message.event)),
                Style::default().fg(COLOR_MUTED),
            ),
            Span::styled(message.text.as_str(), Style::default().fg(COLOR_OPERATOR)),
        ]));
    }

    if view.typing {
        lines.push(Line::styled(
            format!("{OPERATOR_NAME} is typing..."),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    lines
}

fn event_tag(event: GameEvent) -> &'static str {
    match event {
        GameEvent::Start => "start",
        GameEvent::Eat => "combo",
        GameEvent::GameOver => "ko",
        GameEvent::HighScore => "record",
        GameEvent::IdleChat => "hello",
    }
}
