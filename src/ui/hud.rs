use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::{COLOR_ACCENT, COLOR_MUTED, COLOR_SNAKE_HEAD};
use crate::game::Snapshot;
use crate::input::Direction;

const SEPARATOR: &str = " │ ";

/// Values the HUD shows that are not part of the game snapshot.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub high_score: u32,
    /// The session that just ended set `high_score`.
    pub new_high_score: bool,
}

/// Renders the score row and the status row into `area` (two lines).
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot<'_>, info: &HudInfo) {
    let [score_area, status_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(score_line(
            snapshot.score,
            info.high_score,
            usize::from(score_area.width),
        ))
        .alignment(Alignment::Right),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(status_line(
            snapshot.snake.len(),
            snapshot.speed.as_millis(),
            snapshot.direction,
        ))
        .alignment(Alignment::Right)
        .style(Style::default().fg(COLOR_MUTED)),
        status_area,
    );
}

fn score_line(score: u32, high_score: u32, available_width: usize) -> Line<'static> {
    let compact = score_line_width(score, high_score, false) > available_width;
    let (score_label, high_label) = if compact { ("S", "H") } else { ("Score", "Hi") };
    let score_style = if score > 0 && score >= high_score {
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(COLOR_SNAKE_HEAD)
    };

    Line::from(vec![
        Span::raw(format!("{score_label}: ")),
        Span::styled(format!("{score:03}"), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{high_label}: ")),
        Span::styled(high_score.to_string(), Style::default().fg(COLOR_MUTED)),
    ])
}

fn score_line_width(score: u32, high_score: u32, compact: bool) -> usize {
    let (score_label, high_label) = if compact { ("S", "H") } else { ("Score", "Hi") };

    format!("{score_label}: {score:03}").chars().count()
        + SEPARATOR.chars().count()
        + format!("{high_label}: {high_score}").chars().count()
}

fn status_line(length: usize, tick_ms: u64, direction: Direction) -> Line<'static> {
    let arrow = match direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Left => "←",
        Direction::Right => "→",
    };

    Line::from(format!(
        "Length: {length}{SEPARATOR}Tick: {tick_ms}ms{SEPARATOR}{arrow}"
    ))
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{score_line, score_line_width, status_line};

    #[test]
    fn score_is_zero_padded() {
        let text: String = score_line(7, 12, 80)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(text, "Score: 007 │ Hi: 12");
    }

    #[test]
    fn narrow_hud_uses_compact_labels() {
        let full = score_line_width(7, 12, false);
        let text: String = score_line(7, 12, full - 1)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(text, "S: 007 │ H: 12");
    }

    #[test]
    fn status_line_shows_length_tick_and_heading() {
        let text: String = status_line(4, 148, Direction::Up)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();

        assert_eq!(text, "Length: 4 │ Tick: 148ms │ ↑");
    }
}
