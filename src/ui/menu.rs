use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::{COLOR_ACCENT, COLOR_BORDER, COLOR_MUTED};
use crate::game::DeathReason;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("NEON SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Space]/[Enter] Start"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(bordered(" system online ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD move, P pauses"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(COLOR_MUTED)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space]/[P] Resume"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(bordered(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    new_high_score: bool,
    death_reason: Option<DeathReason>,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(format!("High score: {high_score}")),
        Line::from(cause_text(death_reason)),
        Line::from(if new_high_score { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Space]/[Enter] Play Again"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(bordered(" game over ")),
        popup,
    );
}

fn cause_text(death_reason: Option<DeathReason>) -> &'static str {
    match death_reason {
        Some(DeathReason::WallCollision) => "Cause: hit wall",
        Some(DeathReason::SelfCollision) => "Cause: hit yourself",
        Some(DeathReason::BoardFull) => "Cause: board full",
        None => "",
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::bordered()
        .title(title)
        .border_style(Style::default().fg(COLOR_BORDER))
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{cause_text, centered_popup};
    use crate::game::DeathReason;

    #[test]
    fn popup_is_centered_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_popup(area, 60, 50);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.x, 20);
        assert!(popup.y >= 9 && popup.bottom() <= 31);
    }

    #[test]
    fn every_death_reason_has_a_caption() {
        assert_eq!(cause_text(Some(DeathReason::WallCollision)), "Cause: hit wall");
        assert_eq!(cause_text(Some(DeathReason::BoardFull)), "Cause: board full");
        assert_eq!(cause_text(None), "");
    }
}
