use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    CELL_WIDTH, COLOR_BORDER, COLOR_FOOD, COLOR_SNAKE_BODY, COLOR_SNAKE_HEAD, COLOR_SNAKE_TAIL,
    GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, GLYPH_SNAKE_TAIL, GridSize,
};
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};
use crate::ui::operator::{OperatorView, render_operator_panel};

/// Minimum width of the operator panel.
const PANEL_MIN_WIDTH: u16 = 28;

/// Renders the full game frame from a read-only snapshot.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot<'_>,
    hud_info: HudInfo,
    operator: OperatorView<'_>,
) {
    let board_width = snapshot.bounds.width * CELL_WIDTH + 2;
    let board_height = snapshot.bounds.height + 2;

    let [board_column, panel_area] = Layout::horizontal([
        Constraint::Length(board_width),
        Constraint::Min(PANEL_MIN_WIDTH),
    ])
    .areas(frame.area());

    let [hud_area, play_area, _] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(board_height),
        Constraint::Min(0),
    ])
    .areas(board_column);

    render_hud(frame, hud_area, snapshot, &hud_info);

    let block = Block::bordered()
        .title(" NEON SNAKE ")
        .border_style(Style::new().fg(COLOR_BORDER));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.status {
        GameStatus::Idle => render_start_menu(frame, play_area, hud_info.high_score),
        GameStatus::Paused => render_pause_menu(frame, play_area),
        GameStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            hud_info.high_score,
            hud_info.new_high_score,
            snapshot.death_reason,
        ),
        GameStatus::Playing => {}
    }

    render_operator_panel(frame, panel_area, operator);
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(COLOR_FOOD));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>) {
    let snake = snapshot.snake;
    let last = snake.len().saturating_sub(1);
    let buffer = frame.buffer_mut();

    // Drawn tail first so the head wins if segments ever coincide on screen.
    for (index, segment) in snake.segments().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.bounds, *segment) else {
            continue;
        };

        let (glyph, style) = if index == 0 {
            (
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(COLOR_SNAKE_HEAD)
                    .add_modifier(Modifier::BOLD),
            )
        } else if index == last {
            (GLYPH_SNAKE_TAIL, Style::new().fg(COLOR_SNAKE_TAIL))
        } else {
            (GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY))
        };

        buffer.set_string(x, y, glyph, style);
    }
}

/// Maps a logical cell to the terminal column/row of its left half.
fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
