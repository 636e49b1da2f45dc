use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::viewport::{Viewport, FOOTER_ROWS, HEADER_ROWS};
use crate::game::state::extent;
use crate::game::{Direction, Position, Snapshot};

const BACKGROUND: Color = Color::Rgb(0x3D, 0x6B, 0x2E);
const SNAKE: Color = Color::Rgb(0x5C, 0xBF, 0x45);
const SNAKE_HEAD: Color = Color::Rgb(0x7E, 0xE8, 0x68);
const FOOD: Color = Color::Rgb(0xFF, 0xE1, 0x35);
const OVERLAY: Color = Color::Rgb(0x29, 0x52, 0xE3);
const OVERLAY_TEXT: Color = FOOD;

const MOUTH_PERIOD_MS: u64 = 200;
const FOOD_PULSE_MS: u64 = 400;

/// Head glyph facing `direction`, mouth open or closed
fn head_glyph(direction: Direction, mouth_open: bool) -> char {
    match (direction, mouth_open) {
        (Direction::Up, true) => '▲',
        (Direction::Down, true) => '▼',
        (Direction::Left, true) => '◀',
        (Direction::Right, true) => '▶',
        (Direction::Up, false) => '▴',
        (Direction::Down, false) => '▾',
        (Direction::Left, false) => '◂',
        (Direction::Right, false) => '▸',
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame; `anim_ms` only drives the mouth and food animations
    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, viewport: &Viewport, anim_ms: u64) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(HEADER_ROWS),
                Constraint::Min(0),
                Constraint::Length(FOOTER_ROWS),
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        if viewport.fits {
            frame.render_widget(self.render_grid(snapshot, viewport, anim_ms), viewport.board);
            if snapshot.game_over {
                let overlay = overlay_rect(viewport.board);
                frame.render_widget(Clear, overlay);
                frame.render_widget(self.render_game_over(snapshot), overlay);
            }
        } else {
            frame.render_widget(self.render_too_small(snapshot.grid_size), chunks[1]);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, viewport: &Viewport, anim_ms: u64) -> Paragraph<'_> {
        let mouth_open = (anim_ms / MOUTH_PERIOD_MS) % 2 == 0;
        let food_big = (anim_ms / FOOD_PULSE_MS) % 2 == 0;
        let pad = " ".repeat(usize::from(viewport.cell_width.saturating_sub(1)));
        let head = snapshot.snake.head();

        let mut lines = Vec::with_capacity(snapshot.grid_size);

        let size = extent(snapshot.grid_size);

        for y in 0..size {
            let mut spans = Vec::with_capacity(snapshot.grid_size);

            for x in 0..size {
                let pos = Position::new(x, y);
                let base = Style::default().bg(BACKGROUND);

                let (glyph, style) = if pos == head {
                    (
                        head_glyph(snapshot.direction, mouth_open),
                        base.fg(SNAKE_HEAD).add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake.contains(pos) {
                    ('█', base.fg(SNAKE))
                } else if pos == snapshot.food {
                    (if food_big { '●' } else { '•' }, base.fg(FOOD))
                } else {
                    (' ', base)
                };

                spans.push(Span::styled(format!("{glyph}{pad}"), style));
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(snapshot.score.to_string(), value),
                Span::raw("    "),
                Span::styled("High Score: ", label),
                Span::styled(snapshot.high_score.to_string(), value),
                Span::raw("    "),
                Span::styled("Level: ", label),
                Span::styled(snapshot.level.to_string(), value),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let text_style = Style::default().fg(OVERLAY_TEXT).bg(OVERLAY);
        let bold = text_style.add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(Span::styled("GAME OVER", bold)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", text_style),
                Span::styled(snapshot.score.to_string(), bold),
            ]),
        ];
        if snapshot.new_high_score {
            text.push(Line::from(Span::styled("New high score!", bold)));
        }
        text.push(Line::from(""));
        text.push(Line::from(Span::styled("SPACE / R to play again", text_style)));

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(text_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(text_style),
            )
    }

    fn render_too_small(&self, grid_size: usize) -> Paragraph<'_> {
        let (cols, rows) = Viewport::min_size(grid_size);
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("need at least {cols}x{rows}")),
        ])
        .alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("SPACE/R", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Centred box inside the board for the game-over message
fn overlay_rect(board: Rect) -> Rect {
    let width = board.width.saturating_sub(2).min(30);
    let height = board.height.saturating_sub(2).min(8);
    Rect::new(
        board.x + (board.width - width) / 2,
        board.y + (board.height - height) / 2,
        width,
        height,
    )
}
