use ratatui::layout::Rect;

pub const HEADER_ROWS: u16 = 3;
pub const FOOTER_ROWS: u16 = 3;

/// Where the board lands on screen for the current terminal size
///
/// Recomputed on every resize. The logical grid never changes; only the
/// number of terminal columns per cell and the board's position do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub area: Rect,
    /// Board including its border
    pub board: Rect,
    /// Terminal columns per grid cell, 2 when there is room for square-looking cells
    pub cell_width: u16,
    /// Whether the whole board is visible
    pub fits: bool,
}

impl Viewport {
    pub fn fit(cols: u16, rows: u16, grid_size: usize) -> Self {
        let grid = u16::try_from(grid_size).unwrap_or(u16::MAX);
        let body_rows = rows.saturating_sub(HEADER_ROWS + FOOTER_ROWS);

        let cell_width = if grid.saturating_mul(2).saturating_add(2) <= cols {
            2
        } else {
            1
        };
        let board_w = grid.saturating_mul(cell_width).saturating_add(2);
        let board_h = grid.saturating_add(2);
        let fits = board_w <= cols && board_h <= body_rows;

        let board = Rect::new(
            cols.saturating_sub(board_w) / 2,
            HEADER_ROWS + body_rows.saturating_sub(board_h) / 2,
            board_w.min(cols),
            board_h.min(body_rows),
        );

        Self {
            area: Rect::new(0, 0, cols, rows),
            board,
            cell_width,
            fits,
        }
    }

    /// Smallest terminal that shows the whole board
    pub fn min_size(grid_size: usize) -> (u16, u16) {
        let grid = u16::try_from(grid_size).unwrap_or(u16::MAX);
        (
            grid.saturating_add(2),
            grid.saturating_add(2 + HEADER_ROWS + FOOTER_ROWS),
        )
    }
}
