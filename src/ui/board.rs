//! Board grid rendering and the coordinate-to-cell mapping.

use crate::app::App;
use crate::board::{Coord, Square};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
};

/// Terminal columns per board cell.
const CELL_WIDTH: u16 = 3;
/// Terminal rows per board cell.
const CELL_HEIGHT: u16 = 1;

/// Mapping between board coordinates and the screen cells they occupy.
///
/// Built fresh for every frame from the area the grid is drawn into. The
/// same mapping both places each cell and hit-tests mouse clicks, so a
/// click can only ever resolve to an in-range coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    origin_x: u16,
    origin_y: u16,
    size: u16,
}

impl BoardLayout {
    /// Centers a `size` by `size` grid in `area`.
    pub fn new(area: Rect, size: usize) -> Self {
        let size = size.min(u16::MAX as usize / CELL_WIDTH as usize) as u16;
        let width = size * CELL_WIDTH;
        let height = size * CELL_HEIGHT;
        Self {
            origin_x: area.x + area.width.saturating_sub(width) / 2,
            origin_y: area.y + area.height.saturating_sub(height) / 2,
            size,
        }
    }

    /// Screen rectangle of the cell at `coord`.
    pub fn cell_rect(&self, coord: Coord) -> Rect {
        Rect::new(
            self.origin_x + coord.col as u16 * CELL_WIDTH,
            self.origin_y + coord.row as u16 * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        )
    }

    /// The board coordinate under a screen position, `None` outside the grid.
    pub fn coord_at(&self, column: u16, row: u16) -> Option<Coord> {
        if column < self.origin_x || row < self.origin_y {
            return None;
        }
        let col = (column - self.origin_x) / CELL_WIDTH;
        let board_row = (row - self.origin_y) / CELL_HEIGHT;
        if col >= self.size || board_row >= self.size {
            return None;
        }
        Some(Coord::new(board_row as usize, col as usize))
    }
}

/// Renders the grid cell by cell from the latest snapshot.
///
/// Each cell's appearance is a pure function of its square value, so
/// redrawing the same snapshot is an idempotent overwrite.
pub fn render_board(f: &mut Frame, layout: &BoardLayout, app: &App) {
    let Some(snapshot) = app.snapshot() else {
        return;
    };
    let frame_area = f.area();
    for row in 0..snapshot.size() {
        for col in 0..snapshot.size() {
            let coord = Coord::new(row, col);
            let Some(square) = snapshot.square(coord) else {
                continue;
            };
            let rect = layout.cell_rect(coord);
            // Skip cells the terminal is too small to hold.
            if rect.right() > frame_area.right() || rect.bottom() > frame_area.bottom() {
                continue;
            }
            let (glyph, mut style) = cell_appearance(square);
            if app.claimed().is_some() && app.cursor() == coord {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let cell = Paragraph::new(glyph).style(style).alignment(Alignment::Center);
            f.render_widget(cell, rect);
        }
    }
}

fn cell_appearance(square: Square) -> (&'static str, Style) {
    match square {
        Square::Open => ("·", Style::default().fg(Color::DarkGray).bg(Color::Green)),
        Square::Black => (
            "●",
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Square::White => (
            "○",
            Style::default().fg(Color::White).bg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    }
}
