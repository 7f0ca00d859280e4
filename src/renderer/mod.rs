//! Frame building
//!
//! Turns the engine state into an ordered list of hexagons in canvas pixels.
//! The host paints the list with whatever 2D API it has; nothing here touches
//! a graphics context.

pub mod shapes;

use crate::sim::board::Cell;
use crate::sim::state::{GamePhase, GameState};

pub use shapes::{Hexagon, css_rgba};

/// Colors for non-piece elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.06, 0.07, 0.10, 1.0];
    pub const EMPTY_CELL: [f32; 4] = [0.16, 0.18, 0.24, 1.0];
    pub const CELL_EDGE: [f32; 4] = [0.26, 0.29, 0.37, 1.0];
    pub const PREVIEW_INVALID: [f32; 4] = [0.90, 0.20, 0.20, 0.45];
    pub const PREVIEW_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const LEVEL_CLEARED_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
    pub const GAME_OVER_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
}

/// Alpha of a valid drop's ghost cells
const PREVIEW_ALPHA: f32 = 0.4;

/// One frame, painted back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub background: [f32; 4],
    pub hexagons: Vec<Hexagon>,
    /// Full-canvas wash painted last, if any
    pub overlay: Option<[f32; 4]>,
}

/// Build the frame for the current state
///
/// Order: board cells, drop preview, idle tray pieces in z-order, then the
/// dragged piece on top at full board size.
pub fn build_frame(state: &GameState) -> Frame {
    let layout = state.layout();
    let config = state.config();
    let size = layout.cell_size;

    let mut hexagons = Vec::with_capacity(state.board().cell_count() + 16);

    for (hex, cell) in state.board().cells() {
        let hexagon = match cell {
            Cell::Empty => shapes::board_cell(hex, layout.origin, size, colors::EMPTY_CELL)
                .with_stroke(colors::CELL_EDGE),
            Cell::Filled(color) => shapes::board_cell(hex, layout.origin, size, color.rgba()),
        };
        hexagons.push(hexagon);
    }

    if let Some(preview) = state.placement_preview() {
        let fill = match state.tray().slot(preview.slot) {
            Some(piece) if preview.valid => shapes::with_alpha(piece.color.rgba(), PREVIEW_ALPHA),
            _ => colors::PREVIEW_INVALID,
        };
        let stroke = (preview.lines_completed > 0).then_some(colors::PREVIEW_LINE);
        for &hex in preview.cells.iter().filter(|h| state.board().is_in_bounds(**h)) {
            let mut hexagon = shapes::board_cell(hex, layout.origin, size, fill);
            hexagon.stroke = stroke;
            hexagons.push(hexagon);
        }
    }

    let mut dragged = None;
    for (_, piece) in state.tray().pieces_in_z_order() {
        if piece.dragging {
            dragged = Some(piece);
            continue;
        }
        hexagons.extend(shapes::piece_cells(piece, piece.draw_size(size, config.tray_scale), 1.0));
    }
    if let Some(piece) = dragged {
        hexagons.extend(shapes::piece_cells(piece, size, 0.9));
    }

    let overlay = match state.phase() {
        GamePhase::Playing => None,
        GamePhase::LevelCleared { .. } => Some(colors::LEVEL_CLEARED_DIM),
        GamePhase::GameOver => Some(colors::GAME_OVER_DIM),
    };

    Frame {
        width: layout.width,
        height: layout.height,
        background: colors::BACKGROUND,
        hexagons,
        overlay,
    }
}
