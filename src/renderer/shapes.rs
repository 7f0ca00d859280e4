//! Shape generation for hexagonal primitives

use glam::Vec2;

use crate::sim::hex::{HexCoord, hex_to_pixel, hexagon_corners};
use crate::sim::piece::Piece;

/// Inset applied to every hexagon so neighbouring cells show a gap
pub const CELL_INSET: f32 = 0.92;

/// A filled (and optionally outlined) hexagon in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hexagon {
    pub center: Vec2,
    pub corners: [Vec2; 6],
    pub fill: [f32; 4],
    pub stroke: Option<[f32; 4]>,
}

impl Hexagon {
    pub fn new(center: Vec2, size: f32, fill: [f32; 4]) -> Self {
        Self {
            center,
            corners: hexagon_corners(center, size * CELL_INSET),
            fill,
            stroke: None,
        }
    }

    pub fn with_stroke(mut self, stroke: [f32; 4]) -> Self {
        self.stroke = Some(stroke);
        self
    }
}

/// Hexagon for a board cell
pub fn board_cell(hex: HexCoord, origin: Vec2, size: f32, fill: [f32; 4]) -> Hexagon {
    Hexagon::new(hex_to_pixel(hex, origin, size), size, fill)
}

/// One hexagon per piece cell at the piece's current position
pub fn piece_cells(piece: &Piece, size: f32, alpha: f32) -> Vec<Hexagon> {
    let [r, g, b, a] = piece.color.rgba();
    let fill = [r, g, b, a * alpha];
    piece
        .cell_centers(size)
        .into_iter()
        .map(|center| Hexagon::new(center, size, fill))
        .collect()
}

/// Scale a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// CSS `rgba()` string for a color
pub fn css_rgba(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}
