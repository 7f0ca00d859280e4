//! Screen layout derived from the viewport
//!
//! Layout never feeds back into game state: resizing only moves the board
//! origin, the cell size and the tray slot anchors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{SQRT_3, TRAY_SLOTS};

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.y >= self.pos.y
            && p.x <= self.pos.x + self.size.x
            && p.y <= self.pos.y + self.size.y
    }
}

/// Board and tray placement for one viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// Tray below the board when portrait, to its right otherwise
    pub portrait: bool,
    pub board_rect: Rect,
    pub tray_rect: Rect,
    /// Pixel center of hex (0, 0)
    pub origin: Vec2,
    /// Hex size (center to corner)
    pub cell_size: f32,
}

/// Fraction of the board area the hexagon may fill
const BOARD_MARGIN: f32 = 0.94;

impl Layout {
    pub fn new(width: f32, height: f32, radius: i32, board_fraction: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let portrait = height >= width;
        let fraction = board_fraction.clamp(0.1, 0.9);

        let (board_rect, tray_rect) = if portrait {
            let board_h = height * fraction;
            (
                Rect::new(0.0, 0.0, width, board_h),
                Rect::new(0.0, board_h, width, height - board_h),
            )
        } else {
            let board_w = width * fraction;
            (
                Rect::new(0.0, 0.0, board_w, height),
                Rect::new(board_w, 0.0, width - board_w, height),
            )
        };

        // A radius-N pointy-top hexagon spans √3·size·(2N+1) wide and size·(3N+2) tall
        let n = radius.max(0) as f32;
        let fit_w = board_rect.size.x / (SQRT_3 * (2.0 * n + 1.0));
        let fit_h = board_rect.size.y / (3.0 * n + 2.0);
        let cell_size = fit_w.min(fit_h) * BOARD_MARGIN;

        Self {
            width,
            height,
            portrait,
            board_rect,
            tray_rect,
            origin: board_rect.center(),
            cell_size,
        }
    }

    pub fn tray_slot_anchors(&self) -> [Vec2; TRAY_SLOTS] {
        tray_slot_anchors(self.tray_rect, self.portrait)
    }
}

/// Evenly spaced slot anchors along the tray's long axis
pub fn tray_slot_anchors(tray: Rect, portrait: bool) -> [Vec2; TRAY_SLOTS] {
    let center = tray.center();
    std::array::from_fn(|i| {
        let t = (i as f32 + 0.5) / TRAY_SLOTS as f32;
        if portrait {
            Vec2::new(tray.pos.x + tray.size.x * t, center.y)
        } else {
            Vec2::new(center.x, tray.pos.y + tray.size.y * t)
        }
    })
}
