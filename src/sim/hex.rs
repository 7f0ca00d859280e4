//! Axial hex coordinates and pixel transforms
//!
//! Pointy-top hexagons addressed by axial `(q, r)`. The third cube component
//! `s = -q - r` is derived on demand and never stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SQRT_3;

/// Axial hex coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl PartialOrd for HexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HexCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Row-major ordering for deterministic iteration
        (self.r, self.q).cmp(&(other.r, other.q))
    }
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived cube component (q + r + s == 0)
    #[inline]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    #[inline]
    pub const fn add(self, other: HexCoord) -> HexCoord {
        HexCoord::new(self.q + other.q, self.r + other.r)
    }

    /// Ring index around the origin: max(|q|, |r|, |s|)
    pub fn distance_from_origin(&self) -> i32 {
        self.q.abs().max(self.r.abs()).max(self.s().abs())
    }

    /// The 6 adjacent coordinates, clockwise from east
    pub fn neighbors(&self) -> [HexCoord; 6] {
        [
            HexCoord::new(self.q + 1, self.r),
            HexCoord::new(self.q, self.r + 1),
            HexCoord::new(self.q - 1, self.r + 1),
            HexCoord::new(self.q - 1, self.r),
            HexCoord::new(self.q, self.r - 1),
            HexCoord::new(self.q + 1, self.r - 1),
        ]
    }

    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.neighbors().contains(other)
    }
}

/// One of the three hex axes. A line along an axis is every cell sharing the
/// same value on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    Q,
    R,
    S,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Q, Axis::R, Axis::S];

    /// This axis' component of a coordinate
    #[inline]
    pub fn value_of(self, hex: HexCoord) -> i32 {
        match self {
            Axis::Q => hex.q,
            Axis::R => hex.r,
            Axis::S => hex.s(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Q => "q",
            Axis::R => "r",
            Axis::S => "s",
        }
    }
}

/// Center of a hex in pixel space
#[inline]
pub fn hex_to_pixel(hex: HexCoord, origin: Vec2, size: f32) -> Vec2 {
    let q = hex.q as f32;
    let r = hex.r as f32;
    Vec2::new(
        origin.x + size * (SQRT_3 * q + SQRT_3 / 2.0 * r),
        origin.y + size * (1.5 * r),
    )
}

/// Hex containing a pixel position
pub fn pixel_to_hex(pos: Vec2, origin: Vec2, size: f32) -> HexCoord {
    let local = pos - origin;
    let q = (SQRT_3 / 3.0 * local.x - local.y / 3.0) / size;
    let r = (2.0 / 3.0 * local.y) / size;
    cube_round(q, r)
}

/// Round fractional axial coordinates to the nearest hex.
///
/// All three cube components are rounded, then the one with the largest
/// rounding error is rebuilt from the other two so q + r + s stays 0.
pub fn cube_round(q: f32, r: f32) -> HexCoord {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let q_diff = (rq - q).abs();
    let r_diff = (rr - r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}

/// Corner points of a pointy-top hexagon, clockwise from the upper-right
pub fn hexagon_corners(center: Vec2, size: f32) -> [Vec2; 6] {
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f32 - 30.0).to_radians();
        center + Vec2::new(angle.cos(), angle.sin()) * size
    })
}
