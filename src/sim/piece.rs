//! Piece catalog, live pieces, the tray and the piece generator

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::hex::{HexCoord, hex_to_pixel};
use crate::config::TrayRefill;
use crate::consts::TRAY_SLOTS;

/// Color tag assigned to a piece and carried into the board cells it fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl PieceColor {
    pub const PALETTE: [PieceColor; 6] = [
        PieceColor::Red,
        PieceColor::Orange,
        PieceColor::Yellow,
        PieceColor::Green,
        PieceColor::Blue,
        PieceColor::Purple,
    ];

    /// Linear RGBA used by the renderer
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            PieceColor::Red => [0.94, 0.33, 0.31, 1.0],
            PieceColor::Orange => [1.0, 0.60, 0.20, 1.0],
            PieceColor::Yellow => [0.98, 0.84, 0.25, 1.0],
            PieceColor::Green => [0.40, 0.80, 0.42, 1.0],
            PieceColor::Blue => [0.26, 0.60, 0.96, 1.0],
            PieceColor::Purple => [0.67, 0.42, 0.90, 1.0],
        }
    }
}

/// A shape: distinct offsets from an implicit (0, 0) anchor
#[derive(Debug, PartialEq, Eq)]
pub struct PieceTemplate {
    pub name: &'static str,
    pub offsets: &'static [HexCoord],
}

const fn h(q: i32, r: i32) -> HexCoord {
    HexCoord::new(q, r)
}

/// Fixed shape catalog
pub static PIECE_TEMPLATES: &[PieceTemplate] = &[
    PieceTemplate { name: "single", offsets: &[h(0, 0)] },
    // Pairs, one per axis direction
    PieceTemplate { name: "pair-q", offsets: &[h(0, 0), h(1, 0)] },
    PieceTemplate { name: "pair-r", offsets: &[h(0, 0), h(0, 1)] },
    PieceTemplate { name: "pair-s", offsets: &[h(0, 0), h(1, -1)] },
    // Straight triples
    PieceTemplate { name: "line3-q", offsets: &[h(0, 0), h(1, 0), h(2, 0)] },
    PieceTemplate { name: "line3-r", offsets: &[h(0, 0), h(0, 1), h(0, 2)] },
    PieceTemplate { name: "line3-s", offsets: &[h(0, 0), h(1, -1), h(2, -2)] },
    // Triangles
    PieceTemplate { name: "tri-down", offsets: &[h(0, 0), h(1, 0), h(0, 1)] },
    PieceTemplate { name: "tri-up", offsets: &[h(0, 0), h(1, 0), h(1, -1)] },
    // Tetra clusters
    PieceTemplate { name: "rhombus", offsets: &[h(0, 0), h(1, 0), h(0, 1), h(1, 1)] },
    PieceTemplate { name: "diamond", offsets: &[h(0, 0), h(1, -1), h(1, 0), h(0, 1)] },
    PieceTemplate { name: "hook", offsets: &[h(0, 0), h(1, 0), h(2, 0), h(2, -1)] },
    PieceTemplate { name: "arc", offsets: &[h(0, 0), h(1, -1), h(2, -1), h(3, -2)] },
];

impl PieceTemplate {
    pub fn cell_count(&self) -> usize {
        self.offsets.len()
    }
}

/// A live piece: a template instance with color and a floating anchor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    pub id: u32,
    #[serde(serialize_with = "serialize_template_name")]
    pub template: &'static PieceTemplate,
    pub color: PieceColor,
    /// Tray-slot anchor the piece returns to when a drop is rejected
    pub home: Vec2,
    /// Current anchor position (pixel center of the (0, 0) cell)
    pub pos: Vec2,
    pub dragging: bool,
}

fn serialize_template_name<S: serde::Serializer>(
    template: &&'static PieceTemplate,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(template.name)
}

impl Piece {
    pub fn new(id: u32, template: &'static PieceTemplate, color: PieceColor, anchor: Vec2) -> Self {
        Self {
            id,
            template,
            color,
            home: anchor,
            pos: anchor,
            dragging: false,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.template.cell_count()
    }

    /// Cell size the piece is drawn at: full board size while dragging,
    /// shrunk while idle in the tray
    pub fn draw_size(&self, cell_size: f32, tray_scale: f32) -> f32 {
        if self.dragging { cell_size } else { cell_size * tray_scale }
    }

    /// Pixel centers of each cell at the given cell size
    pub fn cell_centers(&self, size: f32) -> Vec<Vec2> {
        self.template
            .offsets
            .iter()
            .map(|offset| hex_to_pixel(*offset, self.pos, size))
            .collect()
    }

    /// Centroid of the cell centers
    pub fn center(&self, size: f32) -> Vec2 {
        let centers = self.cell_centers(size);
        let sum: Vec2 = centers.iter().copied().sum();
        sum / centers.len().max(1) as f32
    }

    /// Board cells covered when the anchor sits on `anchor`
    pub fn target_cells(&self, anchor: HexCoord) -> Vec<HexCoord> {
        self.template.offsets.iter().map(|offset| anchor.add(*offset)).collect()
    }

    /// Put the piece back on its tray slot
    pub fn return_home(&mut self) {
        self.pos = self.home;
        self.dragging = false;
    }
}

/// The three-slot staging area for pieces that have not been placed yet
#[derive(Debug, Clone)]
pub struct Tray {
    slots: [Option<Piece>; TRAY_SLOTS],
    /// Draw order, last entry is top-most (most recently touched)
    z_order: [usize; TRAY_SLOTS],
}

impl Default for Tray {
    fn default() -> Self {
        Self::new()
    }
}

impl Tray {
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            z_order: std::array::from_fn(|i| i),
        }
    }

    pub fn slot(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, slot: usize) -> Option<&mut Piece> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Remove and return the piece in a slot
    pub fn take(&mut self, slot: usize) -> Option<Piece> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Place a piece in a slot, returning the previous occupant
    pub fn put(&mut self, slot: usize, piece: Piece) -> Option<Piece> {
        self.slots.get_mut(slot).and_then(|s| s.replace(piece))
    }

    /// Number of pieces currently in the tray
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Pieces in draw order (bottom to top)
    pub fn pieces_in_z_order(&self) -> impl Iterator<Item = (usize, &Piece)> + '_ {
        self.z_order
            .iter()
            .filter_map(|&slot| self.slot(slot).map(|piece| (slot, piece)))
    }

    /// Pieces in slot order
    pub fn pieces(&self) -> impl Iterator<Item = (usize, &Piece)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, piece)| piece.as_ref().map(|p| (slot, p)))
    }

    pub fn z_order(&self) -> &[usize; TRAY_SLOTS] {
        &self.z_order
    }

    /// Move a slot to the top of the draw order
    pub fn raise(&mut self, slot: usize) {
        if let Some(idx) = self.z_order.iter().position(|&s| s == slot) {
            self.z_order[idx..].rotate_left(1);
        }
    }

    /// Move a slot to the bottom of the draw order
    pub fn lower(&mut self, slot: usize) {
        if let Some(idx) = self.z_order.iter().position(|&s| s == slot) {
            self.z_order[..=idx].rotate_right(1);
        }
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

/// Deterministic random piece source
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    next_id: u32,
}

impl PieceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Uniform template and color, anchored at `anchor`
    pub fn generate(&mut self, anchor: Vec2) -> Piece {
        let template = &PIECE_TEMPLATES[self.rng.random_range(0..PIECE_TEMPLATES.len())];
        let color = PieceColor::PALETTE[self.rng.random_range(0..PieceColor::PALETTE.len())];
        let id = self.next_id;
        self.next_id += 1;
        Piece::new(id, template, color, anchor)
    }

    /// Re-anchor pieces on the given slot positions and fill empty slots.
    ///
    /// Idle pieces move to their slot. A dragging piece only gets its home
    /// updated; its position stays under pointer control. Returns the number
    /// of new pieces.
    pub fn refill_tray(
        &mut self,
        tray: &mut Tray,
        anchors: &[Vec2; TRAY_SLOTS],
        policy: TrayRefill,
    ) -> usize {
        relayout_tray(tray, anchors);

        let should_fill = match policy {
            TrayRefill::EachSlot => true,
            TrayRefill::WhenEmpty => tray.is_empty(),
        };
        if !should_fill {
            return 0;
        }

        let mut filled = Vec::with_capacity(TRAY_SLOTS);
        for (slot, anchor) in anchors.iter().enumerate() {
            if tray.slot(slot).is_none() {
                let piece = self.generate(*anchor);
                tray.put(slot, piece);
                filled.push(slot);
            }
        }
        // Untouched pieces sit below every touched one, lowest slot at the bottom
        for &slot in filled.iter().rev() {
            tray.lower(slot);
        }
        if !filled.is_empty() {
            log::debug!("Tray refilled with {} piece(s)", filled.len());
        }
        filled.len()
    }
}

/// Move idle pieces to new slot anchors without touching game state
pub fn relayout_tray(tray: &mut Tray, anchors: &[Vec2; TRAY_SLOTS]) {
    for (slot, anchor) in anchors.iter().enumerate() {
        if let Some(piece) = tray.slot_mut(slot) {
            piece.home = *anchor;
            if !piece.dragging {
                piece.pos = *anchor;
            }
        }
    }
}
