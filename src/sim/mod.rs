//! Deterministic puzzle engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (row-major by hex coordinate)
//! - No rendering or platform dependencies

pub mod board;
pub mod hex;
pub mod layout;
pub mod lines;
pub mod piece;
pub mod placement;
pub mod progression;
pub mod state;
pub mod tick;

pub use board::{Board, Cell};
pub use hex::{Axis, HexCoord, cube_round, hex_to_pixel, pixel_to_hex};
pub use layout::{Layout, Rect, tray_slot_anchors};
pub use lines::{AxisLine, LineClear, clear_lines, find_full_lines};
pub use piece::{PIECE_TEMPLATES, Piece, PieceColor, PieceGenerator, PieceTemplate, Tray};
pub use placement::{
    DragState, PlacementPreview, PlacementReport, PointerTracker, ReleaseOutcome, hit_test,
};
pub use progression::{LevelRules, LevelState};
pub use state::{GameEvent, GamePhase, GameState, HostCallbacks, ScoreSource, Snapshot};
pub use tick::tick;
