//! Hex Fit - A hexagonal block-placement puzzle
//!
//! Core modules:
//! - `sim`: Deterministic puzzle engine (board, pieces, placement, line clears, levels)
//! - `renderer`: Draw-list builder that only reads engine state
//! - `config`: Engine configuration passed in by the host

pub mod config;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, EngineConfig, TrayRefill};

/// Game configuration constants
pub mod consts {
    /// Number of concurrent tray slots
    pub const TRAY_SLOTS: usize = 3;
    /// Largest piece in the catalog (cells)
    pub const MAX_PIECE_CELLS: usize = 4;

    /// √3, used by the pointy-top hex layout
    pub const SQRT_3: f32 = 1.732_050_8;

    /// Timer cadence expected from the host (seconds per tick)
    pub const TIMER_TICK_SECS: f32 = 1.0;
}
