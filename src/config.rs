//! Engine configuration
//!
//! Passed to the engine at construction. Hosts may build it in code or load it
//! from JSON; missing fields fall back to defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::progression::LevelRules;

/// When the generator refills the tray after a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrayRefill {
    /// Every empty slot gets a fresh piece right away
    #[default]
    EachSlot,
    /// A fresh set of three only once all slots are empty
    WhenEmpty,
}

impl TrayRefill {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrayRefill::EachSlot => "EachSlot",
            TrayRefill::WhenEmpty => "WhenEmpty",
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board radius in cells (fixed for the engine lifetime)
    pub board_radius: i32,
    /// Seconds on the clock at the start of each level
    pub time_budget_secs: f32,
    /// Level 1 score target
    pub target_base: u32,
    /// Target increase per level
    pub target_step: u32,
    /// Pause between reaching a target and the next level starting
    pub level_up_delay_secs: f32,

    // === Input ===
    /// How far above the pointer a dragged piece floats (in cells)
    pub drag_lift_cells: f32,
    /// Hit radius around a tray piece's centroid (in cells)
    pub hit_radius_cells: f32,
    /// Hit radius around each individual cell of a tray piece (in cells)
    pub cell_hit_radius_cells: f32,

    // === Layout ===
    /// Idle tray pieces are drawn at this fraction of the board cell size
    pub tray_scale: f32,
    /// Share of the viewport's long axis given to the board
    pub board_fraction: f32,

    pub tray_refill: TrayRefill,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_radius: 4,
            time_budget_secs: 180.0,
            target_base: 50,
            target_step: 20,
            level_up_delay_secs: 1.0,

            drag_lift_cells: 1.5,
            hit_radius_cells: 3.5,
            cell_hit_radius_cells: 1.5,

            tray_scale: 0.6,
            board_fraction: 0.72,

            tray_refill: TrayRefill::EachSlot,
        }
    }
}

/// Rejected configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON could not be parsed
    Parse(String),
    /// Board radius outside 1..=MAX_BOARD_RADIUS
    InvalidRadius(i32),
    /// Time budget must be positive and finite
    InvalidTimeBudget(f32),
    /// Targets must start above zero and grow every level
    InvalidTarget { base: u32, step: u32 },
    /// A distance or ratio field is out of range
    InvalidRatio { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
            ConfigError::InvalidRadius(r) => {
                write!(f, "board radius {r} outside 1..={}", EngineConfig::MAX_BOARD_RADIUS)
            }
            ConfigError::InvalidTimeBudget(t) => write!(f, "time budget {t} must be > 0"),
            ConfigError::InvalidTarget { base, step } => {
                write!(f, "level targets need base >= 1 and step >= 1 (got {base}, {step})")
            }
            ConfigError::InvalidRatio { field, value } => {
                write!(f, "{field} = {value} is out of range")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl EngineConfig {
    pub const MAX_BOARD_RADIUS: i32 = 12;

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_BOARD_RADIUS).contains(&self.board_radius) {
            return Err(ConfigError::InvalidRadius(self.board_radius));
        }
        if !(self.time_budget_secs.is_finite() && self.time_budget_secs > 0.0) {
            return Err(ConfigError::InvalidTimeBudget(self.time_budget_secs));
        }
        if self.target_base == 0 || self.target_step == 0 {
            return Err(ConfigError::InvalidTarget {
                base: self.target_base,
                step: self.target_step,
            });
        }
        check_range("level_up_delay_secs", self.level_up_delay_secs, 0.0, 60.0)?;
        check_range("drag_lift_cells", self.drag_lift_cells, 0.0, 10.0)?;
        check_range("hit_radius_cells", self.hit_radius_cells, 0.0, 20.0)?;
        check_range("cell_hit_radius_cells", self.cell_hit_radius_cells, 0.0, 20.0)?;
        check_range("tray_scale", self.tray_scale, 0.1, 1.0)?;
        check_range("board_fraction", self.board_fraction, 0.1, 0.9)?;
        Ok(())
    }

    pub fn level_rules(&self) -> LevelRules {
        LevelRules {
            base: self.target_base,
            step: self.target_step,
            time_budget: self.time_budget_secs,
        }
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRatio { field, value })
    }
}
