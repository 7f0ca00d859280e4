//! Level targets, level score and the countdown timer

use serde::{Deserialize, Serialize};

/// Score-target formula and timer budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRules {
    /// Target for level 1
    pub base: u32,
    /// Target increase per level (>= 1 keeps targets strictly increasing)
    pub step: u32,
    /// Seconds on the clock at the start of every level
    pub time_budget: f32,
}

impl LevelRules {
    /// target(L) = base + (L - 1) * step
    pub fn target(&self, level: u32) -> u32 {
        self.base
            .saturating_add(level.saturating_sub(1).saturating_mul(self.step))
    }
}

/// Per-level progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// Current level, starting at 1
    pub level: u32,
    /// Points earned in this level, never above the level target
    pub level_score: u32,
    /// Seconds left on the clock
    pub time_remaining: f32,
}

impl LevelState {
    pub fn new(rules: &LevelRules) -> Self {
        Self {
            level: 1,
            level_score: 0,
            time_remaining: rules.time_budget,
        }
    }

    pub fn target(&self, rules: &LevelRules) -> u32 {
        rules.target(self.level)
    }

    pub fn target_reached(&self, rules: &LevelRules) -> bool {
        self.level_score >= self.target(rules)
    }

    /// Add points, clamping at the target. Excess is discarded so a single
    /// large clear can never skip a level. Returns true when the target is
    /// reached.
    pub fn add_points(&mut self, gained: u32, rules: &LevelRules) -> bool {
        let target = self.target(rules);
        self.level_score = self.level_score.saturating_add(gained).min(target);
        self.target_reached(rules)
    }

    /// Move to the next level with a fresh clock
    pub fn advance(&mut self, rules: &LevelRules) {
        self.level += 1;
        self.level_score = 0;
        self.time_remaining = rules.time_budget;
    }

    /// Run the clock down. Returns true when time has run out.
    pub fn count_down(&mut self, dt: f32) -> bool {
        self.time_remaining = (self.time_remaining - dt.max(0.0)).max(0.0);
        self.time_remaining <= 0.0
    }

    /// Fraction of the level target achieved (0-1)
    pub fn progress(&self, rules: &LevelRules) -> f32 {
        let target = self.target(rules);
        if target == 0 {
            1.0
        } else {
            self.level_score as f32 / target as f32
        }
    }
}
