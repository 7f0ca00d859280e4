//! Fixed-cadence timer tick
//!
//! The host calls `tick` from its own periodic timer (once per second by
//! default). The tick runs the level clock and the level-cleared pause; it
//! never touches the board except through a level-up.

use super::state::{GamePhase, GameState};

/// Advance the clock by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) {
    // Stopped loops don't tick
    if !state.active {
        return;
    }

    match state.phase {
        GamePhase::GameOver => {}

        // The pause after reaching a target is not charged to the clock
        GamePhase::LevelCleared { delay_remaining } => {
            let remaining = delay_remaining - dt.max(0.0);
            if remaining <= 0.0 {
                state.level_up();
            } else {
                state.phase = GamePhase::LevelCleared {
                    delay_remaining: remaining,
                };
            }
        }

        GamePhase::Playing => {
            if state.level.count_down(dt) {
                state.end_game();
            }
        }
    }
}
