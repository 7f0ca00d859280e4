//! Engine state and host-facing events
//!
//! `GameState` owns everything: board, tray, generator, level progress and
//! layout. Every mutation goes through a named method so the engine can be
//! driven and tested without a rendering surface.

use glam::Vec2;
use serde::Serialize;

use super::board::Board;
use super::hex::HexCoord;
use super::layout::Layout;
use super::lines::AxisLine;
use super::piece::{PieceColor, PieceGenerator, Tray, relayout_tray};
use super::placement::{DragState, PlacementPreview};
use super::progression::{LevelRules, LevelState};
use crate::config::{ConfigError, EngineConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GamePhase {
    /// Accepting drags, clock running
    Playing,
    /// Target reached; clock frozen until the next level starts
    LevelCleared { delay_remaining: f32 },
    /// Time ran out
    GameOver,
}

/// Where a score gain came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreSource {
    Placement,
    LineClear,
}

/// Notifications for the host, drained after each input or tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Points awarded (one per placement, one per line-clear pass)
    Scored { points: u32, source: ScoreSource },
    PiecePlaced { piece_id: u32, cells: Vec<HexCoord> },
    /// Drop refused; the piece went back to its slot
    PlacementRejected { slot: usize },
    LinesCleared { lines: Vec<AxisLine>, cells: usize },
    /// Target reached for `level`; the next level starts after the pause
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver { level: u32, score: u64 },
}

/// Host-side receivers for engine output
pub trait HostCallbacks {
    fn on_score(&mut self, points: u32);
    fn on_game_over(&mut self);
    /// Feedback hook for refused drops (shake, buzz)
    fn on_rejected(&mut self) {}
    fn on_level_up(&mut self, _level: u32) {}
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: EngineConfig,
    pub(crate) rules: LevelRules,
    pub(crate) layout: Layout,
    pub(crate) board: Board,
    pub(crate) tray: Tray,
    pub(crate) generator: PieceGenerator,
    pub(crate) level: LevelState,
    /// Sum of every point reported to the host
    pub(crate) total_score: u64,
    pub(crate) phase: GamePhase,
    /// Host says the game is on screen and running
    pub(crate) active: bool,
    pub(crate) drag: DragState,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh engine. The config is trusted; use `try_new` to validate.
    pub fn new(config: EngineConfig, seed: u64, width: f32, height: f32) -> Self {
        let rules = config.level_rules();
        let layout = Layout::new(width, height, config.board_radius, config.board_fraction);
        let mut state = Self {
            rules,
            layout,
            board: Board::new(config.board_radius),
            tray: Tray::new(),
            generator: PieceGenerator::new(seed),
            level: LevelState::new(&rules),
            total_score: 0,
            phase: GamePhase::Playing,
            active: true,
            drag: DragState::Idle,
            events: Vec::new(),
            config,
        };
        state.refill_tray();

        log::info!(
            "Engine started: radius={}, {} cells, refill={}, seed={}",
            state.board.radius(),
            state.board.cell_count(),
            state.config.tray_refill.as_str(),
            seed
        );
        state
    }

    pub fn try_new(
        config: EngineConfig,
        seed: u64,
        width: f32,
        height: f32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed, width, height))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn level(&self) -> &LevelState {
        &self.level
    }

    pub fn level_target(&self) -> u32 {
        self.level.target(&self.rules)
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Pointer input is only honored while playing and on screen
    pub fn accepts_input(&self) -> bool {
        self.active && self.phase == GamePhase::Playing
    }

    /// Recompute layout for a new viewport. Game state is untouched; idle
    /// tray pieces follow their slots, a dragged piece stays under the pointer.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.layout = Layout::new(
            width,
            height,
            self.config.board_radius,
            self.config.board_fraction,
        );
        relayout_tray(&mut self.tray, &self.layout.tray_slot_anchors());
    }

    /// Start or stop the game loops. Stopping releases any drag back to the tray.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        if !active {
            self.cancel_drag();
        }
        self.active = active;
        log::info!("Engine {}", if active { "resumed" } else { "paused" });
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deliver pending events to host callbacks
    pub fn dispatch_events(&mut self, host: &mut impl HostCallbacks) {
        for event in self.drain_events() {
            match event {
                GameEvent::Scored { points, .. } => host.on_score(points),
                GameEvent::PlacementRejected { .. } => host.on_rejected(),
                GameEvent::LevelStarted { level } => host.on_level_up(level),
                GameEvent::GameOver { .. } => host.on_game_over(),
                _ => {}
            }
        }
    }

    pub(crate) fn refill_tray(&mut self) {
        let anchors = self.layout.tray_slot_anchors();
        self.generator
            .refill_tray(&mut self.tray, &anchors, self.config.tray_refill);
    }

    /// Report points to the host and feed the level progression
    pub(crate) fn award(&mut self, points: u32, source: ScoreSource) {
        if points == 0 {
            return;
        }
        self.events.push(GameEvent::Scored { points, source });
        self.total_score += u64::from(points);

        let reached = self.level.add_points(points, &self.rules);
        if reached && self.phase == GamePhase::Playing {
            self.events.push(GameEvent::LevelCleared {
                level: self.level.level,
            });
            self.phase = GamePhase::LevelCleared {
                delay_remaining: self.config.level_up_delay_secs,
            };
            log::info!(
                "Level {} cleared ({} pts)",
                self.level.level,
                self.level.level_score
            );
        }
    }

    /// Level up right away when the pause has elapsed (or is zero)
    pub(crate) fn finish_level_if_due(&mut self) {
        if let GamePhase::LevelCleared { delay_remaining } = self.phase {
            if delay_remaining <= 0.0 {
                self.level_up();
            }
        }
    }

    /// Next level: fresh board, fresh clock, fresh tray
    pub(crate) fn level_up(&mut self) {
        self.cancel_drag();
        self.level.advance(&self.rules);
        self.board.reset();
        self.tray.clear();
        self.refill_tray();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::LevelStarted {
            level: self.level.level,
        });
        log::info!(
            "Level {} started, target {}",
            self.level.level,
            self.level_target()
        );
    }

    pub(crate) fn end_game(&mut self) {
        self.cancel_drag();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            level: self.level.level,
            score: self.total_score,
        });
        log::info!(
            "Game over at level {} with {} pts",
            self.level.level,
            self.total_score
        );
    }

    /// Serializable view for host HUDs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level.level,
            level_score: self.level.level_score,
            level_target: self.level_target(),
            total_score: self.total_score,
            time_remaining: self.level.time_remaining,
            phase: self.phase,
            board: self
                .board
                .cells()
                .map(|(hex, cell)| (hex, cell.color()))
                .collect(),
            tray: self
                .tray
                .pieces()
                .map(|(slot, piece)| TrayPieceView {
                    slot,
                    id: piece.id,
                    template: piece.template.name,
                    color: piece.color,
                    pos: piece.pos,
                    dragging: piece.dragging,
                })
                .collect(),
            preview: self.placement_preview(),
        }
    }
}

/// A tray piece as seen by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrayPieceView {
    pub slot: usize,
    pub id: u32,
    pub template: &'static str,
    pub color: PieceColor,
    pub pos: Vec2,
    pub dragging: bool,
}

/// Read-only view of everything the host displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub level: u32,
    pub level_score: u32,
    pub level_target: u32,
    pub total_score: u64,
    pub time_remaining: f32,
    pub phase: GamePhase,
    pub board: Vec<(HexCoord, Option<PieceColor>)>,
    pub tray: Vec<TrayPieceView>,
    pub preview: Option<PlacementPreview>,
}
