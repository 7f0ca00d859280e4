//! Drag-and-drop placement
//!
//! `Idle -> Dragging -> {Placed | Rejected} -> Idle`. Pointer events only move
//! the dragged piece; the board changes on release, and then only when every
//! target cell is in bounds and empty.

use glam::Vec2;
use serde::Serialize;

use super::hex::{HexCoord, pixel_to_hex};
use super::layout::Layout;
use super::lines::{LineClear, clear_lines, find_full_lines};
use super::piece::Tray;
use super::state::{GameEvent, GameState, ScoreSource};
use crate::config::EngineConfig;

/// Drag state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Tray slot of the piece under the pointer
    Dragging { slot: usize },
}

/// A successful placement
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementReport {
    pub piece_id: u32,
    pub anchor: HexCoord,
    pub cells: Vec<HexCoord>,
    pub placement_points: u32,
    pub cleared: LineClear,
}

impl PlacementReport {
    pub fn total_points(&self) -> u32 {
        self.placement_points + self.cleared.points()
    }
}

/// What a pointer release did
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing was being dragged
    Ignored,
    Placed(PlacementReport),
    /// Piece went back to its slot, board untouched
    Rejected { slot: usize },
}

/// Where the dragged piece would land right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementPreview {
    pub slot: usize,
    pub anchor: HexCoord,
    pub cells: Vec<HexCoord>,
    pub valid: bool,
    /// Lines the drop would complete (0 when invalid)
    pub lines_completed: usize,
}

/// Topmost tray piece under the pointer, most recently touched first.
///
/// Touch is imprecise, so a piece is hit anywhere within `hit_radius_cells`
/// of its centroid or `cell_hit_radius_cells` of any of its cells.
pub fn hit_test(tray: &Tray, pointer: Vec2, layout: &Layout, config: &EngineConfig) -> Option<usize> {
    for &slot in tray.z_order().iter().rev() {
        let Some(piece) = tray.slot(slot) else {
            continue;
        };
        let size = piece.draw_size(layout.cell_size, config.tray_scale);
        if pointer.distance(piece.center(size)) <= config.hit_radius_cells * size {
            return Some(slot);
        }
        let cell_radius = config.cell_hit_radius_cells * size;
        if piece
            .cell_centers(size)
            .iter()
            .any(|c| pointer.distance(*c) <= cell_radius)
        {
            return Some(slot);
        }
    }
    None
}

impl GameState {
    /// Vertical offset keeping a dragged piece visible above the finger
    fn drag_lift(&self) -> Vec2 {
        Vec2::new(0.0, self.config.drag_lift_cells * self.layout.cell_size)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Pick up a tray piece. Returns the slot picked up, if any.
    pub fn pointer_down(&mut self, pointer: Vec2) -> Option<usize> {
        if !self.accepts_input() || self.drag != DragState::Idle {
            return None;
        }
        let slot = hit_test(&self.tray, pointer, &self.layout, &self.config)?;
        let lift = self.drag_lift();

        self.tray.raise(slot);
        let piece = self.tray.slot_mut(slot)?;
        piece.dragging = true;
        piece.pos = pointer - lift;
        self.drag = DragState::Dragging { slot };
        Some(slot)
    }

    /// Follow the pointer. Purely visual; the board never changes here.
    pub fn pointer_move(&mut self, pointer: Vec2) -> bool {
        let DragState::Dragging { slot } = self.drag else {
            return false;
        };
        let lift = self.drag_lift();
        match self.tray.slot_mut(slot) {
            Some(piece) => {
                piece.pos = pointer - lift;
                true
            }
            None => false,
        }
    }

    /// Drop the dragged piece where the pointer was released
    pub fn pointer_up(&mut self, pointer: Vec2) -> ReleaseOutcome {
        let DragState::Dragging { slot } = self.drag else {
            return ReleaseOutcome::Ignored;
        };
        self.pointer_move(pointer);
        self.drag = DragState::Idle;
        self.attempt_place(slot)
    }

    /// Return a dragged piece to its slot without placing it
    pub fn cancel_drag(&mut self) {
        if let DragState::Dragging { slot } = self.drag {
            if let Some(piece) = self.tray.slot_mut(slot) {
                piece.return_home();
            }
        }
        self.drag = DragState::Idle;
    }

    /// Board anchor under a tray piece's current position
    fn anchor_for(&self, slot: usize) -> Option<HexCoord> {
        let piece = self.tray.slot(slot)?;
        Some(pixel_to_hex(piece.pos, self.layout.origin, self.layout.cell_size))
    }

    fn can_place(&self, cells: &[HexCoord]) -> bool {
        cells
            .iter()
            .all(|hex| self.board.is_in_bounds(*hex) && self.board.is_empty(*hex))
    }

    /// Place the piece in `slot` at the hex under its anchor, all or nothing.
    ///
    /// Every target cell is checked before any is written. On success the
    /// piece leaves the tray, points are awarded for its cells and for any
    /// lines it completes, and the tray is refilled.
    pub fn attempt_place(&mut self, slot: usize) -> ReleaseOutcome {
        let Some(anchor) = self.anchor_for(slot) else {
            return ReleaseOutcome::Ignored;
        };
        let cells = match self.tray.slot(slot) {
            Some(piece) => piece.target_cells(anchor),
            None => return ReleaseOutcome::Ignored,
        };

        if !self.can_place(&cells) {
            if let Some(piece) = self.tray.slot_mut(slot) {
                piece.return_home();
            }
            self.events.push(GameEvent::PlacementRejected { slot });
            return ReleaseOutcome::Rejected { slot };
        }

        let Some(piece) = self.tray.take(slot) else {
            return ReleaseOutcome::Ignored;
        };
        for hex in &cells {
            self.board.occupy(*hex, piece.color);
        }
        self.events.push(GameEvent::PiecePlaced {
            piece_id: piece.id,
            cells: cells.clone(),
        });

        let placement_points = cells.len() as u32;
        self.award(placement_points, ScoreSource::Placement);

        let cleared = clear_lines(&mut self.board);
        if !cleared.is_empty() {
            self.events.push(GameEvent::LinesCleared {
                lines: cleared.lines.clone(),
                cells: cleared.cells.len(),
            });
            self.award(cleared.points(), ScoreSource::LineClear);
        }

        self.refill_tray();
        self.finish_level_if_due();

        ReleaseOutcome::Placed(PlacementReport {
            piece_id: piece.id,
            anchor,
            cells,
            placement_points,
            cleared,
        })
    }

    /// Drop preview for the piece being dragged
    pub fn placement_preview(&self) -> Option<PlacementPreview> {
        let DragState::Dragging { slot } = self.drag else {
            return None;
        };
        let anchor = self.anchor_for(slot)?;
        let cells = self.tray.slot(slot)?.target_cells(anchor);
        let valid = self.can_place(&cells);

        let lines_completed = if valid {
            let mut board = self.board.clone();
            for hex in &cells {
                board.occupy(*hex, self.tray.slot(slot)?.color);
            }
            find_full_lines(&board).lines.len()
        } else {
            0
        };

        Some(PlacementPreview {
            slot,
            anchor,
            cells,
            valid,
            lines_completed,
        })
    }
}

/// Binds a drag to the pointer that started it.
///
/// Multi-touch hosts see interleaved events from several pointers. Only the
/// pointer whose press picked a piece up may move, drop or cancel it; events
/// from any other pointer are ignored until that drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerTracker {
    active: Option<i32>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer currently owning the drag
    pub fn active(&self) -> Option<i32> {
        self.active
    }

    /// Forget an owner whose drag the engine already ended (pause, level-up,
    /// game over)
    fn sync(&mut self, state: &GameState) {
        if state.drag_state() == DragState::Idle {
            self.active = None;
        }
    }

    pub fn pointer_down(&mut self, state: &mut GameState, id: i32, pointer: Vec2) -> Option<usize> {
        self.sync(state);
        if self.active.is_some() {
            return None;
        }
        let slot = state.pointer_down(pointer)?;
        self.active = Some(id);
        Some(slot)
    }

    pub fn pointer_move(&mut self, state: &mut GameState, id: i32, pointer: Vec2) -> bool {
        self.sync(state);
        self.active == Some(id) && state.pointer_move(pointer)
    }

    pub fn pointer_up(&mut self, state: &mut GameState, id: i32, pointer: Vec2) -> ReleaseOutcome {
        self.sync(state);
        if self.active != Some(id) {
            return ReleaseOutcome::Ignored;
        }
        self.active = None;
        state.pointer_up(pointer)
    }

    pub fn pointer_cancel(&mut self, state: &mut GameState, id: i32) {
        if self.active == Some(id) {
            self.active = None;
            state.cancel_drag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::Cell;
    use crate::sim::hex::{Axis, hex_to_pixel};
    use crate::sim::piece::{PIECE_TEMPLATES, Piece, PieceColor, PieceTemplate};
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn template(name: &str) -> &'static PieceTemplate {
        PIECE_TEMPLATES
            .iter()
            .find(|t| t.name == name)
            .unwrap()
    }

    fn radius2_config() -> EngineConfig {
        EngineConfig {
            board_radius: 2,
            target_base: 1000,
            ..Default::default()
        }
    }

    fn state_with(config: EngineConfig) -> GameState {
        GameState::new(config, 99, 400.0, 800.0)
    }

    /// Swap a known piece into a slot, keeping the slot anchor
    fn put_piece(state: &mut GameState, slot: usize, name: &str, color: PieceColor) -> u32 {
        let home = state.layout.tray_slot_anchors()[slot];
        let id = 9000 + slot as u32;
        state.tray.put(slot, Piece::new(id, template(name), color, home));
        id
    }

    /// Pointer position that puts the dragged piece's anchor on `hex`
    fn pointer_for(state: &GameState, hex: HexCoord) -> Vec2 {
        hex_to_pixel(hex, state.layout.origin, state.layout.cell_size) + state.drag_lift()
    }

    fn drag_to(state: &mut GameState, slot: usize, hex: HexCoord) -> ReleaseOutcome {
        state.tray.raise(slot);
        let home = state.tray.slot(slot).map(|p| p.home).unwrap();
        assert_eq!(state.pointer_down(home), Some(slot));
        let target = pointer_for(state, hex);
        state.pointer_move((home + target) * 0.5);
        state.pointer_up(target)
    }

    #[test]
    fn test_pointer_down_picks_touched_piece() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(0).unwrap().home;
        state.tray.raise(0);
        assert_eq!(state.pointer_down(home), Some(0));
        assert_eq!(state.drag_state(), DragState::Dragging { slot: 0 });
        assert_eq!(state.tray.z_order()[2], 0);

        let piece = state.tray.slot(0).unwrap();
        assert!(piece.dragging);
        // Lifted above the finger
        assert!(piece.pos.y < home.y);
        assert_eq!(piece.pos.x, home.x);
    }

    #[test]
    fn test_pointer_down_on_empty_space() {
        let mut state = state_with(radius2_config());
        assert_eq!(state.pointer_down(state.layout.origin), None);
        assert_eq!(state.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_pointer_move_tracks_pointer() {
        let mut state = state_with(radius2_config());
        assert!(!state.pointer_move(Vec2::new(5.0, 5.0)));

        let home = state.tray.slot(2).unwrap().home;
        state.pointer_down(home);
        let board_before = state.board.clone();
        let p = Vec2::new(123.0, 234.0);
        assert!(state.pointer_move(p));
        assert_eq!(state.tray.slot(2).unwrap().pos, p - state.drag_lift());
        assert_eq!(state.board, board_before);
    }

    #[test]
    fn test_release_while_idle_is_noop() {
        let mut state = state_with(radius2_config());
        let board = state.board.clone();
        assert_eq!(state.pointer_up(Vec2::new(10.0, 10.0)), ReleaseOutcome::Ignored);
        assert_eq!(state.board, board);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_place_single_cell() {
        let mut state = state_with(radius2_config());
        let id = put_piece(&mut state, 1, "single", PieceColor::Blue);

        let outcome = drag_to(&mut state, 1, HexCoord::new(1, -1));
        let ReleaseOutcome::Placed(report) = outcome else {
            panic!("expected placement, got {:?}", outcome);
        };
        assert_eq!(report.piece_id, id);
        assert_eq!(report.placement_points, 1);
        assert_eq!(
            state.board.get(HexCoord::new(1, -1)),
            Some(Cell::Filled(PieceColor::Blue))
        );
        // Slot refilled with a new piece
        assert_eq!(state.tray.len(), 3);
        assert_ne!(state.tray.slot(1).unwrap().id, id);
        assert_eq!(state.drag_state(), DragState::Idle);
        assert_eq!(state.total_score(), 1);
    }

    #[test]
    fn test_reject_out_of_bounds() {
        let mut state = state_with(radius2_config());
        put_piece(&mut state, 0, "line3-q", PieceColor::Red);
        let board = state.board.clone();

        // (1, 0), (2, 0), (3, 0): last cell is off the board
        let outcome = drag_to(&mut state, 0, HexCoord::new(1, 0));
        assert_eq!(outcome, ReleaseOutcome::Rejected { slot: 0 });
        assert_eq!(state.board, board);

        let piece = state.tray.slot(0).unwrap();
        assert_eq!(piece.pos, piece.home);
        assert!(!piece.dragging);
        assert!(state
            .drain_events()
            .contains(&GameEvent::PlacementRejected { slot: 0 }));
    }

    #[test]
    fn test_reject_occupied_writes_nothing() {
        let mut state = state_with(radius2_config());
        put_piece(&mut state, 2, "tri-down", PieceColor::Green);
        state.board.occupy(HexCoord::new(0, 1), PieceColor::Red);
        let board = state.board.clone();

        let outcome = drag_to(&mut state, 2, HexCoord::new(0, 0));
        assert_eq!(outcome, ReleaseOutcome::Rejected { slot: 2 });
        assert_eq!(state.board, board);
        assert_eq!(state.total_score(), 0);
    }

    #[test]
    fn test_completing_q_line_scores_placement_and_clear() {
        let mut state = state_with(radius2_config());
        state.board.occupy(HexCoord::new(0, -2), PieceColor::Yellow);
        state.board.occupy(HexCoord::new(0, -1), PieceColor::Yellow);
        put_piece(&mut state, 2, "line3-r", PieceColor::Purple);
        state.drain_events();

        let outcome = drag_to(&mut state, 2, HexCoord::new(0, 0));
        let ReleaseOutcome::Placed(report) = outcome else {
            panic!("expected placement, got {:?}", outcome);
        };
        assert_eq!(report.placement_points, 3);
        assert_eq!(report.cleared.lines.len(), 1);
        assert_eq!(report.cleared.lines[0].axis, Axis::Q);
        assert_eq!(report.cleared.points(), 5);
        assert_eq!(report.total_points(), 8);
        for hex in state.board.axis_line(Axis::Q, 0) {
            assert!(state.board.is_empty(hex));
        }
        assert_eq!(state.board.occupied_count(), 0);

        let scores: Vec<u32> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Scored { points, .. } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(scores, vec![3, 5]);
        assert_eq!(state.level.level_score, 8);
    }

    #[test]
    fn test_preview() {
        let mut state = state_with(radius2_config());
        assert!(state.placement_preview().is_none());

        state.board.occupy(HexCoord::new(0, -2), PieceColor::Yellow);
        state.board.occupy(HexCoord::new(0, -1), PieceColor::Yellow);
        put_piece(&mut state, 2, "line3-r", PieceColor::Purple);
        let home = state.tray.slot(2).unwrap().home;
        state.pointer_down(home);

        state.pointer_move(pointer_for(&state, HexCoord::new(0, 0)));
        let preview = state.placement_preview().unwrap();
        assert_eq!(preview.anchor, HexCoord::new(0, 0));
        assert!(preview.valid);
        assert_eq!(preview.lines_completed, 1);

        state.pointer_move(pointer_for(&state, HexCoord::new(0, -1)));
        let preview = state.placement_preview().unwrap();
        assert!(!preview.valid);
        assert_eq!(preview.lines_completed, 0);
        // Preview never touches the board
        assert_eq!(state.board.occupied_count(), 2);
    }

    #[test]
    fn test_no_input_when_inactive_or_over() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(2).unwrap().home;

        state.set_active(false);
        assert_eq!(state.pointer_down(home), None);
        state.set_active(true);

        state.phase = GamePhase::GameOver;
        assert_eq!(state.pointer_down(home), None);
    }

    #[test]
    fn test_pause_releases_drag() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(2).unwrap().home;
        state.pointer_down(home);
        state.pointer_move(Vec2::new(50.0, 50.0));

        state.set_active(false);
        assert_eq!(state.drag_state(), DragState::Idle);
        let piece = state.tray.slot(2).unwrap();
        assert_eq!(piece.pos, piece.home);
        assert!(!piece.dragging);
        assert_eq!(state.board.occupied_count(), 0);
    }

    #[test]
    fn test_resize_during_drag_leaves_dragged_piece() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(2).unwrap().home;
        state.pointer_down(home);
        let p = Vec2::new(150.0, 300.0);
        state.pointer_move(p);
        let dragged_pos = state.tray.slot(2).unwrap().pos;

        state.resize(900.0, 600.0);
        let anchors = state.layout.tray_slot_anchors();
        assert_eq!(state.tray.slot(2).unwrap().pos, dragged_pos);
        assert_eq!(state.tray.slot(2).unwrap().home, anchors[2]);
        assert_eq!(state.tray.slot(0).unwrap().pos, anchors[0]);
    }

    #[test]
    fn test_hit_test_prefers_top_of_z_order() {
        let state = state_with(radius2_config());
        let mut tray = state.tray.clone();
        // Stack two pieces on the same spot
        let spot = state.layout.tray_slot_anchors()[1];
        for slot in [0, 1] {
            if let Some(piece) = tray.slot_mut(slot) {
                piece.pos = spot;
            }
        }
        tray.raise(0);
        assert_eq!(hit_test(&tray, spot, &state.layout, &state.config), Some(0));
        tray.raise(1);
        assert_eq!(hit_test(&tray, spot, &state.layout, &state.config), Some(1));
    }

    proptest! {
        #[test]
        fn prop_placement_all_or_nothing(
            seed in any::<u64>(),
            filled in proptest::collection::vec((-2i32..=2, -2i32..=2), 0..12),
            template_idx in 0usize..13,
            q in -4i32..=4,
            r in -4i32..=4,
        ) {
            let mut state = GameState::new(radius2_config(), seed, 400.0, 800.0);
            for (fq, fr) in filled {
                state.board.occupy(HexCoord::new(fq, fr), PieceColor::Red);
            }
            let name = PIECE_TEMPLATES[template_idx % PIECE_TEMPLATES.len()].name;
            put_piece(&mut state, 2, name, PieceColor::Blue);
            let before = state.board.clone();
            let target = HexCoord::new(q, r);

            match drag_to(&mut state, 2, target) {
                ReleaseOutcome::Placed(report) => {
                    prop_assert_eq!(report.anchor, target);
                    for hex in &report.cells {
                        let cell = state.board.get(*hex);
                        prop_assert!(
                            cell == Some(Cell::Filled(PieceColor::Blue))
                                || report.cleared.cells.contains(hex)
                        );
                        prop_assert!(before.is_empty(*hex));
                    }
                    // Nothing else changed apart from cleared lines
                    for (hex, cell) in before.cells() {
                        if !report.cells.contains(&hex) && !report.cleared.cells.contains(&hex) {
                            prop_assert_eq!(state.board.get(hex), Some(cell));
                        }
                    }
                    prop_assert_ne!(state.tray.slot(2).map(|p| p.id), Some(9002));
                }
                ReleaseOutcome::Rejected { slot } => {
                    prop_assert_eq!(slot, 2);
                    prop_assert_eq!(&state.board, &before);
                    let piece = state.tray.slot(2).unwrap();
                    prop_assert_eq!(piece.id, 9002);
                    prop_assert_eq!(piece.pos, piece.home);
                }
                ReleaseOutcome::Ignored => prop_assert!(false, "release ignored"),
            }
        }
    }

    #[test]
    fn test_tracker_ignores_second_finger() {
        let mut state = state_with(radius2_config());
        put_piece(&mut state, 0, "single", PieceColor::Green);
        let home = state.tray.slot(0).unwrap().home;
        let mut tracker = PointerTracker::new();

        assert_eq!(tracker.pointer_down(&mut state, 1, home), Some(0));
        assert_eq!(tracker.active(), Some(1));

        // Finger 2 lands on the board while finger 1 holds the piece
        let elsewhere = pointer_for(&state, HexCoord::new(1, 1));
        assert_eq!(tracker.pointer_down(&mut state, 2, elsewhere), None);
        assert!(!tracker.pointer_move(&mut state, 2, elsewhere));
        assert_eq!(
            tracker.pointer_up(&mut state, 2, elsewhere),
            ReleaseOutcome::Ignored
        );
        tracker.pointer_cancel(&mut state, 2);
        assert_eq!(state.drag_state(), DragState::Dragging { slot: 0 });
        assert_eq!(state.board.occupied_count(), 0);

        // Finger 1 still owns the drag and drops where it is
        let target = pointer_for(&state, HexCoord::ORIGIN);
        assert!(tracker.pointer_move(&mut state, 1, target));
        let outcome = tracker.pointer_up(&mut state, 1, target);
        assert!(matches!(outcome, ReleaseOutcome::Placed(_)));
        assert_eq!(state.board.get(HexCoord::ORIGIN), Some(Cell::Filled(PieceColor::Green)));
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_tracker_cancel_from_owner_returns_piece() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(1).unwrap().home;
        state.tray.raise(1);
        let mut tracker = PointerTracker::new();
        let slot = tracker.pointer_down(&mut state, 7, home).unwrap();

        tracker.pointer_cancel(&mut state, 7);
        assert_eq!(tracker.active(), None);
        assert_eq!(state.drag_state(), DragState::Idle);
        assert_eq!(state.tray.slot(slot).unwrap().pos, state.tray.slot(slot).unwrap().home);
    }

    #[test]
    fn test_tracker_releases_owner_after_pause() {
        let mut state = state_with(radius2_config());
        let home = state.tray.slot(0).unwrap().home;
        state.tray.raise(0);
        let mut tracker = PointerTracker::new();
        assert!(tracker.pointer_down(&mut state, 3, home).is_some());

        // The engine drops the drag on its own
        state.set_active(false);
        state.set_active(true);

        // A new finger can pick up again; the stale owner is forgotten
        assert!(tracker.pointer_down(&mut state, 4, home).is_some());
        assert_eq!(tracker.active(), Some(4));
        assert_eq!(
            tracker.pointer_up(&mut state, 3, home),
            ReleaseOutcome::Ignored
        );
    }
}
