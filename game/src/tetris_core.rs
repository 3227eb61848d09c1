use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Cell, Offset};
use crate::piece::{PieceKind, RotationDir, Shape};
use crate::scoring::ScoreRules;

pub use crate::board::{DEFAULT_COLS as BOARD_WIDTH, DEFAULT_ROWS as BOARD_HEIGHT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub offset: Offset,
}

/// Advisory notifications for whoever presents the game (sound, flashes, banners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PieceLocked(PieceKind),
    LinesCleared(u32),
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    Moved,
    Locked { lines: u32 },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PiecePhase {
    Falling,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalDir {
    Left,
    Right,
}

impl HorizontalDir {
    pub const fn delta(self) -> i32 {
        match self {
            HorizontalDir::Left => -1,
            HorizontalDir::Right => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TetrisCore {
    board: Board,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    rng: SmallRng,
    rules: ScoreRules,
    score: u32,
    lines_cleared: u32,
    pieces_locked: u32,
    game_over: bool,
    events: Vec<GameEvent>,
}

impl TetrisCore {
    pub fn new(seed: u64) -> Self {
        Self::with_board(Board::default(), seed)
    }

    pub fn with_board(board: Board, seed: u64) -> Self {
        Self {
            board,
            active: None,
            next: None,
            rng: SmallRng::seed_from_u64(seed),
            rules: ScoreRules::default(),
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            game_over: false,
            events: Vec::new(),
        }
    }

    pub fn set_rules(&mut self, rules: ScoreRules) {
        self.rules = rules;
    }

    pub fn rules(&self) -> ScoreRules {
        self.rules
    }

    /// Empties the board, zeroes the counters and spawns a fresh piece.
    pub fn initialize_game(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = None;
        self.score = 0;
        self.lines_cleared = 0;
        self.pieces_locked = 0;
        self.game_over = false;
        self.events.clear();
        self.spawn_new_piece();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn current_piece(&self) -> Option<PieceKind> {
        self.active.as_ref().map(|piece| piece.kind)
    }

    pub fn current_piece_offset(&self) -> Option<Offset> {
        self.active.as_ref().map(|piece| piece.offset)
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> PiecePhase {
        if self.game_over {
            PiecePhase::GameOver
        } else {
            PiecePhase::Falling
        }
    }

    /// Events produced since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Where the active piece would land after a hard drop.
    pub fn ghost_offset(&self) -> Option<Offset> {
        let piece = self.active.as_ref()?;
        if self.game_over || self.board.collides(&piece.shape, piece.offset) {
            return None;
        }
        let mut offset = piece.offset;
        while !self.board.collides(&piece.shape, offset + Offset::new(1, 0)) {
            offset.row += 1;
        }
        Some(offset)
    }

    /// Promotes the look-ahead piece (drawing one if the slot is empty), refills the
    /// look-ahead, and places the new piece centered on row 0.
    ///
    /// Returns `false` and ends the game when the spawn position is already blocked.
    pub fn spawn_new_piece(&mut self) -> bool {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => PieceKind::random(&mut self.rng),
        };
        self.next = Some(PieceKind::random(&mut self.rng));

        let shape = kind.shape();
        let col = self.board.col_count().saturating_sub(shape.width()) / 2;
        let offset = Offset::new(0, col as i32);
        let blocked = self.board.collides(&shape, offset);
        self.active = Some(ActivePiece {
            kind,
            shape,
            offset,
        });

        if blocked {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            info!(
                score = self.score,
                lines = self.lines_cleared,
                pieces = self.pieces_locked,
                "game over"
            );
            return false;
        }
        true
    }

    pub fn move_horizontal(&mut self, dir: HorizontalDir) -> bool {
        self.move_piece(Offset::new(0, dir.delta()))
    }

    pub fn move_piece(&mut self, delta: Offset) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = &self.active else {
            return false;
        };
        let target = piece.offset + delta;
        if self.board.collides(&piece.shape, target) {
            return false;
        }
        if let Some(piece) = self.active.as_mut() {
            piece.offset = target;
        }
        true
    }

    /// Moves the piece one row down, or locks it where it is if that row is blocked.
    pub fn soft_drop(&mut self) -> DropResult {
        if self.game_over || self.active.is_none() {
            return DropResult::Ignored;
        }
        if self.move_piece(Offset::new(1, 0)) {
            return DropResult::Moved;
        }
        let lines = self.lock_active_piece();
        DropResult::Locked { lines }
    }

    /// Drops straight to the landing row and locks. Returns the number of rows fallen.
    pub fn hard_drop(&mut self) -> u32 {
        let mut rows = 0u32;
        loop {
            match self.soft_drop() {
                DropResult::Moved => rows += 1,
                DropResult::Locked { .. } | DropResult::Ignored => return rows,
            }
        }
    }

    /// Rotates the active piece, kicking sideways (+1, -2, +3, ... cumulative) until it fits.
    /// When the kick distance outgrows the rotated piece's width the rotation is abandoned
    /// and the piece is left exactly as it was.
    pub fn rotate(&mut self, dir: RotationDir) -> bool {
        if self.game_over {
            return false;
        }
        let Some(piece) = &self.active else {
            return false;
        };

        let rotated = piece.shape.rotated(dir);
        let width = rotated.width() as i32;
        let mut offset = piece.offset;
        let mut kick = 1i32;
        while self.board.collides(&rotated, offset) {
            offset.col += kick;
            kick = -(kick + kick.signum());
            if kick > width {
                debug!(kind = ?piece.kind, ?dir, "rotation blocked");
                return false;
            }
        }

        if let Some(piece) = self.active.as_mut() {
            piece.shape = rotated;
            piece.offset = offset;
        }
        true
    }

    fn lock_active_piece(&mut self) -> u32 {
        let Some(piece) = self.active.take() else {
            return 0;
        };

        self.board.merge(&piece.shape, piece.offset);
        self.pieces_locked = self.pieces_locked.saturating_add(1);
        self.events.push(GameEvent::PieceLocked(piece.kind));

        let cleared = self.board.sweep() as u32;
        if cleared > 0 {
            let points = self.rules.sweep_points(cleared);
            self.score = self.score.saturating_add(points);
            self.lines_cleared = self.lines_cleared.saturating_add(cleared);
            self.events.push(GameEvent::LinesCleared(cleared));
            debug!(cleared, points, score = self.score, "lines cleared");
        }
        debug!(kind = ?piece.kind, row = piece.offset.row, col = piece.offset.col, "piece locked");

        self.spawn_new_piece();
        cleared
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.board.set_cell(row, col, cell);
    }

    pub fn set_current_piece_for_test(&mut self, kind: PieceKind, offset: Offset) {
        self.active = Some(ActivePiece {
            kind,
            shape: kind.shape(),
            offset,
        });
    }

    pub fn set_next_piece_for_test(&mut self, kind: PieceKind) {
        self.next = Some(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_with(kind: PieceKind, offset: Offset) -> TetrisCore {
        let mut core = TetrisCore::new(0);
        core.initialize_game();
        core.set_current_piece_for_test(kind, offset);
        core
    }

    #[test]
    fn kick_sequence_alternates_and_grows() {
        // Vertical I at col 7: horizontal overflows the right wall. Net columns tried are
        // 7, 8, then 6, which fits.
        let mut core = core_with(PieceKind::I, Offset::new(5, 7));
        if let Some(piece) = core.active.as_mut() {
            piece.shape = piece.shape.rotated(RotationDir::Cw);
        }
        assert!(core.rotate(RotationDir::Ccw));
        let piece = core.active_piece().expect("active piece");
        assert_eq!(piece.shape, PieceKind::I.shape());
        assert_eq!(piece.offset, Offset::new(5, 6));
    }

    #[test]
    fn kick_gives_up_once_it_outgrows_the_piece() {
        // Hard against the wall the search walks 9, 10, 8, 11, 7 and stops before col 6.
        let mut core = core_with(PieceKind::I, Offset::new(5, 9));
        if let Some(piece) = core.active.as_mut() {
            piece.shape = piece.shape.rotated(RotationDir::Cw);
        }
        let before = core.active_piece().cloned();
        assert!(!core.rotate(RotationDir::Ccw));
        assert_eq!(core.active_piece().cloned(), before);
    }

    #[test]
    fn failed_rotation_restores_shape_and_offset() {
        // Pin a vertical I in a one-wide shaft so no horizontal kick can fit.
        let mut core = core_with(PieceKind::I, Offset::new(10, 4));
        if let Some(piece) = core.active.as_mut() {
            piece.shape = piece.shape.rotated(RotationDir::Cw);
        }
        for row in 10..14 {
            for col in 0..BOARD_WIDTH {
                if col != 4 {
                    core.set_cell(row, col, Cell::Filled(PieceKind::O));
                }
            }
        }
        let before = core.active_piece().cloned();
        assert!(!core.rotate(RotationDir::Cw));
        assert_eq!(core.active_piece().cloned(), before);
    }

    #[test]
    fn phase_tracks_game_over() {
        let mut core = TetrisCore::new(3);
        core.initialize_game();
        assert_eq!(core.phase(), PiecePhase::Falling);
        for col in 0..BOARD_WIDTH {
            core.set_cell(0, col, Cell::Filled(PieceKind::Z));
        }
        assert!(!core.spawn_new_piece());
        assert_eq!(core.phase(), PiecePhase::GameOver);
        assert_eq!(core.drain_events(), vec![GameEvent::GameOver]);
    }
}
