use engine::render::{GridStyle, Rect, Rgba, draw_cell_grid, draw_outline, fill_rect, shade_rect};
use engine::surface::SurfaceSize;
use serde::{Deserialize, Serialize};

use crate::board::Offset;
use crate::piece::PieceKind;
use crate::state::GameState;
use crate::tetris_core::ActivePiece;

pub const CELL_SIZE: u32 = 24;
pub const MARGIN: u32 = 24;
/// Width and height of the next-piece preview, in cells.
pub const PREVIEW_CELLS: u32 = 4;

const COLOR_BACKGROUND: Rgba = [10, 10, 14, 255];
const COLOR_BOARD_BG: Rgba = [16, 16, 22, 255];
const COLOR_BORDER: Rgba = [40, 40, 55, 255];
const COLOR_EMPTY_DOT: Rgba = [30, 30, 40, 255];
const COLOR_PAUSE_DIM: Rgba = [0, 0, 0, 255];
const COLOR_GAME_OVER_TINT: Rgba = [120, 0, 0, 255];
const COLOR_UNKNOWN: Rgba = [200, 200, 200, 255];

const GHOST_ALPHA: u8 = 60;
const PAUSE_ALPHA: u8 = 150;
const GAME_OVER_ALPHA: u8 = 110;

/// Serializable read model of a running game, for any host that wants to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// Settled cells only, as color ids (`0` = empty).
    pub board: Vec<Vec<u8>>,
    pub active: Option<ActivePiece>,
    pub ghost: Option<Offset>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub high_score: u32,
    pub lines_cleared: u32,
    pub drop_interval_ms: u64,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let tetris = state.tetris();
        let board = tetris.board();
        Self {
            rows: board.row_count(),
            cols: board.col_count(),
            board: board.color_grid(),
            active: tetris.active_piece().cloned(),
            ghost: tetris.ghost_offset(),
            next: tetris.next_piece(),
            score: tetris.score(),
            high_score: state.high_score(),
            lines_cleared: tetris.lines_cleared(),
            drop_interval_ms: state.drop_interval().as_millis() as u64,
            paused: state.is_paused(),
            game_over: tetris.is_game_over(),
        }
    }

    /// On-board cells covered by the active piece, as `(row, col, kind)`.
    pub fn active_cells(&self) -> Vec<(usize, usize, PieceKind)> {
        let Some(piece) = &self.active else {
            return Vec::new();
        };
        self.project(piece, piece.offset)
    }

    fn ghost_cells(&self) -> Vec<(usize, usize, PieceKind)> {
        match (&self.active, self.ghost) {
            (Some(piece), Some(ghost)) => self.project(piece, ghost),
            _ => Vec::new(),
        }
    }

    fn project(&self, piece: &ActivePiece, offset: Offset) -> Vec<(usize, usize, PieceKind)> {
        piece
            .shape
            .filled_cells()
            .filter_map(|(r, c, kind)| {
                let row = offset.row + r as i32;
                let col = offset.col + c as i32;
                let on_board = row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols;
                on_board.then_some((row as usize, col as usize, kind))
            })
            .collect()
    }

    /// Settled cells with the active piece painted over them. Piece cells that fall
    /// outside `board` are skipped, whatever `rows`/`cols` claim.
    pub fn composed_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = self.board.clone();
        for (row, col, kind) in self.active_cells() {
            if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = kind.color_id();
            }
        }
        grid
    }
}

pub fn piece_color(kind: PieceKind) -> Rgba {
    match kind {
        PieceKind::I => [0, 229, 255, 255],
        PieceKind::O => [255, 215, 0, 255],
        PieceKind::T => [170, 80, 255, 255],
        PieceKind::L => [255, 140, 0, 255],
        PieceKind::J => [40, 90, 255, 255],
        PieceKind::S => [40, 210, 90, 255],
        PieceKind::Z => [235, 50, 60, 255],
    }
}

pub fn palette(id: u8) -> Rgba {
    PieceKind::from_color_id(id).map_or(COLOR_UNKNOWN, piece_color)
}

fn emoji(kind: PieceKind) -> char {
    match kind {
        PieceKind::I => '🟦',
        PieceKind::O => '🟨',
        PieceKind::T => '🟪',
        PieceKind::L => '🟧',
        PieceKind::J => '🟫',
        PieceKind::S => '🟩',
        PieceKind::Z => '🟥',
    }
}

/// Emoji rendering: `⬛` empty, settled cells in their piece color, the falling piece
/// as `⬜`, followed by a status line.
pub fn render_text(snapshot: &GameSnapshot) -> String {
    let mut cells: Vec<Vec<char>> = snapshot
        .board
        .iter()
        .map(|row| {
            row.iter()
                .map(|&id| PieceKind::from_color_id(id).map_or('⬛', emoji))
                .collect()
        })
        .collect();
    for (row, col, _) in snapshot.active_cells() {
        if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = '⬜';
        }
    }

    let mut out = String::new();
    for row in cells {
        out.extend(row);
        out.push('\n');
    }
    out.push_str(&status_line(snapshot));
    out
}

pub fn status_line(snapshot: &GameSnapshot) -> String {
    let mut line = format!(
        "Score: {}  High: {}  Lines: {}",
        snapshot.score, snapshot.high_score, snapshot.lines_cleared
    );
    if let Some(next) = snapshot.next {
        line.push_str(&format!("  Next: {}", next.letter()));
    }
    if snapshot.game_over {
        line.push_str("  [GAME OVER]");
    } else if snapshot.paused {
        line.push_str("  [PAUSED]");
    }
    line
}

/// Pixel dimensions of a frame for a `rows x cols` board plus the preview column.
pub fn frame_size(rows: usize, cols: usize) -> SurfaceSize {
    SurfaceSize::new(
        MARGIN * 3 + (cols as u32 + PREVIEW_CELLS) * CELL_SIZE,
        MARGIN * 2 + rows as u32 * CELL_SIZE,
    )
}

pub fn board_rect(snapshot: &GameSnapshot) -> Rect {
    Rect::new(
        MARGIN,
        MARGIN,
        snapshot.cols as u32 * CELL_SIZE,
        snapshot.rows as u32 * CELL_SIZE,
    )
}

pub fn preview_rect(snapshot: &GameSnapshot) -> Rect {
    let side = PREVIEW_CELLS * CELL_SIZE;
    Rect::new(MARGIN * 2 + snapshot.cols as u32 * CELL_SIZE, MARGIN, side, side)
}

pub fn draw_frame(frame: &mut [u8], size: SurfaceSize, snapshot: &GameSnapshot) {
    fill_rect(frame, size, Rect::new(0, 0, size.width, size.height), COLOR_BACKGROUND);

    let board = board_rect(snapshot);
    fill_rect(frame, size, board, COLOR_BOARD_BG);
    draw_outline(frame, size, board, COLOR_BORDER);

    for (row, col, kind) in snapshot.ghost_cells() {
        let cell = Rect::new(
            board.x + col as u32 * CELL_SIZE,
            board.y + row as u32 * CELL_SIZE,
            CELL_SIZE,
            CELL_SIZE,
        );
        shade_rect(frame, size, cell, piece_color(kind), GHOST_ALPHA);
    }

    let style = GridStyle {
        cell_size: CELL_SIZE,
        empty_dot: Some(COLOR_EMPTY_DOT),
        bevel: 3,
    };
    draw_cell_grid(frame, size, (board.x, board.y), &snapshot.composed_grid(), style, palette);

    let preview = preview_rect(snapshot);
    fill_rect(frame, size, preview, COLOR_BOARD_BG);
    draw_outline(frame, size, preview, COLOR_BORDER);
    if let Some(next) = snapshot.next {
        let shape = next.shape();
        let x = preview.x + (PREVIEW_CELLS - shape.width() as u32) * CELL_SIZE / 2;
        let y = preview.y + (PREVIEW_CELLS - shape.height() as u32) * CELL_SIZE / 2;
        let style = GridStyle {
            empty_dot: None,
            ..style
        };
        draw_cell_grid(frame, size, (x, y), &shape.color_grid(), style, palette);
    }

    if snapshot.game_over {
        shade_rect(frame, size, board, COLOR_GAME_OVER_TINT, GAME_OVER_ALPHA);
    } else if snapshot.paused {
        shade_rect(frame, size, board, COLOR_PAUSE_DIM, PAUSE_ALPHA);
    }
}
