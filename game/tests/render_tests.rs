use blockdrop::board::Offset;
use blockdrop::logic::Intent;
use blockdrop::piece::PieceKind;
use blockdrop::state::GameState;
use blockdrop::view::{
    CELL_SIZE, GameSnapshot, board_rect, draw_frame, frame_size, piece_color, preview_rect,
    render_text,
};
use engine::surface::{RgbaBufferSurface, Surface};
use sha2::{Digest, Sha256};

fn o_state() -> GameState {
    let mut state = GameState::new(21);
    state
        .tetris_mut()
        .set_current_piece_for_test(PieceKind::O, Offset::new(0, 4));
    state
}

fn render(snapshot: &GameSnapshot) -> RgbaBufferSurface {
    let mut surface = RgbaBufferSurface::new(frame_size(snapshot.rows, snapshot.cols));
    let size = surface.size();
    draw_frame(surface.frame_mut(), size, snapshot);
    surface
}

fn cell_center(snapshot: &GameSnapshot, row: u32, col: u32) -> (u32, u32) {
    let board = board_rect(snapshot);
    (
        board.x + col * CELL_SIZE + CELL_SIZE / 2,
        board.y + row * CELL_SIZE + CELL_SIZE / 2,
    )
}

fn frame_hash(surface: &RgbaBufferSurface) -> String {
    hex::encode(Sha256::digest(surface.frame()))
}

#[test]
fn text_render_shows_active_and_settled_cells() {
    let mut state = o_state();
    let text = render_text(&GameSnapshot::capture(&state));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[0], "⬛⬛⬛⬛⬜⬜⬛⬛⬛⬛");
    assert_eq!(lines[1], "⬛⬛⬛⬛⬜⬜⬛⬛⬛⬛");
    assert_eq!(lines[19], "⬛".repeat(10));
    assert!(lines[20].starts_with("Score: 0  High: 0  Lines: 0"));

    state.apply(Intent::HardDrop);
    let text = render_text(&GameSnapshot::capture(&state));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[19], "⬛⬛⬛⬛🟨🟨⬛⬛⬛⬛");
    assert_eq!(lines[18], "⬛⬛⬛⬛🟨🟨⬛⬛⬛⬛");
}

#[test]
fn status_line_reports_pause_and_game_over() {
    let mut state = o_state();
    state.apply(Intent::TogglePause);
    let text = render_text(&GameSnapshot::capture(&state));
    assert!(text.ends_with("[PAUSED]"));

    let mut snapshot = GameSnapshot::capture(&state);
    snapshot.game_over = true;
    assert!(render_text(&snapshot).ends_with("[GAME OVER]"));
}

#[test]
fn frame_size_fits_board_and_preview() {
    let size = frame_size(20, 10);
    let snapshot = GameSnapshot::capture(&o_state());
    let board = board_rect(&snapshot);
    let preview = preview_rect(&snapshot);
    assert!(board.x + board.w < preview.x);
    assert!(preview.x + preview.w <= size.width);
    assert!(board.y + board.h <= size.height);
}

#[test]
fn pixel_render_paints_pieces_in_their_colors() {
    let mut state = o_state();
    state.apply(Intent::HardDrop);
    let snapshot = GameSnapshot::capture(&state);
    let surface = render(&snapshot);

    for (row, col) in [(18, 4), (18, 5), (19, 4), (19, 5)] {
        let (x, y) = cell_center(&snapshot, row, col);
        assert_eq!(surface.pixel(x, y), Some(piece_color(PieceKind::O)));
    }
    let (x, y) = cell_center(&snapshot, 19, 0);
    assert_ne!(surface.pixel(x, y), Some(piece_color(PieceKind::O)));

    let next = snapshot.next.expect("look-ahead piece");
    let preview = preview_rect(&snapshot);
    let mut found = false;
    for y in preview.y..preview.y + preview.h {
        for x in preview.x..preview.x + preview.w {
            found |= surface.pixel(x, y) == Some(piece_color(next));
        }
    }
    assert!(found, "next piece {next:?} missing from preview");
}

#[test]
fn ghost_tints_the_landing_cells() {
    let snapshot = GameSnapshot::capture(&o_state());
    assert_eq!(snapshot.ghost, Some(Offset::new(18, 4)));
    let with_ghost = render(&snapshot);

    let mut no_ghost = snapshot.clone();
    no_ghost.ghost = None;
    let without_ghost = render(&no_ghost);

    let (x, y) = cell_center(&snapshot, 19, 4);
    let (ex, ey) = (x - CELL_SIZE / 2 + 2, y - CELL_SIZE / 2 + 2);
    assert_ne!(with_ghost.pixel(ex, ey), without_ghost.pixel(ex, ey));
    assert_ne!(with_ghost.pixel(ex, ey), Some(piece_color(PieceKind::O)));
}

#[test]
fn pause_dims_the_board() {
    let mut state = o_state();
    let running = render(&GameSnapshot::capture(&state));
    state.apply(Intent::TogglePause);
    let paused = render(&GameSnapshot::capture(&state));

    let (x, y) = cell_center(&GameSnapshot::capture(&state), 0, 4);
    let bright = running.pixel(x, y).expect("in bounds");
    let dim = paused.pixel(x, y).expect("in bounds");
    assert!(dim[0] < bright[0] && dim[1] < bright[1]);
}

#[test]
fn identical_states_render_identical_frames() {
    let state = o_state();
    let a = render(&GameSnapshot::capture(&state));
    let b = render(&GameSnapshot::capture(&state.clone()));
    assert_eq!(frame_hash(&a), frame_hash(&b));

    let mut moved = state.clone();
    moved.apply(Intent::MoveLeft);
    let c = render(&GameSnapshot::capture(&moved));
    assert_ne!(frame_hash(&a), frame_hash(&c));
}

#[test]
fn composed_grid_overlays_the_active_piece() {
    let mut state = GameState::new(9);
    state
        .tetris_mut()
        .set_current_piece_for_test(PieceKind::T, Offset::new(2, 0));
    let snapshot = GameSnapshot::capture(&state);
    let grid = snapshot.composed_grid();
    let t = PieceKind::T.color_id();
    assert_eq!(grid[2][1], t);
    assert_eq!(&grid[3][0..3], &[t, t, t]);
    assert_eq!(grid[2][0], 0);
    assert!(snapshot.board.iter().flatten().all(|&id| id == 0));
}

#[test]
fn snapshot_with_short_board_still_renders() {
    let mut snapshot = GameSnapshot::capture(&o_state());
    snapshot.board.truncate(1);
    snapshot.board[0].truncate(5);

    let text = render_text(&snapshot);
    assert_eq!(text.lines().next(), Some("⬛⬛⬛⬛⬜"));
    assert_eq!(text.lines().count(), 2);

    let grid = snapshot.composed_grid();
    assert_eq!(grid, vec![vec![0, 0, 0, 0, PieceKind::O.color_id()]]);

    let surface = render(&snapshot);
    assert!(surface.frame().iter().any(|&b| b != 0));
}
