use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Cell;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

const I_MASK: &[&[u8]] = &[&[1, 1, 1, 1]];
const O_MASK: &[&[u8]] = &[&[1, 1], &[1, 1]];
const T_MASK: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1]];
const L_MASK: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1]];
const J_MASK: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1]];
const S_MASK: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0]];
const Z_MASK: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1]];

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Color id written into the board when this piece locks (1..=7).
    pub const fn color_id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }

    pub fn from_color_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.color_id() == id)
    }

    pub const fn letter(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    const fn mask(self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::I => I_MASK,
            PieceKind::O => O_MASK,
            PieceKind::T => T_MASK,
            PieceKind::L => L_MASK,
            PieceKind::J => J_MASK,
            PieceKind::S => S_MASK,
            PieceKind::Z => Z_MASK,
        }
    }

    /// A fresh spawn-orientation shape. Callers own the result outright.
    pub fn shape(self) -> Shape {
        let rows = self
            .mask()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&bit| if bit == 0 { Cell::Empty } else { Cell::Filled(self) })
                    .collect()
            })
            .collect();
        Shape { rows }
    }

    /// Uniform draw over all seven kinds.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RotationDir {
    Cw,
    Ccw,
}

impl RotationDir {
    pub fn inverse(self) -> Self {
        match self {
            RotationDir::Cw => RotationDir::Ccw,
            RotationDir::Ccw => RotationDir::Cw,
        }
    }
}

/// One piece in one orientation: a rectangular matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    rows: Vec<Vec<Cell>>,
}

impl Shape {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// `(row, col, kind)` for every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, PieceKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cell)| match cell {
                Cell::Filled(kind) => Some((r, c, *kind)),
                Cell::Empty => None,
            })
        })
    }

    /// Returns a new matrix turned 90 degrees; `self` is untouched.
    pub fn rotated(&self, dir: RotationDir) -> Shape {
        let mut rows = self.transposed();
        match dir {
            RotationDir::Cw => rows.iter_mut().for_each(|row| row.reverse()),
            RotationDir::Ccw => rows.reverse(),
        }
        Shape { rows }
    }

    fn transposed(&self) -> Vec<Vec<Cell>> {
        (0..self.width())
            .map(|c| (0..self.height()).map(|r| self.rows[r][c]).collect())
            .collect()
    }

    pub fn color_grid(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.color_id()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn mask_of(shape: &Shape) -> Vec<Vec<u8>> {
        shape
            .rows()
            .iter()
            .map(|row| row.iter().map(|c| u8::from(c.is_filled())).collect())
            .collect()
    }

    #[test]
    fn every_piece_has_four_cells_and_its_own_color() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            assert_eq!(shape.filled_cells().count(), 4, "{kind:?}");
            assert!(shape.filled_cells().all(|(_, _, k)| k == kind));
            assert_eq!(PieceKind::from_color_id(kind.color_id()), Some(kind));
        }
        assert_eq!(PieceKind::from_color_id(0), None);
        assert_eq!(PieceKind::from_color_id(8), None);
    }

    #[test]
    fn catalog_returns_independent_copies() {
        let first = PieceKind::T.shape();
        let turned = first.rotated(RotationDir::Cw);
        assert_ne!(turned, first);
        assert_eq!(first, PieceKind::T.shape());
        assert_eq!(mask_of(&PieceKind::T.shape()), vec![vec![0, 1, 0], vec![1, 1, 1]]);
    }

    #[test]
    fn clockwise_turns_t_to_point_right() {
        let cw = PieceKind::T.shape().rotated(RotationDir::Cw);
        assert_eq!(mask_of(&cw), vec![vec![1, 0], vec![1, 1], vec![1, 0]]);
    }

    #[test]
    fn counter_clockwise_turns_t_to_point_left() {
        let ccw = PieceKind::T.shape().rotated(RotationDir::Ccw);
        assert_eq!(mask_of(&ccw), vec![vec![0, 1], vec![1, 1], vec![0, 1]]);
    }

    #[test]
    fn four_turns_restore_every_shape() {
        for kind in PieceKind::ALL {
            for dir in [RotationDir::Cw, RotationDir::Ccw] {
                let original = kind.shape();
                let mut shape = original.clone();
                for _ in 0..4 {
                    shape = shape.rotated(dir);
                }
                assert_eq!(shape, original, "{kind:?} {dir:?}");
            }
        }
    }

    #[test]
    fn opposite_turns_cancel() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let back = shape.rotated(RotationDir::Cw).rotated(RotationDir::Cw.inverse());
            assert_eq!(back, shape);
        }
    }

    #[test]
    fn rotating_swaps_dimensions() {
        let i = PieceKind::I.shape();
        let vertical = i.rotated(RotationDir::Cw);
        assert_eq!((i.height(), i.width()), (1, 4));
        assert_eq!((vertical.height(), vertical.width()), (4, 1));
    }

    #[test]
    fn random_draws_cover_all_kinds() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(PieceKind::random(&mut rng));
        }
        assert_eq!(seen.len(), PieceKind::ALL.len());
    }
}
