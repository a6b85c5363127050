use crate::grid::GRID_WIDTH;

// ============================================================================
// Configuration
// ============================================================================

/// Number of rotation states every piece cycles through.
pub const ROTATION_COUNT: usize = 4;

/// Anchor row a freshly spawned piece starts on. One row above the visible
/// field, so every spawn orientation has its lowest cells on row 0.
pub const SPAWN_ROW: i16 = -1;

// ============================================================================
// Types
// ============================================================================

/// Grid coordinate. `x` is the column, `y` the row (row 0 is the top visible
/// row, negative rows are the hidden spawn band).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

type Shape = [(i16, i16); 4];

// Offsets are (column, row) inside the piece's bounding box, one entry per
// clockwise rotation state.
static I_SHAPES: [Shape; ROTATION_COUNT] = [
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

static J_SHAPES: [Shape; ROTATION_COUNT] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

static L_SHAPES: [Shape; ROTATION_COUNT] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

const O_SHAPE: Shape = [(0, 0), (1, 0), (0, 1), (1, 1)];
static O_SHAPES: [Shape; ROTATION_COUNT] = [O_SHAPE; ROTATION_COUNT];

static S_SHAPES: [Shape; ROTATION_COUNT] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
    [(1, 1), (2, 1), (0, 2), (1, 2)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

static T_SHAPES: [Shape; ROTATION_COUNT] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

static Z_SHAPES: [Shape; ROTATION_COUNT] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::J,
        TetrominoType::L,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::T,
        TetrominoType::Z,
    ];

    /// Occupied offsets for the given rotation. Any index is accepted and
    /// reduced modulo 4.
    pub fn cells(self, rotation: usize) -> &'static [(i16, i16); 4] {
        let shapes = match self {
            TetrominoType::I => &I_SHAPES,
            TetrominoType::J => &J_SHAPES,
            TetrominoType::L => &L_SHAPES,
            TetrominoType::O => &O_SHAPES,
            TetrominoType::S => &S_SHAPES,
            TetrominoType::T => &T_SHAPES,
            TetrominoType::Z => &Z_SHAPES,
        };
        &shapes[rotation % ROTATION_COUNT]
    }

    /// Side length of the square bounding box the rotation tables live in.
    pub fn box_size(self) -> i16 {
        match self {
            TetrominoType::I => 4,
            TetrominoType::O => 2,
            _ => 3,
        }
    }

    /// Leftmost anchor column that centres the bounding box on the field.
    pub fn spawn_column(self) -> i16 {
        (GRID_WIDTH as i16 - self.box_size()) / 2
    }
}

/// The falling piece: a type, a rotation state and an anchor on the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tetromino {
    pub tetromino_type: TetrominoType,
    pub position: Position,
    pub rotation: usize,
}

impl Tetromino {
    /// A piece at its spawn point: top-centre, rotation 0.
    pub fn spawn(tetromino_type: TetrominoType) -> Self {
        Self::new_at(tetromino_type, tetromino_type.spawn_column(), SPAWN_ROW)
    }

    pub fn new_at(tetromino_type: TetrominoType, x: i16, y: i16) -> Self {
        Self {
            tetromino_type,
            position: Position { x, y },
            rotation: 0,
        }
    }

    pub fn blocks(&self) -> [Position; 4] {
        let cells = *self.tetromino_type.cells(self.rotation);
        cells.map(|(dx, dy)| Position {
            x: self.position.x + dx,
            y: self.position.y + dy,
        })
    }

    pub(crate) fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % ROTATION_COUNT,
            ..*self
        }
    }

    pub(crate) fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn offset_set(t: TetrominoType, rotation: usize) -> HashSet<(i16, i16)> {
        t.cells(rotation).iter().copied().collect()
    }

    #[test]
    fn every_rotation_has_four_distinct_cells_inside_its_box() {
        for t in TetrominoType::ALL {
            for r in 0..ROTATION_COUNT {
                let cells = offset_set(t, r);
                assert_eq!(cells.len(), 4, "{t:?} rotation {r}");
                for (x, y) in cells {
                    assert!((0..t.box_size()).contains(&x));
                    assert!((0..t.box_size()).contains(&y));
                }
            }
        }
    }

    #[test]
    fn o_piece_is_identical_in_every_rotation() {
        let first = offset_set(TetrominoType::O, 0);
        for r in 1..ROTATION_COUNT {
            assert_eq!(offset_set(TetrominoType::O, r), first);
        }
    }

    #[test]
    fn rotation_tables_are_clockwise_quarter_turns() {
        for t in TetrominoType::ALL {
            let n = t.box_size() - 1;
            for r in 0..ROTATION_COUNT {
                let turned: HashSet<(i16, i16)> = t
                    .cells(r)
                    .iter()
                    .map(|&(x, y)| (n - y, x))
                    .collect();
                assert_eq!(turned, offset_set(t, r + 1), "{t:?} rotation {r}");
            }
        }
    }

    #[test]
    fn rotation_index_wraps() {
        for t in TetrominoType::ALL {
            assert_eq!(t.cells(0), t.cells(4));
            assert_eq!(t.cells(3), t.cells(7));
        }
    }

    #[test]
    fn spawn_is_centred_on_hidden_row() {
        assert_eq!(Tetromino::spawn(TetrominoType::O).position, Position { x: 4, y: SPAWN_ROW });
        assert_eq!(Tetromino::spawn(TetrominoType::I).position, Position { x: 3, y: SPAWN_ROW });
        assert_eq!(Tetromino::spawn(TetrominoType::T).position, Position { x: 3, y: SPAWN_ROW });
    }

    #[test]
    fn spawned_pieces_reach_row_zero() {
        for t in TetrominoType::ALL {
            let lowest = Tetromino::spawn(t).blocks().iter().map(|b| b.y).max();
            assert_eq!(lowest, Some(0), "{t:?}");
        }
    }
}
