use crate::error::GameError;
use crate::tetromino::{Position, TetrominoType};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 20;
/// Spawn band above the visible field, stored in the same row vector.
pub const HIDDEN_ROWS: usize = 1;

const TOTAL_ROWS: usize = GRID_HEIGHT + HIDDEN_ROWS;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl CellState {
    pub fn is_filled(self) -> bool {
        self != CellState::Empty
    }
}

pub type Row = [CellState; GRID_WIDTH];

const EMPTY_ROW: Row = [CellState::Empty; GRID_WIDTH];

/// The playfield. Rows are addressed with visible coordinates: `0..GRID_HEIGHT`
/// are on screen, `-HIDDEN_ROWS..0` are the spawn band.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: vec![EMPTY_ROW; TOTAL_ROWS],
        }
    }

    /// Builds a grid from the visible rows, top to bottom. The spawn band
    /// starts empty.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Result<Self, GameError> {
        if rows.len() != GRID_HEIGHT {
            return Err(GameError::GridDimensions {
                width: rows.first().map_or(0, Vec::len),
                height: rows.len(),
            });
        }

        let mut grid = Self::new();
        for (dst, src) in grid.rows[HIDDEN_ROWS..].iter_mut().zip(&rows) {
            *dst = src.as_slice().try_into().map_err(|_| GameError::GridDimensions {
                width: src.len(),
                height: rows.len(),
            })?;
        }
        Ok(grid)
    }

    fn index(x: i16, y: i16) -> Option<(usize, usize)> {
        let row = y + HIDDEN_ROWS as i16;
        if x < 0 || x >= GRID_WIDTH as i16 || row < 0 || row >= TOTAL_ROWS as i16 {
            return None;
        }
        Some((row as usize, x as usize))
    }

    /// Cell at a grid coordinate, `None` outside the field.
    pub fn get(&self, pos: Position) -> Option<CellState> {
        Self::index(pos.x, pos.y).map(|(row, col)| self.rows[row][col])
    }

    /// True if the coordinate is inside the field and unoccupied.
    pub fn is_free(&self, pos: Position) -> bool {
        self.get(pos) == Some(CellState::Empty)
    }

    /// Writes a cell. Coordinates outside the field are ignored.
    pub fn set(&mut self, pos: Position, cell: CellState) {
        if let Some((row, col)) = Self::index(pos.x, pos.y) {
            self.rows[row][col] = cell;
        }
    }

    pub fn visible_rows(&self) -> &[Row] {
        &self.rows[HIDDEN_ROWS..]
    }

    /// Visible row `y`, top to bottom.
    pub fn row(&self, y: usize) -> &Row {
        &self.visible_rows()[y]
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| cell.is_filled())
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.row(y).iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    /// Removes every fully occupied visible row, lets the rows above (spawn
    /// band included) fall into the gap and refills the top with empty rows.
    /// Returns the number removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut visible = self.rows.split_off(HIDDEN_ROWS);
        visible.retain(|row| !row.iter().all(|cell| cell.is_filled()));
        let cleared = GRID_HEIGHT - visible.len();

        let mut rows = Vec::with_capacity(TOTAL_ROWS);
        rows.resize(cleared, EMPTY_ROW);
        rows.append(&mut self.rows);
        rows.append(&mut visible);
        self.rows = rows;
        cleared as u32
    }
}
