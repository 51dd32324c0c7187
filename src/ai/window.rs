use crate::game::{Board, Cell, WIN_LENGTH};

/// The four line directions a window can run along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Bottom-left to top-right (/)
    DiagonalUp,
    /// Top-left to bottom-right (\)
    DiagonalDown,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalUp,
        Direction::DiagonalDown,
    ];

    /// Row and column step between consecutive cells.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalUp => (1, 1),
            Direction::DiagonalDown => (-1, 1),
        }
    }
}

/// `WIN_LENGTH` consecutive cells sampled along one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub origin_row: usize,
    pub origin_col: usize,
    pub direction: Direction,
    pub cells: [Cell; WIN_LENGTH],
}

impl Window {
    /// Board coordinate `(row, col)` of the `i`-th cell.
    pub fn cell_position(&self, i: usize) -> (usize, usize) {
        let (dr, dc) = self.direction.step();
        let row = self.origin_row as isize + dr * i as isize;
        let col = self.origin_col as isize + dc * i as isize;
        (row as usize, col as usize)
    }

    /// Number of cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Index of the first empty cell.
    pub fn first_empty(&self) -> Option<usize> {
        self.cells.iter().position(|&c| c == Cell::Empty)
    }

    /// True when `len` copies of `cell` sit next to each other in the window.
    pub fn has_run(&self, cell: Cell, len: usize) -> bool {
        len > 0 && self.cells.windows(len).any(|run| run.iter().all(|&c| c == cell))
    }

    pub fn is_vertical(&self) -> bool {
        self.direction == Direction::Vertical
    }
}

/// All windows on `board`: horizontal, vertical, then both diagonals.
pub fn windows(board: &Board) -> impl Iterator<Item = Window> + '_ {
    Direction::ALL
        .into_iter()
        .flat_map(move |direction| windows_along(board, direction))
}

/// Windows running along one direction, ordered by origin row then column.
pub fn windows_along(board: &Board, direction: Direction) -> impl Iterator<Item = Window> + '_ {
    let (dr, dc) = direction.step();
    let rows = board.rows() as isize;
    let cols = board.columns() as isize;
    let span = WIN_LENGTH as isize - 1;

    (0..rows)
        .flat_map(move |r| (0..cols).map(move |c| (r, c)))
        .filter(move |&(r, c)| {
            let end_r = r + dr * span;
            let end_c = c + dc * span;
            (0..rows).contains(&end_r) && (0..cols).contains(&end_c)
        })
        .map(move |(r, c)| {
            let mut cells = [Cell::Empty; WIN_LENGTH];
            for (i, cell) in cells.iter_mut().enumerate() {
                let i = i as isize;
                *cell = board.get((r + dr * i) as usize, (c + dc * i) as usize);
            }
            Window {
                origin_row: r as usize,
                origin_col: c as usize,
                direction,
                cells,
            }
        })
}
