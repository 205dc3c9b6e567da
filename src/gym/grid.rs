use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use rand::Rng;

use crate::error::{Error, Result};

use super::Action;

/// A single square of the grid world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Start,
    Goal,
    Hazard,
}

impl Cell {
    /// Parse a layout character
    ///
    /// Unknown characters are treated as [`Cell::Empty`].
    pub fn from_symbol(c: char) -> Self {
        match c {
            'W' => Cell::Wall,
            'S' => Cell::Start,
            'G' => Cell::Goal,
            'H' => Cell::Hazard,
            _ => Cell::Empty,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => 'E',
            Cell::Wall => 'W',
            Cell::Start => 'S',
            Cell::Goal => 'G',
            Cell::Hazard => 'H',
        }
    }

    /// Whether entering this cell ends the episode
    pub fn is_terminal(self) -> bool {
        matches!(self, Cell::Goal | Cell::Hazard)
    }
}

/// Grid coordinate, `x` is the column and `y` the row (row 0 is the top)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// A rectangular layout of [cells](Cell) stored in row-major order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Side length of generated and demo maps
    pub const DEFAULT_SIZE: usize = 10;

    /// Construct a grid of empty cells
    ///
    /// **Panics** if `width` or `height` is zero
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "Grid dimensions must be nonzero, got {width}x{height}."
        );
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Build a grid from layout rows, one character per cell
    ///
    /// See [`Cell::from_symbol`] for the character set. Every row must have the
    /// same nonzero length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::EmptyLayout);
        };
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(Error::EmptyLayout);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            cells.extend(line.as_ref().chars().map(Cell::from_symbol));
            let got = cells.len() - before;
            if got != width {
                return Err(Error::RaggedLayout {
                    row,
                    expected: width,
                    got,
                });
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// The default playground: start in the top-left corner, goal in the
    /// bottom-right, a hazard and a wall in the middle, and roughly one in ten
    /// of the remaining cells turned into hazards
    pub fn demo<R: Rng>(rng: &mut R) -> Self {
        let size = Self::DEFAULT_SIZE;
        let start = Pos::new(0, 0);
        let goal = Pos::new(size - 1, size - 1);

        let mut grid = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let pos = Pos::new(x, y);
                grid[pos] = if pos == start {
                    Cell::Start
                } else if pos == goal {
                    Cell::Goal
                } else if pos == Pos::new(4, 4) {
                    Cell::Hazard
                } else if pos == Pos::new(5, 5) {
                    Cell::Wall
                } else if rng.gen_bool(0.1) {
                    Cell::Hazard
                } else {
                    Cell::Empty
                };
            }
        }

        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Get the cell at `pos`, or `None` if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index_of(pos)])
    }

    /// Row-major index of an in-bounds position
    pub(crate) fn index_of(&self, pos: Pos) -> usize {
        pos.y * self.width + pos.x
    }

    /// Iterate over every cell with its position in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Pos::new(i % self.width, i / self.width), cell))
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Location of the start cell
    ///
    /// The first start cell in row-major order wins; a grid without one starts
    /// at `(0, 0)`.
    pub fn start(&self) -> Pos {
        self.iter()
            .find(|&(_, cell)| cell == Cell::Start)
            .map(|(pos, _)| pos)
            .unwrap_or_default()
    }

    /// Move one cell from `pos` in the direction of `action`, staying inside
    /// the grid bounds
    pub fn neighbor(&self, pos: Pos, action: Action) -> Pos {
        match action {
            Action::Up => Pos::new(pos.x, pos.y.saturating_sub(1)),
            Action::Right => Pos::new((pos.x + 1).min(self.width - 1), pos.y),
            Action::Down => Pos::new(pos.x, (pos.y + 1).min(self.height - 1)),
            Action::Left => Pos::new(pos.x.saturating_sub(1), pos.y),
        }
    }
}

impl Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[self.index_of(pos)]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        let i = self.index_of(pos);
        &mut self.cells[i]
    }
}

impl FromStr for Grid {
    type Err = Error;

    /// Parse newline-separated layout rows, ignoring blank lines and
    /// surrounding whitespace
    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        Self::from_rows(&rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.width).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}
