//! Grid coordinates and cell sets.

use serde::{Deserialize, Serialize};

/// A cell coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    /// Offsets of the orthogonal neighbourhood.
    pub const DIRECTIONS: [(i8, i8); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Manhattan distance.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Pos) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Whether `other` is one orthogonal step away.
    #[inline]
    #[must_use]
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.distance(other) == 1
    }

    /// Cell shifted by `(dx, dy)`, or `None` when it would leave `u8` space.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Pos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }

    /// The orthogonal neighbours that stay inside a `width` x `height` grid.
    pub fn neighbors(self, width: u8, height: u8) -> impl Iterator<Item = Pos> {
        Self::DIRECTIONS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
            .filter(move |p| p.x < width && p.y < height)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Boolean matrix over the board, used for reachable and attackable cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSet {
    width: u8,
    height: u8,
    cells: Vec<bool>,
}

impl CellSet {
    /// Empty set for a `width` x `height` grid.
    #[must_use]
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![false; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    fn index(&self, pos: Pos) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height)
            .then(|| usize::from(pos.y) * usize::from(self.width) + usize::from(pos.x))
    }

    /// Whether `pos` is in the set. Out-of-grid cells never are.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).map_or(false, |i| self.cells[i])
    }

    /// Add `pos`; out-of-grid cells are ignored.
    #[inline]
    pub fn insert(&mut self, pos: Pos) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = true;
        }
    }

    /// Remove `pos`.
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = false;
        }
    }

    /// Number of cells in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Cells in row-major scan order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = usize::from(self.width.max(1));
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(move |(i, _)| Pos::new((i % width) as u8, (i / width) as u8))
    }
}
