//! Team identification and per-team data storage.
//!
//! ## Team
//!
//! The game always has exactly two sides: red (index 0) and blue (index 1).
//!
//! ## TeamPair
//!
//! Fixed-size per-team storage indexed by `Team` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    Red = 0,
    Blue = 1,
}

impl Team {
    /// Both teams in index order.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// Team from its 0-based index as used by map files.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Team::Red),
            1 => Some(Team::Blue),
            _ => None,
        }
    }

    /// The 0-based team index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The other team.
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Single-letter mark used by the board renderer.
    #[must_use]
    pub const fn mark(self) -> char {
        match self {
            Team::Red => 'R',
            Team::Blue => 'B',
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Red => write!(f, "red"),
            Team::Blue => write!(f, "blue"),
        }
    }
}

/// Per-team data storage.
///
/// ```
/// use grid_tactics::core::{Team, TeamPair};
///
/// let mut alive: TeamPair<u32> = TeamPair::splat(3);
/// alive[Team::Blue] -= 1;
/// assert_eq!(alive[Team::Red], 3);
/// assert_eq!(alive[Team::Blue], 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamPair<T> {
    data: [T; 2],
}

impl<T> TeamPair<T> {
    /// Create from explicit red and blue values.
    #[must_use]
    pub const fn new(red: T, blue: T) -> Self {
        Self { data: [red, blue] }
    }

    /// Create with a factory function.
    pub fn from_fn(mut f: impl FnMut(Team) -> T) -> Self {
        Self {
            data: [f(Team::Red), f(Team::Blue)],
        }
    }

    /// Iterate over (team, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.data.iter())
    }

    /// Map each entry to a new value.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> TeamPair<U> {
        TeamPair {
            data: [f(&self.data[0]), f(&self.data[1])],
        }
    }
}

impl<T: Clone> TeamPair<T> {
    /// Create with every entry set to `value`.
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self {
            data: [value.clone(), value],
        }
    }
}

impl<T> Index<Team> for TeamPair<T> {
    type Output = T;

    #[inline]
    fn index(&self, team: Team) -> &T {
        &self.data[team.index()]
    }
}

impl<T> IndexMut<Team> for TeamPair<T> {
    #[inline]
    fn index_mut(&mut self, team: Team) -> &mut T {
        &mut self.data[team.index()]
    }
}
