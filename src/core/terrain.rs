//! Terrain types and their defensive value.
//!
//! Terrain codes match the map file format: `MAP[1,1,3,...]` lists one code
//! per cell. Barrier cells usually frame the playable area and are
//! impassable for every unit type.

use serde::{Deserialize, Serialize};

/// Terrain of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Barrier = 0,
    #[default]
    Plain = 1,
    Sea = 2,
    Forest = 3,
    Mountain = 4,
    Road = 5,
    Castle = 6,
}

impl Terrain {
    /// All terrain kinds in code order.
    pub const ALL: [Terrain; 7] = [
        Terrain::Barrier,
        Terrain::Plain,
        Terrain::Sea,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Road,
        Terrain::Castle,
    ];

    /// Number of terrain kinds.
    pub const COUNT: usize = 7;

    /// Parse a map-file terrain code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Terrain::Barrier),
            1 => Some(Terrain::Plain),
            2 => Some(Terrain::Sea),
            3 => Some(Terrain::Forest),
            4 => Some(Terrain::Mountain),
            5 => Some(Terrain::Road),
            6 => Some(Terrain::Castle),
            _ => None,
        }
    }

    /// The map-file terrain code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Defense bonus ("stars") granted to ground units standing here.
    #[inline]
    #[must_use]
    pub const fn stars(self) -> u32 {
        match self {
            Terrain::Barrier | Terrain::Sea | Terrain::Road => 0,
            Terrain::Plain => 1,
            Terrain::Forest => 3,
            Terrain::Mountain | Terrain::Castle => 4,
        }
    }
}
