//! Static unit-type data.
//!
//! Every unit kind has one immutable [`UnitSpec`]: movement points, attack
//! range, melee/ranged and air flags. Attack power and movement cost are
//! lookup tables indexed by unit type (and defender type or terrain).
//!
//! ## Tables
//!
//! | kind | mark | move | range | direct | air |
//! |---|---|---|---|---|---|
//! | Fighter | F | 9 | 0..=1 | yes | yes |
//! | Attacker | A | 7 | 0..=1 | yes | yes |
//! | Panzer | P | 6 | 0..=1 | yes | no |
//! | Cannon | U | 5 | 2..=3 | no | no |
//! | AntiAir | R | 6 | 0..=1 | yes | no |
//! | Infantry | I | 3 | 0..=1 | yes | no |

use serde::{Deserialize, Serialize};

use super::terrain::Terrain;

/// Kind of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitType {
    Fighter = 0,
    Attacker = 1,
    Panzer = 2,
    Cannon = 3,
    AntiAir = 4,
    Infantry = 5,
}

/// Immutable per-kind data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSpec {
    pub name: &'static str,
    pub mark: char,
    pub movement: u32,
    pub min_range: u32,
    pub max_range: u32,
    /// Melee unit: must stand next to the target and can be countered.
    pub is_direct: bool,
    /// Air unit: ignores terrain defense.
    pub is_air: bool,
}

/// Impassable marker inside the movement table.
const NO: u8 = u8::MAX;

const SPECS: [UnitSpec; UnitType::COUNT] = [
    UnitSpec { name: "fighter", mark: 'F', movement: 9, min_range: 0, max_range: 1, is_direct: true, is_air: true },
    UnitSpec { name: "attacker", mark: 'A', movement: 7, min_range: 0, max_range: 1, is_direct: true, is_air: true },
    UnitSpec { name: "panzer", mark: 'P', movement: 6, min_range: 0, max_range: 1, is_direct: true, is_air: false },
    UnitSpec { name: "cannon", mark: 'U', movement: 5, min_range: 2, max_range: 3, is_direct: false, is_air: false },
    UnitSpec { name: "antiair", mark: 'R', movement: 6, min_range: 0, max_range: 1, is_direct: true, is_air: false },
    UnitSpec { name: "infantry", mark: 'I', movement: 3, min_range: 0, max_range: 1, is_direct: true, is_air: false },
];

/// Attack power, row = attacker, column = defender.
const ATTACK_POWER: [[u32; UnitType::COUNT]; UnitType::COUNT] = [
    [55, 65, 0, 0, 0, 0],
    [0, 0, 105, 105, 85, 115],
    [0, 0, 55, 70, 75, 75],
    [0, 0, 60, 75, 65, 90],
    [70, 70, 15, 50, 45, 105],
    [0, 0, 5, 10, 3, 55],
];

/// Movement cost, row = unit type, column = terrain code.
const MOVE_COST: [[u8; Terrain::COUNT]; UnitType::COUNT] = [
    [NO, 1, 1, 1, 1, 1, 1],
    [NO, 1, 1, 1, 1, 1, 1],
    [NO, 1, NO, 2, NO, 1, 1],
    [NO, 1, NO, 2, NO, 1, 1],
    [NO, 1, NO, 2, NO, 1, 1],
    [NO, 1, NO, 1, 2, 1, 1],
];

impl UnitType {
    /// All unit types in index order.
    pub const ALL: [UnitType; 6] = [
        UnitType::Fighter,
        UnitType::Attacker,
        UnitType::Panzer,
        UnitType::Cannon,
        UnitType::AntiAir,
        UnitType::Infantry,
    ];

    /// Number of unit types.
    pub const COUNT: usize = 6;

    /// The 0-based table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static data for this kind.
    #[inline]
    #[must_use]
    pub const fn spec(self) -> &'static UnitSpec {
        &SPECS[self as usize]
    }

    /// Parse a unit type from its long name or its single-letter mark.
    ///
    /// Matching is case-insensitive: `"Infantry"`, `"infantry"` and `"I"`
    /// all name the same type.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c.to_ascii_uppercase()),
            _ => None,
        };
        Self::ALL.into_iter().find(|t| {
            let spec = t.spec();
            spec.name.eq_ignore_ascii_case(name) || single == Some(spec.mark)
        })
    }

    /// Attack power of `self` against `defender`.
    #[inline]
    #[must_use]
    pub const fn attack_power(self, defender: UnitType) -> u32 {
        ATTACK_POWER[self as usize][defender as usize]
    }

    /// Movement points spent entering `terrain`, or `None` if impassable.
    #[inline]
    #[must_use]
    pub const fn move_cost(self, terrain: Terrain) -> Option<u32> {
        let cost = MOVE_COST[self as usize][terrain as usize];
        if cost == NO {
            None
        } else {
            Some(cost as u32)
        }
    }

    /// Whether this kind can attack `defender` at all.
    #[inline]
    #[must_use]
    pub const fn can_attack(self, defender: UnitType) -> bool {
        self.attack_power(defender) > 0
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().name)
    }
}
