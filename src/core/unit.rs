//! Unit identifiers and per-instance unit state.

use serde::{Deserialize, Serialize};

use super::grid::Pos;
use super::spec::{UnitSpec, UnitType};
use super::team::Team;

/// Maximum hit points of any unit.
pub const MAX_HP: u8 = 10;

/// Stable unit identifier, an index into the board's unit slots.
///
/// Ids are assigned in load order and never reused within one game, so a
/// destroyed unit's id stays vacant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u16);

impl UnitId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit on the board.
///
/// `Copy` so that undo records can keep a full snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitType,
    pub team: Team,
    pub pos: Pos,
    pub hp: u8,
    /// Has this unit already acted during its team's current turn?
    pub acted: bool,
}

impl Unit {
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &'static UnitSpec {
        self.kind.spec()
    }

    #[inline]
    #[must_use]
    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.team != other.team
    }

    /// Short form such as `R-I10#3(2,2)`.
    #[must_use]
    pub fn short_string(&self) -> String {
        format!(
            "{}-{}{:02}{}{}",
            self.team.mark(),
            self.spec().mark,
            self.hp,
            self.id,
            self.pos
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string() {
        let unit = Unit {
            id: UnitId::new(3),
            kind: UnitType::Infantry,
            team: Team::Red,
            pos: Pos::new(2, 2),
            hp: 10,
            acted: false,
        };
        assert_eq!(unit.short_string(), "R-I10#3(2,2)");
    }

    #[test]
    fn test_is_enemy_of() {
        let a = Unit {
            id: UnitId::new(0),
            kind: UnitType::Panzer,
            team: Team::Red,
            pos: Pos::new(1, 1),
            hp: 10,
            acted: false,
        };
        let mut b = a;
        b.id = UnitId::new(1);
        assert!(!a.is_enemy_of(&b));
        b.team = Team::Blue;
        assert!(a.is_enemy_of(&b));
    }
}
