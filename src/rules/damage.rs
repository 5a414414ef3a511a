//! Combat resolution.
//!
//! `dealt = (power * attacker_hp + 70) / (100 + stars * defender_hp)`,
//! clamped to the defender's hp. `stars` is the defender's terrain defense
//! (0 for air units). Zero attack power always yields 0 because the
//! constant term stays below the divisor.
//!
//! The defender strikes back with the same formula, using its reduced hp
//! and the attacker's terrain at the attack cell, only when it survives and
//! both units are melee units.

use crate::core::{Board, Damage, Pos, Unit};

/// Raw damage formula.
#[inline]
#[must_use]
pub fn damage_formula(power: u32, attacker_hp: u8, defender_stars: u32, defender_hp: u8) -> u8 {
    let raw = (power * u32::from(attacker_hp) + 70) / (100 + defender_stars * u32::from(defender_hp));
    // bounded by defender_hp, which fits in u8
    raw.min(u32::from(defender_hp)) as u8
}

/// Damage and counter-damage for `attacker` striking `defender` from `attack_cell`.
#[must_use]
pub fn resolve_damage(board: &Board, attacker: &Unit, defender: &Unit, attack_cell: Pos) -> Damage {
    let dealt = damage_formula(
        attacker.kind.attack_power(defender.kind),
        attacker.hp,
        board.defense_stars(defender),
        defender.hp,
    );

    let survivor_hp = defender.hp - dealt;
    let counter = if survivor_hp > 0 && attacker.spec().is_direct && defender.spec().is_direct {
        damage_formula(
            defender.kind.attack_power(attacker.kind),
            survivor_hp,
            board.stars_at(attacker.kind, attack_cell),
            attacker.hp,
        )
    } else {
        0
    };

    Damage { dealt, counter }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Team, Terrain, UnitType};

    fn duel(attacker: UnitType, defender: UnitType, terrain: Terrain) -> (Board, Unit, Unit) {
        let board_terrain = vec![Terrain::Plain, terrain];
        let mut board = Board::with_terrain(2, 1, board_terrain).unwrap();
        let a = board.spawn_unit(attacker, Team::Red, Pos::new(0, 0), 10).unwrap();
        let d = board.spawn_unit(defender, Team::Blue, Pos::new(1, 0), 10).unwrap();
        let (a, d) = (*board.unit(a).unwrap(), *board.unit(d).unwrap());
        (board, a, d)
    }

    #[test]
    fn test_infantry_on_plain() {
        let (board, a, d) = duel(UnitType::Infantry, UnitType::Infantry, Terrain::Plain);
        let dmg = resolve_damage(&board, &a, &d, a.pos);

        // (55*10 + 70) / (100 + 1*10) = 5, counter (55*5 + 70) / 110 = 3
        assert_eq!(dmg, Damage { dealt: 5, counter: 3 });
    }

    #[test]
    fn test_terrain_reduces_damage() {
        let (board, a, d) = duel(UnitType::Panzer, UnitType::Infantry, Terrain::Mountain);
        let dmg = resolve_damage(&board, &a, &d, a.pos);

        // (75*10 + 70) / (100 + 4*10) = 5
        assert_eq!(dmg.dealt, 5);
    }

    #[test]
    fn test_air_defender_ignores_terrain() {
        let (board, a, d) = duel(UnitType::AntiAir, UnitType::Attacker, Terrain::Mountain);
        let dmg = resolve_damage(&board, &a, &d, a.pos);

        // (70*10 + 70) / 100 = 7, counter (85*3 + 70) / (100 + 1*10) = 2
        assert_eq!(dmg, Damage { dealt: 7, counter: 2 });
    }

    #[test]
    fn test_zero_power() {
        let (board, a, d) = duel(UnitType::Panzer, UnitType::Fighter, Terrain::Plain);
        let dmg = resolve_damage(&board, &a, &d, a.pos);
        assert_eq!(dmg.dealt, 0);
        // Fighter cannot hurt a panzer either
        assert_eq!(dmg.counter, 0);
    }

    #[test]
    fn test_ranged_gets_no_counter() {
        let mut board = Board::new(4, 1).unwrap();
        let c = board.spawn_unit(UnitType::Cannon, Team::Red, Pos::new(0, 0), 10).unwrap();
        let i = board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(2, 0), 10).unwrap();
        let (c, i) = (*board.unit(c).unwrap(), *board.unit(i).unwrap());

        let dmg = resolve_damage(&board, &c, &i, c.pos);
        assert!(dmg.dealt > 0);
        assert_eq!(dmg.counter, 0);
    }

    #[test]
    fn test_clamped_to_hp() {
        assert_eq!(damage_formula(115, 10, 0, 3), 3);
        assert_eq!(damage_formula(115, 10, 0, 10), 10);
    }

    #[test]
    fn test_kill_means_no_counter() {
        let mut board = Board::new(2, 1).unwrap();
        let a = board.spawn_unit(UnitType::Attacker, Team::Red, Pos::new(0, 0), 10).unwrap();
        let i = board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(1, 0), 2).unwrap();
        let (a, i) = (*board.unit(a).unwrap(), *board.unit(i).unwrap());

        let dmg = resolve_damage(&board, &a, &i, a.pos);
        assert_eq!(dmg.dealt, 2);
        assert_eq!(dmg.counter, 0);
    }
}
