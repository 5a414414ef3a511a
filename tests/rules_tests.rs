//! Rules integration tests: legal actions, combat, terminal detection and
//! the map format.

use std::collections::VecDeque;

use proptest::prelude::*;

use grid_tactics::core::{Action, Board, MapError, Pos, Team, Terrain, UnitId, UnitType};
use grid_tactics::rules::{
    apply, damage_formula, is_legal, legal_actions, outcome, resolve_damage, team_actions, validate, GameResult,
};

const SKIRMISH: &str = include_str!("../maps/skirmish.map");

// =============================================================================
// Helpers
// =============================================================================

fn infantry_pair() -> (Board, UnitId, UnitId) {
    let mut board = Board::new(6, 6).unwrap();
    let red = board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(2, 2), 10).unwrap();
    let blue = board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(2, 3), 10).unwrap();
    (board, red, blue)
}

/// Plain-board cells within `budget` steps of `from`, walking around `blocked`.
fn plain_reach(width: u8, height: u8, from: Pos, budget: u32, blocked: Pos) -> Vec<Pos> {
    let mut dist = vec![None; usize::from(width) * usize::from(height)];
    let index = |p: Pos| usize::from(p.y) * usize::from(width) + usize::from(p.x);
    let mut queue = VecDeque::from([from]);
    dist[index(from)] = Some(0);
    while let Some(pos) = queue.pop_front() {
        let d = dist[index(pos)].unwrap();
        if d == budget {
            continue;
        }
        for next in pos.neighbors(width, height) {
            if next != blocked && dist[index(next)].is_none() {
                dist[index(next)] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    let mut cells = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let pos = Pos::new(x, y);
            if dist[index(pos)].is_some() {
                cells.push(pos);
            }
        }
    }
    cells
}

// =============================================================================
// Scenario
// =============================================================================

#[test]
fn test_adjacent_infantry_actions() {
    let (board, red, blue) = infantry_pair();
    let actions = legal_actions(&board, red);

    let attacks: Vec<&Action> = actions.iter().filter(|a| matches!(a, Action::Attack { .. })).collect();
    assert_eq!(attacks.len(), 1);
    let Action::Attack { target, to, .. } = *attacks[0] else {
        unreachable!()
    };
    assert_eq!(target, blue);
    let attacker = board.unit(red).unwrap();
    let defender = board.unit(blue).unwrap();
    assert!(resolve_damage(&board, attacker, defender, to).dealt > 0);

    let mut moves: Vec<Pos> = actions
        .iter()
        .filter_map(|a| match *a {
            Action::Move { to, .. } => Some(to),
            _ => None,
        })
        .collect();
    moves.sort_by_key(|p| (p.y, p.x));
    let expected = plain_reach(6, 6, Pos::new(2, 2), UnitType::Infantry.spec().movement, Pos::new(2, 3));
    assert_eq!(moves, expected);
    assert!(!moves.contains(&Pos::new(2, 4)), "enemy cell blocks the straight path");
}

#[test]
fn test_attack_applies_predicted_damage() {
    let (mut board, red, blue) = infantry_pair();
    let action = Action::attack(Team::Red, red, Pos::new(2, 2), blue);
    let predicted = resolve_damage(&board, board.unit(red).unwrap(), board.unit(blue).unwrap(), Pos::new(2, 2));

    let record = apply(&mut board, &action).unwrap();
    assert_eq!(record.damage(), Some(predicted));
    assert_eq!(board.unit(blue).unwrap().hp, 10 - predicted.dealt);
    assert_eq!(board.unit(red).unwrap().hp, 10 - predicted.counter);
    assert!(board.is_consistent());
    assert_eq!(board.to_move(), Team::Blue);
}

#[test]
fn test_destroyed_unit_leaves_board() {
    let mut board = Board::new(6, 6).unwrap();
    let red = board.spawn_unit(UnitType::Panzer, Team::Red, Pos::new(2, 2), 10).unwrap();
    let blue = board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(2, 3), 1).unwrap();

    let record = apply(&mut board, &Action::attack(Team::Red, red, Pos::new(2, 2), blue)).unwrap();
    assert!(record.killed_target());
    assert!(board.unit_at(Pos::new(2, 3)).is_none());
    assert!(board.unit(blue).is_none());
    assert_eq!(board.alive_count(Team::Blue), 0);
    assert_eq!(outcome(&board), Some(GameResult::Winner(Team::Red)));
}

#[test]
fn test_off_turn_and_acted_units_rejected() {
    let (mut board, red, blue) = infantry_pair();
    board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(5, 5), 10).unwrap();
    assert!(!is_legal(&board, Team::Blue, &Action::move_to(Team::Blue, blue, Pos::new(2, 4))));
    assert!(team_actions(&board, Team::Blue).is_empty());

    apply(&mut board, &Action::move_to(Team::Red, red, Pos::new(1, 2))).unwrap();
    assert_eq!(board.to_move(), Team::Red);
    assert!(validate(&board, Team::Red, &Action::move_to(Team::Red, red, Pos::new(0, 2))).is_err());
    assert!(legal_actions(&board, red).is_empty());
}

// =============================================================================
// Terminal detection
// =============================================================================

#[test]
fn test_annihilation_ignores_turn_count() {
    let mut board = Board::new(4, 4).unwrap().with_turn_limit(0).with_hp_threshold(50);
    board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 2).unwrap();
    assert_eq!(outcome(&board), Some(GameResult::Winner(Team::Red)));
}

#[test]
fn test_turn_limit_draw_under_threshold() {
    let mut board = Board::new(4, 4).unwrap().with_turn_limit(0).with_hp_threshold(5);
    board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
    board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 3), 6).unwrap();
    assert_eq!(board.turn_count(), board.turn_limit());
    assert_eq!(outcome(&board), Some(GameResult::Draw));

    let mut board = Board::new(4, 4).unwrap().with_turn_limit(0).with_hp_threshold(5);
    board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
    board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 3), 4).unwrap();
    assert_eq!(outcome(&board), Some(GameResult::Winner(Team::Red)));
}

#[test]
fn test_turn_limit_reached_by_play() {
    let mut board = Board::new(4, 4).unwrap().with_turn_limit(2);
    board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
    board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 3), 10).unwrap();

    let mut steps = 0;
    while outcome(&board).is_none() {
        let team = board.to_move();
        apply(&mut board, &Action::turn_end(team)).unwrap();
        steps += 1;
        assert!(steps < 10, "turn limit never reached");
    }
    assert!(board.turn_count() >= board.turn_limit());
    assert_eq!(outcome(&board), Some(GameResult::Draw));
}

// =============================================================================
// Map format
// =============================================================================

#[test]
fn test_map_round_trip() {
    let board = Board::from_map_str(SKIRMISH).unwrap();
    assert_eq!((board.width(), board.height()), (8, 6));
    assert_eq!(board.turn_limit(), 20);
    assert_eq!(board.alive_count(Team::Red), 3);
    assert_eq!(board.alive_count(Team::Blue), 3);
    assert_eq!(board.terrain_at(Pos::new(7, 0)), Terrain::Castle);

    let again = Board::from_map_str(&board.to_map_string()).unwrap();
    assert_eq!(again, board);
}

#[test]
fn test_map_rejects_unknown_terrain() {
    let text = "SIZEX[2];SIZEY[1];TURNLIMIT[5];HPTHRESHOLD[0];UNITNUMRED[0];UNITNUMBLUE[0];MAP[1,9];";
    assert!(matches!(Board::from_map_str(text), Err(MapError::UnknownTerrain(9))));
}

// =============================================================================
// Properties
// =============================================================================

fn arb_board() -> impl Strategy<Value = Board> {
    (3usize..7, 3usize..7).prop_flat_map(|(w, h)| {
        (
            prop::collection::vec(0u8..7, w * h),
            prop::collection::vec((0usize..6, any::<bool>(), 0..w, 0..h, 1u8..=10), 2..8),
        )
            .prop_map(move |(codes, units)| {
                let terrain = codes.into_iter().filter_map(Terrain::from_code).collect();
                let mut board = Board::with_terrain(w, h, terrain).unwrap();
                for (kind, blue, x, y, hp) in units {
                    let team = if blue { Team::Blue } else { Team::Red };
                    // collisions are skipped
                    let _ = board.spawn_unit(UnitType::ALL[kind], team, Pos::new(x as u8, y as u8), hp);
                }
                board
            })
    })
}

proptest! {
    #[test]
    fn prop_generated_actions_validate(board in arb_board()) {
        for action in team_actions(&board, board.to_move()) {
            prop_assert!(validate(&board, board.to_move(), &action).is_ok(), "{action}");
        }
    }

    #[test]
    fn prop_move_legality_matches_generation(board in arb_board()) {
        let team = board.to_move();
        let ids: Vec<UnitId> = board.team_units(team).map(|u| u.id).collect();
        for id in ids {
            let generated = legal_actions(&board, id);
            for y in 0..board.height() {
                for x in 0..board.width() {
                    let action = Action::move_to(team, id, Pos::new(x, y));
                    prop_assert_eq!(is_legal(&board, team, &action), generated.contains(&action));
                }
            }
        }
    }

    #[test]
    fn prop_damage_bounded(power in 0u32..=120, ahp in 1u8..=10, stars in 0u32..=4, dhp in 1u8..=10) {
        let dealt = damage_formula(power, ahp, stars, dhp);
        prop_assert!(dealt <= dhp);
        if power == 0 {
            prop_assert_eq!(dealt, 0);
        }
        prop_assert!(damage_formula(power + 5, ahp, stars, dhp) >= dealt);
        prop_assert!(damage_formula(power, ahp, stars + 1, dhp) <= dealt);
    }
}
