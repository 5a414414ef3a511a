//! Apply/undo must be an exact inverse, kills and turn passes included.

use proptest::prelude::*;

use grid_tactics::core::{Action, Board, GameRng, Pos, Team, UnitType};
use grid_tactics::rules::{apply, outcome, team_actions, undo, UndoLog};

/// A crowded board so that attacks and kills show up early.
fn crowded(units: &[(usize, bool, u8, u8, u8)]) -> Board {
    let mut board = Board::new(5, 5).unwrap().with_turn_limit(8);
    for &(kind, blue, x, y, hp) in units {
        let team = if blue { Team::Blue } else { Team::Red };
        let _ = board.spawn_unit(UnitType::ALL[kind], team, Pos::new(x, y), hp);
    }
    board
}

fn pick(board: &Board, rng: &mut GameRng) -> Action {
    let mover = board.to_move();
    let actions = team_actions(board, mover);
    let attacks: Vec<Action> = actions.iter().copied().filter(|a| matches!(a, Action::Attack { .. })).collect();
    if !attacks.is_empty() && rng.gen_bool(0.7) {
        return *rng.choose(attacks.as_slice()).unwrap();
    }
    if rng.gen_bool(0.05) {
        return Action::turn_end(mover);
    }
    rng.choose(actions.as_slice()).copied().unwrap_or(Action::turn_end(mover))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_unwind_restores_board(
        units in prop::collection::vec((0usize..6, any::<bool>(), 0u8..5, 0u8..5, 1u8..=10), 2..10),
        seed in any::<u64>(),
    ) {
        let mut board = crowded(&units);
        let original = board.clone();
        let mut rng = GameRng::new(seed);
        let mut log = UndoLog::new();
        let mut keys = vec![board.state_key()];

        while outcome(&board).is_none() && log.depth() < 120 {
            let action = pick(&board, &mut rng);
            log.apply(&mut board, &action).unwrap();
            prop_assert!(board.is_consistent());
            keys.push(board.state_key());
        }

        // step back one action at a time, checking every intermediate state
        while !log.is_empty() {
            keys.pop();
            log.undo_last(&mut board).unwrap();
            prop_assert_eq!(&board.state_key(), keys.last().unwrap());
        }
        prop_assert_eq!(board, original);
    }

    #[test]
    fn prop_single_undo_after_attack(
        hp in prop::collection::vec(1u8..=10, 2),
        attacker in 0usize..6,
        defender in 0usize..6,
    ) {
        let mut board = Board::new(3, 1).unwrap();
        let a = board.spawn_unit(UnitType::ALL[attacker], Team::Red, Pos::new(0, 0), hp[0]).unwrap();
        let d = board.spawn_unit(UnitType::ALL[defender], Team::Blue, Pos::new(1, 0), hp[1]).unwrap();
        let before = board.clone();

        let attack = team_actions(&board, Team::Red)
            .into_iter()
            .find(|x| matches!(x, Action::Attack { target, .. } if *target == d));
        if let Some(action) = attack {
            let record = apply(&mut board, &action).unwrap();
            let damage = record.damage().unwrap();
            prop_assert!(damage.dealt > 0);
            if record.killed_target() {
                prop_assert!(board.unit(d).is_none());
            }
            if record.killed_actor() {
                prop_assert!(board.unit(a).is_none());
            }
            undo(&mut board, &record).unwrap();
            prop_assert_eq!(board, before);
        }
    }
}
