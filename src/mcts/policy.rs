//! Rollout policies and the rollout driver.
//!
//! Policies are trait-based to allow customization:
//! - `UniformRollout`: uniform over every candidate action
//! - `AttackFirstRollout`: prefers attacks, otherwise uniform
//!
//! [`rollout`] plays a game out in place on a board, journalling every
//! action in an [`UndoLog`], and unwinds before returning. The board handed
//! in is therefore unchanged afterward whichever backend owns it.

use crate::core::{Action, Board, GameRng, SearchError, Team};
use crate::eval::StateEvaluator;
use crate::rules::{outcome, reward, team_actions, UndoLog};

/// Policy for choosing actions during rollouts.
pub trait RolloutPolicy: Send + Sync {
    /// Pick one of `actions`, or `None` if the slice is empty.
    fn choose(&self, board: &Board, actions: &[Action], rng: &mut GameRng) -> Option<Action>;
}

/// Uniform random rollout policy.
#[derive(Clone, Debug, Default)]
pub struct UniformRollout;

impl RolloutPolicy for UniformRollout {
    fn choose(&self, _board: &Board, actions: &[Action], rng: &mut GameRng) -> Option<Action> {
        rng.choose(actions).copied()
    }
}

/// Takes an attack with the given probability whenever one is available.
#[derive(Clone, Debug)]
pub struct AttackFirstRollout {
    pub attack_probability: f64,
}

impl Default for AttackFirstRollout {
    fn default() -> Self {
        Self {
            attack_probability: 0.8,
        }
    }
}

impl RolloutPolicy for AttackFirstRollout {
    fn choose(&self, _board: &Board, actions: &[Action], rng: &mut GameRng) -> Option<Action> {
        let attacks: Vec<Action> = actions.iter().copied().filter(Action::is_attack).collect();
        if !attacks.is_empty() && rng.gen_bool(self.attack_probability) {
            return rng.choose(attacks.as_slice()).copied();
        }
        rng.choose(actions).copied()
    }
}

/// Rollout limits and scoring.
pub struct Rollout<'a> {
    pub policy: &'a dyn RolloutPolicy,
    pub evaluator: Option<&'a dyn StateEvaluator>,
    /// Actions before cutting off (0 = play to the end).
    pub max_actions: u32,
}

impl Rollout<'_> {
    /// Play from `board` until the game ends or the cap is hit, and score
    /// the result for `team`. `board` is restored before returning.
    pub fn run(&self, board: &mut Board, team: Team, rng: &mut GameRng) -> Result<f64, SearchError> {
        let mut log = UndoLog::new();
        let score = loop {
            if let Some(result) = outcome(board) {
                break result.reward_for(team);
            }
            if self.max_actions > 0 && log.depth() >= self.max_actions as usize {
                break match self.evaluator {
                    Some(evaluator) => evaluator.evaluate(board, team),
                    None => reward(board, team),
                };
            }
            let mover = board.to_move();
            let actions = team_actions(board, mover);
            let action = self
                .policy
                .choose(board, &actions, rng)
                .unwrap_or(Action::turn_end(mover));
            log.apply(board, &action)?;
        };
        log.unwind(board)?;
        Ok(score)
    }
}

/// Shorthand for a [`Rollout`] without a depth cap or evaluator.
pub fn rollout(
    board: &mut Board,
    team: Team,
    policy: &dyn RolloutPolicy,
    rng: &mut GameRng,
) -> Result<f64, SearchError> {
    Rollout {
        policy,
        evaluator: None,
        max_actions: 0,
    }
    .run(board, team, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pos, UnitType};
    use crate::eval::HpRatioEvaluator;

    fn board() -> Board {
        let mut board = Board::new(5, 5).unwrap().with_turn_limit(6);
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(1, 1), 10).unwrap();
        board.spawn_unit(UnitType::Panzer, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(4, 4), 10).unwrap();
        board
    }

    #[test]
    fn test_uniform_chooses_member() {
        let board = board();
        let actions = team_actions(&board, Team::Red);
        let mut rng = GameRng::new(1);
        let chosen = UniformRollout.choose(&board, &actions, &mut rng).unwrap();
        assert!(actions.contains(&chosen));
        assert!(UniformRollout.choose(&board, &[], &mut rng).is_none());
    }

    #[test]
    fn test_attack_first_prefers_attacks() {
        let mut board = Board::new(3, 1).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(1, 0), 10).unwrap();
        let actions = team_actions(&board, Team::Red);

        let always = AttackFirstRollout {
            attack_probability: 1.0,
        };
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            assert!(always.choose(&board, &actions, &mut rng).unwrap().is_attack());
        }
    }

    #[test]
    fn test_rollout_restores_board() {
        let mut board = board();
        let before = board.clone();
        let mut rng = GameRng::new(9);

        let score = rollout(&mut board, Team::Red, &UniformRollout, &mut rng).unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(board, before);
    }

    #[test]
    fn test_rollout_is_deterministic() {
        let mut a = board();
        let mut b = board();
        let policy = AttackFirstRollout::default();
        let ra = rollout(&mut a, Team::Blue, &policy, &mut GameRng::new(5)).unwrap();
        let rb = rollout(&mut b, Team::Blue, &policy, &mut GameRng::new(5)).unwrap();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_cutoff_uses_evaluator() {
        let mut board = board();
        let capped = Rollout {
            policy: &UniformRollout,
            evaluator: Some(&HpRatioEvaluator),
            max_actions: 1,
        };
        let score = capped.run(&mut board, Team::Red, &mut GameRng::new(0)).unwrap();
        // nothing is in reach on the first action: red holds 20 of 30 hp
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }
}
