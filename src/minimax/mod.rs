//! Shallow lookahead planner.
//!
//! Tries every action of the planning team on one board through an
//! [`UndoLog`], optionally looks one more action ahead, and scores leaves
//! with a [`StateEvaluator`]. Finished games are scored with the real
//! result instead.
//!
//! The second ply belongs to whoever moves after the first action: the
//! planning team again if it still has units to act (maximise), otherwise
//! the opponent (minimise).

use std::sync::Arc;

use tracing::debug;

use crate::core::{Action, Board, SearchError, Team};
use crate::eval::StateEvaluator;
use crate::rules::{is_terminal, reward, team_actions, UndoLog};

/// Lookahead planner of depth one or two.
#[derive(Clone)]
pub struct MinimaxPlanner {
    depth: u8,
    evaluator: Arc<dyn StateEvaluator>,
}

impl MinimaxPlanner {
    /// `depth` is clamped to `1..=2`.
    pub fn new(depth: u8, evaluator: Arc<dyn StateEvaluator>) -> Self {
        Self {
            depth: depth.clamp(1, 2),
            evaluator,
        }
    }

    #[must_use]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    fn leaf(&self, board: &Board, team: Team) -> f64 {
        if is_terminal(board) {
            reward(board, team)
        } else {
            self.evaluator.evaluate(board, team)
        }
    }

    /// Value of the position after the first ply.
    fn reply_value(&self, board: &mut Board, log: &mut UndoLog, team: Team) -> Result<f64, SearchError> {
        if self.depth < 2 || is_terminal(board) {
            return Ok(self.leaf(board, team));
        }
        let mover = board.to_move();
        let replies = team_actions(board, mover);
        if replies.is_empty() {
            return Ok(self.leaf(board, team));
        }

        let maximise = mover == team;
        let mut best = if maximise { f64::NEG_INFINITY } else { f64::INFINITY };
        let depth = log.depth();
        for reply in &replies {
            log.apply(board, reply)?;
            let value = self.leaf(board, team);
            log.unwind_to(board, depth)?;
            best = if maximise { best.max(value) } else { best.min(value) };
        }
        Ok(best)
    }

    /// Best action for `team` with its score, or `None` when `team` has
    /// nothing to do. Ties go to the first action in generation order.
    pub fn plan(&self, board: &Board, team: Team) -> Result<Option<(Action, f64)>, SearchError> {
        let actions = team_actions(board, team);
        if actions.len() <= 1 {
            return Ok(actions.first().map(|&a| (a, self.leaf(board, team))));
        }

        let mut work = board.clone();
        let mut log = UndoLog::new();
        let mut best: Option<(Action, f64)> = None;
        for action in &actions {
            log.apply(&mut work, action)?;
            let value = self.reply_value(&mut work, &mut log, team)?;
            log.unwind(&mut work)?;
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((*action, value));
            }
        }

        debug!(depth = self.depth, candidates = actions.len(), ?best, "lookahead finished");
        Ok(best)
    }

    /// Best action for `team`.
    pub fn choose(&self, board: &Board, team: Team) -> Result<Option<Action>, SearchError> {
        Ok(self.plan(board, team)?.map(|(action, _)| action))
    }
}

impl std::fmt::Debug for MinimaxPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinimaxPlanner").field("depth", &self.depth).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pos, UnitId, UnitType};
    use crate::eval::HpRatioEvaluator;

    fn planner(depth: u8) -> MinimaxPlanner {
        MinimaxPlanner::new(depth, Arc::new(HpRatioEvaluator))
    }

    #[test]
    fn test_depth_is_clamped() {
        assert_eq!(planner(0).depth(), 1);
        assert_eq!(planner(7).depth(), 2);
    }

    #[test]
    fn test_takes_the_kill() {
        let mut board = Board::new(4, 1).unwrap();
        board.spawn_unit(UnitType::Panzer, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(1, 0), 1).unwrap();

        let (action, value) = planner(1).plan(&board, Team::Red).unwrap().unwrap();
        assert_eq!(action.target(), Some(UnitId::new(1)));
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_second_ply_sees_the_reply() {
        let mut board = Board::new(8, 1).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(7, 0), 10).unwrap();

        // stepping to x = 3 lets blue strike first; anything shorter keeps parity
        let (action, value) = planner(2).plan(&board, Team::Red).unwrap().unwrap();
        assert!(action.destination().unwrap().x < 3);
        assert_eq!(value, 0.5);

        let mut exposed = board.clone();
        crate::rules::apply(&mut exposed, &Action::move_to(Team::Red, UnitId::new(0), Pos::new(3, 0))).unwrap();
        let reply = planner(1).plan(&exposed, Team::Blue).unwrap().unwrap();
        assert!(reply.0.is_attack());
        assert!(reply.1 > 0.5);
    }

    #[test]
    fn test_board_is_untouched() {
        let mut board = Board::new(5, 5).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Cannon, Team::Red, Pos::new(1, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 1), 10).unwrap();
        let before = board.clone();

        assert!(planner(2).choose(&board, Team::Red).unwrap().is_some());
        assert_eq!(board, before);
        assert_eq!(planner(1).choose(&board, Team::Blue).unwrap(), None);
    }
}
