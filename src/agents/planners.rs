//! Players backed by the search planners.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::{Action, Board, GameError, Team};
use crate::eval::StateEvaluator;
use crate::game::Player;
use crate::mcts::{MCTSConfig, MCTSSearch, RolloutPolicy, SearchBackend};
use crate::minimax::MinimaxPlanner;

/// Depth-one or depth-two lookahead.
#[derive(Debug)]
pub struct MinimaxPlayer {
    planner: MinimaxPlanner,
    name: String,
}

impl MinimaxPlayer {
    pub fn new(depth: u8, evaluator: Arc<dyn StateEvaluator>) -> Self {
        let planner = MinimaxPlanner::new(depth, evaluator);
        let name = format!("Minimax-D{}", planner.depth());
        Self { planner, name }
    }
}

impl Player for MinimaxPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_action(&mut self, board: &Board, team: Team, _turn_start: bool, _game_start: bool) -> Result<Action, GameError> {
        Ok(self.planner.choose(board, team)?.unwrap_or(Action::turn_end(team)))
    }
}

/// MCTS over any backend.
///
/// With a turn budget, the time left in the turn is split evenly across the
/// units that still have to act.
pub struct MctsPlayer<B: SearchBackend> {
    search: MCTSSearch<B>,
    name: String,
    turn_budget: Option<Duration>,
    deadline: Option<Instant>,
}

impl<B: SearchBackend> MctsPlayer<B> {
    pub fn new(backend: B, config: MCTSConfig) -> Self {
        let name = format!("MCTS-{}", backend.name());
        Self {
            search: MCTSSearch::new(backend, config),
            name,
            turn_budget: None,
            deadline: None,
        }
    }

    pub fn with_turn_budget(mut self, budget: Duration) -> Self {
        self.turn_budget = Some(budget);
        self
    }

    pub fn with_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.search = self.search.with_policy(policy);
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn StateEvaluator>) -> Self {
        self.search = self.search.with_evaluator(evaluator);
        self
    }

    pub fn search(&self) -> &MCTSSearch<B> {
        &self.search
    }

    /// Time for the next decision: what is left of the turn over the units
    /// still to act.
    fn decision_budget(&mut self, board: &Board, team: Team, turn_start: bool) -> Option<Duration> {
        let budget = self.turn_budget?;
        let now = Instant::now();
        if turn_start || self.deadline.is_none() {
            self.deadline = Some(now + budget);
        }
        let left = self.deadline?.saturating_duration_since(now);
        let units = board.unacted_units(team).count().max(1) as u32;
        Some(left / units)
    }
}

impl<B: SearchBackend> Player for MctsPlayer<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn make_action(&mut self, board: &Board, team: Team, turn_start: bool, _game_start: bool) -> Result<Action, GameError> {
        if self.turn_budget.is_some() {
            let limit = self.decision_budget(board, team, turn_start);
            self.search.set_time_limit(limit);
        }
        Ok(self.search.search(board, team)?.unwrap_or(Action::turn_end(team)))
    }
}
