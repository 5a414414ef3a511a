//! Core MCTS search algorithm.
//!
//! UCT over single-unit actions. The root is always expanded with the
//! searching team's actions; deeper nodes get children once their visit
//! count exceeds `expansion_threshold`, and child nodes are only allocated
//! when an edge is first followed. Leaves are scored by a rollout (or their
//! terminal result) from the searching team's point of view, and the reward
//! is added to every node on the path, root included.
//!
//! The algorithm is the same for every [`SearchBackend`]; only the way a
//! node's board is obtained differs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::core::{Action, Board, GameRng, SearchError, Team};
use crate::eval::StateEvaluator;
use crate::rules::{outcome, team_actions};

use super::backend::{Descent, SearchBackend};
use super::config::MCTSConfig;
use super::node::{Edge, MCTSNode, NodeId};
use super::policy::{Rollout, RolloutPolicy, UniformRollout};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Owns the backend, the tree of the latest decision and the rollout RNG.
/// The RNG persists across decisions, so a player built from one seed
/// replays identically.
pub struct MCTSSearch<B: SearchBackend> {
    backend: B,
    config: MCTSConfig,
    tree: MCTSTree<B::NodeState>,
    rng: GameRng,
    policy: Arc<dyn RolloutPolicy>,
    evaluator: Option<Arc<dyn StateEvaluator>>,
    stats: SearchStats,
    team: Team,
}

impl<B: SearchBackend> MCTSSearch<B> {
    pub fn new(backend: B, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            backend,
            config,
            tree: MCTSTree::default(),
            rng,
            policy: Arc::new(UniformRollout),
            evaluator: None,
            stats: SearchStats::default(),
            team: Team::Red,
        }
    }

    /// Set a custom rollout policy.
    pub fn with_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Share a rollout policy with other searches.
    pub fn with_shared_policy(mut self, policy: Arc<dyn RolloutPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Score rollouts cut off by `max_rollout_actions` with `evaluator`
    /// instead of the HP ratio.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn StateEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn set_time_limit(&mut self, limit: Option<Duration>) {
        self.config.time_limit = limit;
    }

    /// Choose an action for `team`.
    ///
    /// Returns `Ok(None)` when the game is over or `team` has nothing to do.
    /// A single candidate is returned without searching.
    pub fn search(&mut self, board: &Board, team: Team) -> Result<Option<Action>, SearchError> {
        let start = Instant::now();
        self.stats.reset();
        self.team = team;

        let terminal = outcome(board);
        let root_state = self.backend.begin(board);
        self.tree.reset(MCTSNode::new(root_state, board.to_move(), 0, terminal));
        if terminal.is_some() {
            return Ok(None);
        }

        let actions = team_actions(board, team);
        match actions.len() {
            0 => return Ok(None),
            1 => return Ok(Some(actions[0])),
            _ => {}
        }
        let root = self.tree.root();
        let node = self.tree.get_mut(root);
        node.edges.extend(actions.into_iter().map(Edge::new));
        node.expanded = true;
        self.stats.nodes_expanded += 1;

        for _ in 0..self.config.iterations {
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() >= limit {
                    break;
                }
            }
            self.iterate()?;
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            backend = self.backend.name(),
            %team,
            iterations = self.stats.iterations,
            nodes = self.tree.len(),
            transpositions = self.stats.transpositions,
            max_depth = self.stats.max_depth,
            time_us = self.stats.time_us,
            "search finished"
        );

        Ok(self.best_action())
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iterate(&mut self) -> Result<(), SearchError> {
        let root = self.tree.root();
        let mut path = vec![root];
        let mut current = root;

        // === SELECTION / EXPANSION ===
        loop {
            let node = self.tree.get(current);
            if node.is_terminal() {
                break;
            }
            if !node.expanded {
                if node.visits <= self.config.expansion_threshold {
                    break;
                }
                self.expand(current)?;
                if self.tree.get(current).edges.is_empty() {
                    break;
                }
            }
            if self.config.max_depth > 0 && path.len() > self.config.max_depth as usize {
                break;
            }

            let edge_idx = self.select_edge(current);
            let edge = &self.tree.get(current).edges[edge_idx];
            let (action, child) = (edge.action, edge.child);
            let child = if child.is_none() {
                if self.tree.len() >= self.config.max_nodes {
                    break;
                }
                self.attach(current, edge_idx, &action)?
            } else {
                self.backend.descend(&self.tree.get(current).state, &action, true)?;
                child
            };

            path.push(child);
            current = child;
            if self.tree.get(child).visits == 0 {
                break;
            }
        }

        // === SIMULATION ===
        let reward = self.evaluate(current)?;
        self.stats.simulations += 1;

        // === BACKPROPAGATION ===
        for &id in &path {
            self.tree.get_mut(id).update(reward);
        }
        self.stats.max_depth = self.stats.max_depth.max((path.len() - 1) as u16);

        self.backend.rewind()
    }

    /// Give `id` one edge per legal action of the team to move.
    fn expand(&mut self, id: NodeId) -> Result<(), SearchError> {
        let actions = {
            let board = self
                .backend
                .board(&self.tree.get(id).state)
                .ok_or(SearchError::MissingState(id.raw()))?;
            team_actions(board, board.to_move())
        };
        let node = self.tree.get_mut(id);
        node.edges.extend(actions.into_iter().map(Edge::new));
        node.expanded = true;
        self.stats.nodes_expanded += 1;
        Ok(())
    }

    /// Follow an edge for the first time, allocating or linking its child.
    fn attach(&mut self, parent: NodeId, edge_idx: usize, action: &Action) -> Result<NodeId, SearchError> {
        let descent = self.backend.descend(&self.tree.get(parent).state, action, false)?;
        let child = match descent {
            Descent::New(state) => {
                let (to_move, terminal) = {
                    let board = self
                        .backend
                        .board(&state)
                        .ok_or(SearchError::MissingState(parent.raw()))?;
                    (board.to_move(), outcome(board))
                };
                let depth = self.tree.get(parent).depth + 1;
                let id = self.tree.alloc(MCTSNode::new(state, to_move, depth, terminal));
                self.backend.register(&self.tree.get(id).state, id);
                id
            }
            Descent::Shared(id) => {
                self.stats.transpositions += 1;
                id
            }
            Descent::Known => return Err(SearchError::MissingState(parent.raw())),
        };
        self.tree.get_mut(parent).edges[edge_idx].child = child;
        Ok(child)
    }

    /// UCB1 over the edges of `id`. Edges without a visited child win, in
    /// edge order.
    fn select_edge(&self, id: NodeId) -> usize {
        let node = self.tree.get(id);
        if let Some(idx) = node
            .edges
            .iter()
            .position(|e| e.child.is_none() || self.tree.get(e.child).visits == 0)
        {
            return idx;
        }

        let ln_total = f64::from(self.stats.simulations.max(1)).ln();
        let flip = self.config.adversarial_selection && node.to_move != self.team;
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (idx, edge) in node.edges.iter().enumerate() {
            let child = self.tree.get(edge.child);
            let value = if flip { 1.0 - child.value } else { child.value };
            let score = value + self.config.exploration_constant * (ln_total / f64::from(child.visits)).sqrt();
            if score > best_score {
                best = idx;
                best_score = score;
            }
        }
        best
    }

    /// Reward of the leaf for the searching team.
    fn evaluate(&mut self, leaf: NodeId) -> Result<f64, SearchError> {
        if let Some(result) = self.tree.get(leaf).terminal {
            return Ok(result.reward_for(self.team));
        }
        let rollout = Rollout {
            policy: self.policy.as_ref(),
            evaluator: self.evaluator.as_deref(),
            max_actions: self.config.max_rollout_actions,
        };
        let board = self
            .backend
            .board_mut(&mut self.tree.get_mut(leaf).state)
            .ok_or(SearchError::MissingState(leaf.raw()))?;
        rollout.run(board, self.team, &mut self.rng)
    }

    /// Root edge whose child has the highest mean value; the first edge if
    /// nothing was visited.
    fn best_action(&self) -> Option<Action> {
        let root = self.tree.root_node();
        let mut best: Option<(Action, f64)> = None;
        for edge in &root.edges {
            if edge.child.is_none() {
                continue;
            }
            let child = self.tree.get(edge.child);
            if child.visits == 0 {
                continue;
            }
            if best.map_or(true, |(_, value)| child.value > value) {
                best = Some((edge.action, child.value));
            }
        }
        best.map(|(action, _)| action)
            .or_else(|| root.edges.first().map(|e| e.action))
    }

    /// `(action, visits, value)` for every root edge of the last search.
    pub fn root_visits(&self) -> Vec<(Action, u32, f64)> {
        if self.tree.is_empty() {
            return Vec::new();
        }
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| {
                if e.child.is_none() {
                    (e.action, 0, 0.0)
                } else {
                    let child = self.tree.get(e.child);
                    (e.action, child.visits, child.value)
                }
            })
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree<B::NodeState> {
        &self.tree
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pos, UnitId, UnitType};
    use crate::mcts::backend::{CloneBackend, TranspositionBackend, UndoBackend};

    fn skirmish() -> Board {
        let mut board = Board::new(5, 5).unwrap().with_turn_limit(4);
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(1, 1), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 2), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 3), 10).unwrap();
        board
    }

    fn config() -> MCTSConfig {
        MCTSConfig::default().with_iterations(60).with_expansion_threshold(2).with_seed(7)
    }

    #[test]
    fn test_search_returns_legal_action() {
        let board = skirmish();
        let mut search = MCTSSearch::new(CloneBackend::new(), config());
        let action = search.search(&board, Team::Red).unwrap().unwrap();

        assert!(crate::rules::is_legal(&board, Team::Red, &action));
        assert_eq!(search.stats().iterations, 60);
        assert_eq!(search.stats().simulations, 60);
        assert_eq!(search.tree().root_node().visits, 60);
    }

    #[test]
    fn test_single_action_skips_search() {
        let mut board = Board::new(1, 2).unwrap();
        board.spawn_unit(UnitType::Cannon, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(0, 1), 10).unwrap();

        let mut search = MCTSSearch::new(CloneBackend::new(), config());
        let action = search.search(&board, Team::Red).unwrap();
        assert_eq!(action, Some(Action::move_to(Team::Red, UnitId::new(0), Pos::new(0, 0))));
        assert_eq!(search.stats().iterations, 0);
    }

    #[test]
    fn test_terminal_or_off_turn_root() {
        let mut board = skirmish();
        let mut search = MCTSSearch::new(UndoBackend::new(), config());
        assert_eq!(search.search(&board, Team::Blue).unwrap(), None);

        board.set_turn_count(4);
        assert_eq!(search.search(&board, Team::Red).unwrap(), None);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let board = skirmish();
        let mut a = MCTSSearch::new(TranspositionBackend::new(), config());
        let mut b = MCTSSearch::new(TranspositionBackend::new(), config());
        assert_eq!(a.search(&board, Team::Red).unwrap(), b.search(&board, Team::Red).unwrap());
        assert_eq!(a.root_visits(), b.root_visits());
    }

    #[test]
    fn test_root_visits_sum() {
        let board = skirmish();
        let mut search = MCTSSearch::new(UndoBackend::new(), config());
        search.search(&board, Team::Red).unwrap();

        let visits: u32 = search.root_visits().iter().map(|(_, n, _)| n).sum();
        assert_eq!(visits, 60);
    }

    #[test]
    fn test_time_limit_stops_early() {
        let board = skirmish();
        let config = config()
            .with_iterations(1_000_000)
            .with_time_limit(Some(Duration::from_millis(5)));
        let mut search = MCTSSearch::new(CloneBackend::new(), config);
        assert!(search.search(&board, Team::Red).unwrap().is_some());
        assert!(search.stats().iterations < 1_000_000);
    }

    #[test]
    fn test_leaf_expands_only_past_threshold() {
        let board = skirmish();
        let threshold = 2;
        let config = config()
            .with_iterations(0)
            .with_exploration(10.0)
            .with_expansion_threshold(threshold);
        let mut search = MCTSSearch::new(CloneBackend::new(), config);
        search.search(&board, Team::Red).unwrap();
        let root = search.tree().root();

        // Unvisited edges go first, so one pass gives every root child a visit.
        let width = search.tree().root_node().edges.len();
        for _ in 0..width {
            search.iterate().unwrap();
        }
        let child = search.tree().root_node().edges[0].child;
        assert_eq!(search.tree().get(child).visits, 1);

        let mut seen_at_threshold = false;
        for _ in 0..5000 {
            let node = search.tree().get(child);
            if node.visits == threshold {
                assert!(!node.expanded && node.edges.is_empty());
                seen_at_threshold = true;
            }
            if node.visits == threshold + 1 {
                // the visit that took it past the threshold was a rollout
                assert!(!node.expanded);
            }
            if node.visits > threshold + 1 {
                break;
            }
            search.iterate().unwrap();
        }
        assert!(seen_at_threshold);
        let node = search.tree().get(child);
        assert!(node.expanded && !node.edges.is_empty());

        for (id, node) in search.tree().iter().filter(|(id, _)| *id != root) {
            if node.expanded {
                assert!(node.visits > threshold + 1, "{id:?} expanded at {} visits", node.visits);
            }
        }
    }

    #[test]
    fn test_node_cap() {
        let board = skirmish();
        let mut search = MCTSSearch::new(CloneBackend::new(), config().with_max_nodes(5));
        search.search(&board, Team::Red).unwrap();
        assert!(search.tree().len() <= 5);
        assert_eq!(search.stats().iterations, 60);
    }
}
