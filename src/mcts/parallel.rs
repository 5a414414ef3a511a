//! Root-parallel MCTS.
//!
//! Several independent clone-backed searches run on the rayon pool with
//! seeds forked from the configured one. Their root statistics are merged
//! per action and the action with the best visit-weighted mean wins.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::core::{Action, Board, GameRng, SearchError, Team};
use crate::rules::team_actions;

use super::backend::CloneBackend;
use super::config::MCTSConfig;
use super::policy::{RolloutPolicy, UniformRollout};
use super::search::MCTSSearch;

/// Merged root statistics for one action.
#[derive(Clone, Debug, PartialEq)]
pub struct RootSummary {
    pub action: Action,
    pub visits: u32,
    pub value: f64,
}

/// Root-parallel search settings.
#[derive(Clone)]
pub struct ParallelSearch {
    pub config: MCTSConfig,
    /// Independent trees, each running the full iteration budget.
    pub workers: usize,
    pub policy: Arc<dyn RolloutPolicy>,
}

impl ParallelSearch {
    pub fn new(config: MCTSConfig, workers: usize) -> Self {
        Self {
            config,
            workers: workers.max(1),
            policy: Arc::new(UniformRollout),
        }
    }

    pub fn with_policy<P: RolloutPolicy + 'static>(mut self, policy: P) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Worker seeds, forked in order from the configured seed.
    fn seeds(&self) -> Vec<u64> {
        let mut rng = GameRng::new(self.config.seed);
        (0..self.workers).map(|_| rng.fork().seed()).collect()
    }

    /// Run every worker and merge their root statistics in edge order.
    pub fn root_summary(&self, board: &Board, team: Team) -> Result<Vec<RootSummary>, SearchError> {
        let actions = team_actions(board, team);
        if actions.len() <= 1 {
            return Ok(actions
                .into_iter()
                .map(|action| RootSummary {
                    action,
                    visits: 0,
                    value: 0.0,
                })
                .collect());
        }

        let per_worker: Vec<Vec<(Action, u32, f64)>> = self
            .seeds()
            .into_par_iter()
            .map(|seed| -> Result<Vec<(Action, u32, f64)>, SearchError> {
                let mut search = MCTSSearch::new(CloneBackend::new(), self.config.clone().with_seed(seed))
                    .with_shared_policy(Arc::clone(&self.policy));
                search.search(board, team)?;
                Ok(search.root_visits())
            })
            .collect::<Result<_, _>>()?;

        let mut merged: Vec<(u32, f64)> = vec![(0, 0.0); actions.len()];
        for visits in &per_worker {
            for (slot, &(_, n, value)) in merged.iter_mut().zip(visits) {
                slot.0 += n;
                slot.1 += value * f64::from(n);
            }
        }

        Ok(actions
            .into_iter()
            .zip(merged)
            .map(|(action, (visits, weighted))| RootSummary {
                action,
                visits,
                value: if visits == 0 { 0.0 } else { weighted / f64::from(visits) },
            })
            .collect())
    }

    /// Best merged action, or `None` if `team` has nothing to do.
    pub fn search(&self, board: &Board, team: Team) -> Result<Option<Action>, SearchError> {
        let summary = self.root_summary(board, team)?;
        let mut best: Option<&RootSummary> = None;
        for entry in summary.iter().filter(|s| s.visits > 0) {
            if best.map_or(true, |b| entry.value > b.value) {
                best = Some(entry);
            }
        }
        let choice = best.or(summary.first()).map(|s| s.action);
        debug!(workers = self.workers, ?choice, "root-parallel search finished");
        Ok(choice)
    }
}

/// Shorthand for [`ParallelSearch::search`] with a uniform rollout policy.
pub fn search_root_parallel(
    board: &Board,
    team: Team,
    config: &MCTSConfig,
    workers: usize,
) -> Result<Option<Action>, SearchError> {
    ParallelSearch::new(config.clone(), workers).search(board, team)
}
