//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB exploration constant (default: 0.15).
    /// Rewards live in [0, 1], so small values already explore plenty.
    pub exploration_constant: f64,

    /// Simulations per decision.
    pub iterations: u32,

    /// Visits a leaf needs before it gets children. The root is always
    /// expanded.
    pub expansion_threshold: u32,

    /// Maximum nodes to allocate in the tree.
    /// Prevents memory exhaustion on large searches.
    pub max_nodes: usize,

    /// Maximum tree depth (0 = unlimited).
    pub max_depth: u32,

    /// Rollout length cap in actions (0 = play to the end).
    pub max_rollout_actions: u32,

    /// Random seed for rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Wall-clock budget per decision, checked between iterations.
    pub time_limit: Option<Duration>,

    /// Score opponent nodes with `1 - value` during selection.
    pub adversarial_selection: bool,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 0.15,
            iterations: 200,
            expansion_threshold: 10,
            max_nodes: 100_000,
            max_depth: 0,
            max_rollout_actions: 0,
            seed: 42,
            time_limit: None,
            adversarial_selection: false,
        }
    }
}

impl MCTSConfig {
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_expansion_threshold(mut self, visits: u32) -> Self {
        self.expansion_threshold = visits;
        self
    }

    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_rollout_actions(mut self, actions: u32) -> Self {
        self.max_rollout_actions = actions;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn with_adversarial_selection(mut self, enabled: bool) -> Self {
        self.adversarial_selection = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - 0.15).abs() < 1e-9);
        assert_eq!(config.iterations, 200);
        assert_eq!(config.expansion_threshold, 10);
        assert_eq!(config.seed, 42);
        assert!(config.time_limit.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_max_depth(50)
            .with_time_limit(Some(Duration::from_millis(20)));

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.time_limit, Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_iterations(17);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.iterations, 17);
        assert_eq!(config.seed, deserialized.seed);
    }
}
