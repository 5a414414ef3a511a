//! Per-decision search counters.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters for one call to `MCTSSearch::search`. Reset at the start of
/// every decision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,

    /// Nodes given outgoing edges, the root included.
    pub nodes_expanded: u32,

    /// Leaf evaluations backed up: rollouts plus terminal hits.
    pub simulations: u32,

    /// First visits of an edge that landed on an already stored position.
    pub transpositions: u32,

    /// Deepest leaf, in actions below the root.
    pub max_depth: u16,

    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.time_us)
    }

    fn per_second(&self, count: u32) -> f64 {
        match self.time_us {
            0 => 0.0,
            us => f64::from(count) * 1e6 / us as f64,
        }
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        self.per_second(self.iterations)
    }

    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        self.per_second(self.simulations)
    }

    /// Share of new edges that were merged into an existing node.
    #[must_use]
    pub fn transposition_rate(&self) -> f64 {
        let linked = self.nodes_expanded + self.transpositions;
        if linked == 0 {
            0.0
        } else {
            f64::from(self.transpositions) / f64::from(linked)
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} expanded, {} shared, depth {}, {:.0} it/s",
            self.iterations,
            self.nodes_expanded,
            self.transpositions,
            self.max_depth,
            self.iterations_per_second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = SearchStats {
            iterations: 500,
            simulations: 250,
            time_us: 500_000,
            ..SearchStats::default()
        };
        assert_eq!(stats.iterations_per_second(), 1000.0);
        assert_eq!(stats.simulations_per_second(), 500.0);
        assert_eq!(stats.elapsed(), Duration::from_millis(500));
        assert_eq!(SearchStats::new().iterations_per_second(), 0.0);
    }

    #[test]
    fn test_transposition_rate() {
        let mut stats = SearchStats {
            nodes_expanded: 30,
            transpositions: 10,
            ..SearchStats::default()
        };
        assert!((stats.transposition_rate() - 0.25).abs() < 1e-12);
        stats.reset();
        assert_eq!(stats, SearchStats::default());
        assert_eq!(stats.transposition_rate(), 0.0);
    }

    #[test]
    fn test_json_and_display() {
        let stats = SearchStats {
            iterations: 42,
            max_depth: 3,
            ..SearchStats::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: SearchStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
        assert!(stats.to_string().starts_with("42 iterations"));
    }
}
