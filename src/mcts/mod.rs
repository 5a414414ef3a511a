//! Monte Carlo Tree Search for grid-tactics.
//!
//! ## Overview
//!
//! UCT search over single-unit actions, scored from one team's point of
//! view. Key features:
//!
//! - **Three backends**: clone-per-node, transposition-keyed DAG, and a
//!   single board driven through an undo log ([`backend`])
//! - **Lazy children**: nodes are allocated only when an edge is followed
//! - **Deterministic**: with one seed, the clone and undo backends grow the
//!   same tree
//! - **Root parallelism**: independent trees on the rayon pool ([`parallel`])
//!
//! ## Usage
//!
//! ```rust
//! use grid_tactics::core::{Board, Pos, Team, UnitType};
//! use grid_tactics::mcts::{MCTSConfig, MCTSSearch, UndoBackend};
//!
//! let mut board = Board::new(4, 4).unwrap();
//! board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
//! board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(3, 3), 10).unwrap();
//!
//! let config = MCTSConfig::default().with_iterations(50);
//! let mut search = MCTSSearch::new(UndoBackend::new(), config);
//! let action = search.search(&board, Team::Red).unwrap();
//! assert!(action.is_some());
//! ```

pub mod backend;
pub mod config;
pub mod node;
pub mod parallel;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use backend::{CloneBackend, Descent, SearchBackend, TranspositionBackend, UndoBackend};
pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId};
pub use parallel::{search_root_parallel, ParallelSearch, RootSummary};
pub use policy::{rollout, AttackFirstRollout, Rollout, RolloutPolicy, UniformRollout};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::MCTSTree;
