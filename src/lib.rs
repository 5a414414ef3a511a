//! # grid-tactics
//!
//! A two-team, turn-based grid wargame engine with search-based agents.
//!
//! ## Design Principles
//!
//! 1. **One action at a time**: a team turn is a sequence of single-unit
//!    actions; the turn passes automatically once every unit has acted.
//!
//! 2. **Reversible rules**: every applied action yields an undo record, so
//!    planners can search on one board without copying it.
//!
//! 3. **Cheap copies anyway**: boards keep their units in `im` persistent
//!    vectors, so cloning a board for a search node is O(1).
//!
//! ## Architecture
//!
//! - **MCTS/UCT** over single-unit actions with three interchangeable
//!   backends: clone-per-node, transposition-keyed DAG and in-place undo.
//!
//! - **Deterministic**: all randomness flows through seeded `GameRng`s.
//!
//! ## Modules
//!
//! - `core`: teams, units, terrain, the board, actions, map files, errors
//! - `rules`: movement and attack ranges, damage, legality, apply/undo,
//!   game outcome
//! - `eval`: board evaluators and the tensor encoder for learned models
//! - `mcts`: Monte Carlo Tree Search
//! - `minimax`: one- and two-ply lookahead
//! - `game`: the player interface, game loop, auto-battle and records
//! - `agents`: human, rule-based, random and planner-backed players

pub mod agents;
pub mod core;
pub mod eval;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, Board, Damage, GameError, GameRng, IllegalAction, MapError, Pos, SearchError, StateKey,
    Team, TeamPair, Terrain, Unit, UnitId, UnitType, UndoError,
};

pub use crate::rules::{apply, legal_actions, outcome, team_actions, undo, validate, GameResult, UndoLog, UndoRecord};

pub use crate::eval::{HpRatioEvaluator, MaterialEvaluator, StateEvaluator};

pub use crate::mcts::{
    CloneBackend, MCTSConfig, MCTSSearch, SearchBackend, SearchStats, TranspositionBackend, UndoBackend,
};

pub use crate::minimax::MinimaxPlanner;

pub use crate::game::{auto_battle, BattleConfig, BattleStats, GameManager, GameRecord, GameSummary, Player};
