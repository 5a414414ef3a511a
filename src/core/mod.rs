//! Core data model: teams, unit types, terrain, units, the board, actions,
//! RNG and error types.
//!
//! Everything here is plain data. Game rules that read or change a board
//! live in `rules`.

pub mod action;
pub mod board;
pub mod error;
pub mod grid;
pub mod map_format;
pub mod rng;
pub mod spec;
pub mod team;
pub mod terrain;
pub mod unit;

pub use action::{Action, ActionKind, Damage};
pub use board::{Board, StateKey, UnitKey};
pub use error::{GameError, IllegalAction, MapError, SearchError, UndoError};
pub use grid::{CellSet, Pos};
pub use rng::GameRng;
pub use spec::{UnitSpec, UnitType};
pub use team::{Team, TeamPair};
pub use terrain::Terrain;
pub use unit::{Unit, UnitId, MAX_HP};
