//! Error types.
//!
//! Each layer has its own error enum: map loading, action legality, undo
//! bookkeeping, search and the game loop. Higher layers wrap lower ones via
//! `#[from]`.

use thiserror::Error;

use super::action::Damage;
use super::grid::Pos;
use super::team::Team;
use super::unit::UnitId;

/// An action that fails a legality precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("it is {to_move}'s turn, not {team}'s")]
    NotYourTurn { team: Team, to_move: Team },

    #[error("unit {0} does not exist")]
    UnknownUnit(UnitId),

    #[error("unit {unit} does not belong to {team}")]
    WrongTeam { unit: UnitId, team: Team },

    #[error("unit {0} has already acted this turn")]
    AlreadyActed(UnitId),

    #[error("destination {0} is outside the board")]
    OutOfBounds(Pos),

    #[error("destination {0} is occupied")]
    DestinationOccupied(Pos),

    #[error("unit {unit} cannot reach {to}")]
    Unreachable { unit: UnitId, to: Pos },

    #[error("target {0} does not exist")]
    UnknownTarget(UnitId),

    #[error("target {0} is not an enemy")]
    NotAnEnemy(UnitId),

    #[error("unit {unit} cannot attack {target} from {from}")]
    OutOfRange { unit: UnitId, target: UnitId, from: Pos },
}

/// A malformed map description or an inconsistent board setup.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("invalid number {value:?} in {field}")]
    InvalidNumber { field: String, value: String },

    #[error("malformed record {0:?}")]
    MalformedRecord(String),

    #[error("grid of {width}x{height} is not supported")]
    InvalidSize { width: usize, height: usize },

    #[error("expected {expected} MAP rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("MAP row {row} has {found} cells, expected {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },

    #[error("unknown terrain code {0}")]
    UnknownTerrain(u8),

    #[error("unknown unit type {0:?}")]
    UnknownUnitType(String),

    #[error("invalid team {0:?}")]
    InvalidTeam(String),

    #[error("invalid hit points {0}")]
    InvalidHp(u8),

    #[error("unit position {0} is outside the grid")]
    UnitOutOfBounds(Pos),

    #[error("cell {0} already holds a unit")]
    CellOccupied(Pos),

    #[error("{team} declares {declared} units but {found} were listed")]
    UnitCountMismatch { team: Team, declared: usize, found: usize },

    #[error("too many units")]
    TooManyUnits,

    #[error("board snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("reading map: {0}")]
    Io(#[from] std::io::Error),
}

/// A broken undo invariant. Always a tree-management bug, never recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    #[error("undo past the root of the log")]
    EmptyLog,

    #[error("cannot restore unit {0}: its slot is occupied")]
    SlotOccupied(UnitId),

    #[error("cannot restore a unit onto occupied cell {0}")]
    CellOccupied(Pos),

    #[error("unit {0} no longer matches the undo record")]
    UnitMismatch(UnitId),
}

/// A failure inside a planner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Illegal(#[from] IllegalAction),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error("no board stored for search node {0}")]
    MissingState(u32),
}

/// A failure that aborts a game.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("player {player} proposed an illegal action: {source}")]
    IllegalAction {
        player: String,
        #[source]
        source: IllegalAction,
    },

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error("map: {0}")]
    Map(#[from] MapError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("game record: {0}")]
    Record(#[from] bincode::Error),

    #[error("replay diverged at step {step}: {source}")]
    Replay {
        step: usize,
        #[source]
        source: IllegalAction,
    },

    #[error("replay diverged at step {step}: recorded {recorded:?}, got {replayed:?}")]
    ReplayDamage {
        step: usize,
        recorded: Option<Damage>,
        replayed: Option<Damage>,
    },

    #[error("game exceeded {0} actions")]
    ActionBudget(u32),
}
