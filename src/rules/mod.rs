//! Game rules as free functions over a [`Board`](crate::core::Board).
//!
//! - `range`: reachability and attack ranges
//! - `damage`: combat resolution
//! - `legality`: action enumeration and validation
//! - `apply`: in-place application, undo records and the undo log
//! - `outcome`: terminal detection and rewards
//!
//! Planners and the game loop share these functions; nothing else mutates
//! a board during play.

pub mod apply;
pub mod damage;
pub mod legality;
pub mod outcome;
pub mod range;

pub use apply::{apply, undo, UndoLog, UndoRecord};
pub use damage::{damage_formula, resolve_damage};
pub use legality::{is_legal, legal_actions, team_actions, validate};
pub use outcome::{is_terminal, judge_by_hp, outcome, reward, GameResult};
pub use range::{attack_options, attackable_cells, reachable_cells};
