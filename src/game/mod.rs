//! Running games: the player interface, the game loop, auto-battles and
//! game records.

pub mod battle;
pub mod manager;
pub mod player;
pub mod record;

pub use battle::{auto_battle, BattleConfig, BattleStats};
pub use manager::{GameManager, GameSummary, ManagerConfig};
pub use player::Player;
pub use record::{GameRecord, RecordedAction};
