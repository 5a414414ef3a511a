//! Ready-made players: a terminal human, a rule-based agent, a random
//! agent, and wrappers around the lookahead and MCTS planners.

pub mod heuristic;
pub mod human;
pub mod planners;
pub mod random;

pub use heuristic::HeuristicPlayer;
pub use human::{parse_command, Command, CommandError, HumanPlayer};
pub use planners::{MctsPlayer, MinimaxPlayer};
pub use random::RandomPlayer;
