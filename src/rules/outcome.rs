//! Terminal detection and rewards.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Team};

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Winner(Team),
    Draw,
}

impl GameResult {
    /// Check if a team won.
    #[must_use]
    pub fn is_winner(&self, team: Team) -> bool {
        matches!(self, GameResult::Winner(t) if *t == team)
    }

    /// 1 for a win, 0 for a loss, 0.5 for a draw.
    #[must_use]
    pub fn reward_for(&self, team: Team) -> f64 {
        match self {
            GameResult::Winner(t) if *t == team => 1.0,
            GameResult::Winner(_) => 0.0,
            GameResult::Draw => 0.5,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::Winner(team) => write!(f, "{team} wins"),
            GameResult::Draw => write!(f, "draw"),
        }
    }
}

/// Compare remaining hit points: a team wins only if it leads by more than
/// the board's hp threshold.
#[must_use]
pub fn judge_by_hp(board: &Board) -> GameResult {
    let red = board.total_hp(Team::Red);
    let blue = board.total_hp(Team::Blue);
    let threshold = board.hp_threshold();
    if red > blue + threshold {
        GameResult::Winner(Team::Red)
    } else if blue > red + threshold {
        GameResult::Winner(Team::Blue)
    } else {
        GameResult::Draw
    }
}

/// `Some(result)` once the game is over.
///
/// Checked in order: annihilation, resignation, turn limit.
#[must_use]
pub fn outcome(board: &Board) -> Option<GameResult> {
    match (board.alive_count(Team::Red), board.alive_count(Team::Blue)) {
        (0, 0) => return Some(GameResult::Draw),
        (0, _) => return Some(GameResult::Winner(Team::Blue)),
        (_, 0) => return Some(GameResult::Winner(Team::Red)),
        _ => {}
    }
    if let Some(team) = board.resigned() {
        return Some(GameResult::Winner(team.opponent()));
    }
    if board.turn_count() >= board.turn_limit() {
        return Some(judge_by_hp(board));
    }
    None
}

#[inline]
#[must_use]
pub fn is_terminal(board: &Board) -> bool {
    outcome(board).is_some()
}

/// Score of `board` for `team` in [0, 1].
///
/// Unfinished games are judged by hit points, as at the turn limit.
#[must_use]
pub fn reward(board: &Board, team: Team) -> f64 {
    outcome(board).unwrap_or_else(|| judge_by_hp(board)).reward_for(team)
}
