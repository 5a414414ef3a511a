//! The game loop.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Action, Board, GameError, Team, TeamPair};
use crate::rules::{apply, outcome, validate, GameResult};

use super::player::Player;
use super::record::GameRecord;

/// Game loop settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Abort a game after this many applied actions.
    pub max_actions: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { max_actions: 10_000 }
    }
}

impl ManagerConfig {
    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }
}

/// How a finished game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub result: GameResult,
    /// Completed turns when the game ended.
    pub turns: u32,
    pub actions: usize,
    pub remaining_hp: TeamPair<u32>,
    /// Whether the turn limit decided the game.
    pub by_turn_limit: bool,
}

impl GameSummary {
    fn from_board(board: &Board, result: GameResult, actions: usize) -> Self {
        let by_turn_limit = board.resigned().is_none()
            && Team::ALL.iter().all(|&t| board.alive_count(t) > 0)
            && board.turn_count() >= board.turn_limit();
        Self {
            result,
            turns: board.turn_count(),
            actions,
            remaining_hp: TeamPair::from_fn(|t| board.total_hp(t)),
            by_turn_limit,
        }
    }
}

/// Runs one game between two players.
pub struct GameManager {
    board: Board,
    players: TeamPair<Box<dyn Player>>,
    config: ManagerConfig,
    record: GameRecord,
}

impl GameManager {
    pub fn new(board: Board, red: Box<dyn Player>, blue: Box<dyn Player>) -> Self {
        let record = GameRecord::new(&board);
        Self {
            board,
            players: TeamPair::new(red, blue),
            config: ManagerConfig::default(),
            record,
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn into_record(self) -> GameRecord {
        self.record
    }

    /// Play until the game is over.
    ///
    /// A team with no unit left to act ends its turn without being asked.
    /// Any illegal answer aborts the game.
    pub fn play(&mut self) -> Result<GameSummary, GameError> {
        let mut game_start = true;
        let mut last_query: Option<(Team, u32)> = None;

        loop {
            if let Some(result) = outcome(&self.board) {
                self.record.set_result(result);
                let summary = GameSummary::from_board(&self.board, result, self.record.len());
                info!(
                    %result,
                    turns = summary.turns,
                    actions = summary.actions,
                    red_hp = summary.remaining_hp[Team::Red],
                    blue_hp = summary.remaining_hp[Team::Blue],
                    "game over"
                );
                return Ok(summary);
            }
            if self.record.len() >= self.config.max_actions as usize {
                return Err(GameError::ActionBudget(self.config.max_actions));
            }

            let team = self.board.to_move();
            let action = if self.board.has_unacted(team) {
                let turn = (team, self.board.turn_count());
                let turn_start = last_query != Some(turn);
                last_query = Some(turn);
                let action = self.players[team].make_action(&self.board, team, turn_start, game_start)?;
                game_start = false;
                action
            } else {
                Action::turn_end(team)
            };

            let player = &self.players[team];
            validate(&self.board, team, &action).map_err(|source| GameError::IllegalAction {
                player: player.name().to_string(),
                source,
            })?;
            let undo = apply(&mut self.board, &action).map_err(|source| GameError::IllegalAction {
                player: player.name().to_string(),
                source,
            })?;
            debug!(player = player.name(), %action, damage = ?undo.damage(), "applied");
            self.record.push(action, undo.damage());
        }
    }
}
