//! Repeated games between two agents.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Board, GameError, Team};
use crate::rules::GameResult;

use super::manager::{GameManager, GameSummary, ManagerConfig};
use super::player::Player;

/// Auto-battle settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleConfig {
    pub games: u32,
    /// Swap the first mover after every game.
    pub first_team_alternates: bool,
    pub manager: ManagerConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            games: 10,
            first_team_alternates: true,
            manager: ManagerConfig::default(),
        }
    }
}

impl BattleConfig {
    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    pub fn with_alternation(mut self, alternate: bool) -> Self {
        self.first_team_alternates = alternate;
        self
    }

    pub fn with_manager(mut self, manager: ManagerConfig) -> Self {
        self.manager = manager;
        self
    }
}

/// Accumulated results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub red_wins: u32,
    pub blue_wins: u32,
    pub draws: u32,
    /// Games decided by the turn limit, whatever their result.
    pub turn_limit_games: u32,
}

impl BattleStats {
    pub fn record(&mut self, summary: &GameSummary) {
        match summary.result {
            GameResult::Winner(Team::Red) => self.red_wins += 1,
            GameResult::Winner(Team::Blue) => self.blue_wins += 1,
            GameResult::Draw => self.draws += 1,
        }
        if summary.by_turn_limit {
            self.turn_limit_games += 1;
        }
    }

    #[must_use]
    pub fn games(&self) -> u32 {
        self.red_wins + self.blue_wins + self.draws
    }

    #[must_use]
    pub fn win_rate(&self, team: Team) -> f64 {
        let wins = match team {
            Team::Red => self.red_wins,
            Team::Blue => self.blue_wins,
        };
        if self.games() == 0 {
            0.0
        } else {
            f64::from(wins) / f64::from(self.games())
        }
    }
}

/// Play `config.games` games from clones of `initial`.
///
/// `make_players` is called once per game with the game index and returns
/// fresh red and blue players.
pub fn auto_battle<F>(initial: &Board, config: &BattleConfig, mut make_players: F) -> Result<BattleStats, GameError>
where
    F: FnMut(u32) -> (Box<dyn Player>, Box<dyn Player>),
{
    let mut stats = BattleStats::default();
    for game in 0..config.games {
        let mut board = initial.clone();
        if config.first_team_alternates && game % 2 == 1 {
            board.set_to_move(initial.to_move().opponent());
        }
        let first = board.to_move();

        let (red, blue) = make_players(game);
        let (red_name, blue_name) = (red.name().to_string(), blue.name().to_string());
        let summary = GameManager::new(board, red, blue)
            .with_config(config.manager.clone())
            .play()?;
        stats.record(&summary);
        info!(
            game,
            red = %red_name,
            blue = %blue_name,
            %first,
            result = %summary.result,
            turns = summary.turns,
            "battle game finished"
        );
    }

    info!(
        games = stats.games(),
        red_wins = stats.red_wins,
        blue_wins = stats.blue_wins,
        draws = stats.draws,
        turn_limit_games = stats.turn_limit_games,
        "auto-battle finished"
    );
    Ok(stats)
}
