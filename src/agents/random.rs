use crate::core::{Action, Board, GameError, GameRng, Team};
use crate::game::Player;
use crate::rules::team_actions;

/// Picks uniformly among the legal unit actions.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: GameRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self { rng: GameRng::new(seed) }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        "Random"
    }

    fn make_action(&mut self, board: &Board, team: Team, _turn_start: bool, _game_start: bool) -> Result<Action, GameError> {
        let actions = team_actions(board, team);
        Ok(self
            .rng
            .choose(actions.as_slice())
            .copied()
            .unwrap_or(Action::turn_end(team)))
    }
}
