//! The player interface.

use crate::core::{Action, Board, GameError, Team};

/// Something that picks actions for one team.
///
/// Players receive a read-only view of the board and answer with one
/// action. The game manager validates whatever comes back; an illegal answer
/// ends the game with an error naming the player.
pub trait Player {
    fn name(&self) -> &str;

    /// Choose the next action for `team`.
    ///
    /// `turn_start` is set on the first query of a team turn and
    /// `game_start` on the first query of the game.
    fn make_action(
        &mut self,
        board: &Board,
        team: Team,
        turn_start: bool,
        game_start: bool,
    ) -> Result<Action, GameError>;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn make_action(
        &mut self,
        board: &Board,
        team: Team,
        turn_start: bool,
        game_start: bool,
    ) -> Result<Action, GameError> {
        (**self).make_action(board, team, turn_start, game_start)
    }
}
