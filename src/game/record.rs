//! Game records for replay and archival.
//!
//! A record holds the starting board and every applied action with the
//! damage it resolved to. Replaying re-validates each action, so a record
//! that no longer matches the rules is reported at the step where it
//! diverges.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Action, Board, Damage, GameError, Team};
use crate::rules::{apply, validate, GameResult};

/// One applied action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub action: Action,
    pub damage: Option<Damage>,
}

/// A complete or partial game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub initial: Board,
    pub first_team: Team,
    pub actions: Vec<RecordedAction>,
    pub result: Option<GameResult>,
}

impl GameRecord {
    pub fn new(initial: &Board) -> Self {
        Self {
            initial: initial.clone(),
            first_team: initial.to_move(),
            actions: Vec::new(),
            result: None,
        }
    }

    pub fn push(&mut self, action: Action, damage: Option<Damage>) {
        self.actions.push(RecordedAction { action, damage });
    }

    pub fn set_result(&mut self, result: GameResult) {
        self.result = Some(result);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a record, rejecting one whose starting board is malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GameError> {
        let record: Self = bincode::deserialize(bytes)?;
        record.initial.check_snapshot()?;
        Ok(record)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Re-apply every action from the initial board and return the final
    /// board.
    pub fn replay(&self) -> Result<Board, GameError> {
        let mut board = self.initial.clone();
        for (step, recorded) in self.actions.iter().enumerate() {
            let action = &recorded.action;
            validate(&board, action.team(), action).map_err(|source| GameError::Replay { step, source })?;
            let undo = apply(&mut board, action).map_err(|source| GameError::Replay { step, source })?;
            if undo.damage() != recorded.damage {
                return Err(GameError::ReplayDamage {
                    step,
                    recorded: recorded.damage,
                    replayed: undo.damage(),
                });
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IllegalAction, MapError, Pos, UnitId, UnitType};

    fn board() -> Board {
        let mut board = Board::new(3, 1).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Red, Pos::new(0, 0), 10).unwrap();
        board.spawn_unit(UnitType::Infantry, Team::Blue, Pos::new(2, 0), 10).unwrap();
        board
    }

    fn played() -> (GameRecord, Board) {
        let mut live = board();
        let mut record = GameRecord::new(&live);
        let attack = Action::attack(Team::Red, UnitId::new(0), Pos::new(1, 0), UnitId::new(1));
        let undo = apply(&mut live, &attack).unwrap();
        record.push(attack, undo.damage());
        let retreat = Action::move_to(Team::Blue, UnitId::new(1), Pos::new(2, 0));
        let undo = apply(&mut live, &retreat).unwrap();
        record.push(retreat, undo.damage());
        (record, live)
    }

    #[test]
    fn test_replay_matches_live_game() {
        let (record, live) = played();
        assert_eq!(record.len(), 2);
        assert!(record.actions[0].damage.is_some());
        assert_eq!(record.replay().unwrap(), live);
    }

    #[test]
    fn test_bytes_round_trip() {
        let (mut record, _) = played();
        record.set_result(GameResult::Draw);
        let restored = GameRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, record);
        assert!(GameRecord::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_from_bytes_rejects_malformed_board() {
        let (record, _) = played();
        let mut bytes = record.to_bytes().unwrap();
        // width is the first byte of the encoded board
        bytes[0] = 10;
        assert!(matches!(
            GameRecord::from_bytes(&bytes),
            Err(GameError::Map(MapError::RowCount { expected: 10, found: 3 }))
        ));
    }

    #[test]
    fn test_replay_reports_divergence() {
        let (mut record, _) = played();
        record.actions.swap(0, 1);
        match record.replay() {
            Err(GameError::Replay { step: 0, source }) => {
                assert!(matches!(source, IllegalAction::NotYourTurn { .. }));
            }
            other => panic!("unexpected replay result: {other:?}"),
        }

        let (mut record, _) = played();
        record.actions[0].damage = Some(Damage { dealt: 1, counter: 0 });
        assert!(matches!(record.replay(), Err(GameError::ReplayDamage { step: 0, .. })));
    }
}
