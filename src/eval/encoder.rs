//! Board encoding for model input.
//!
//! Planes, each `height x width`, in this order:
//!
//! | planes | content |
//! |---|---|
//! | 7 | terrain one-hot |
//! | 6 | own units by type, value = hp / 10 |
//! | 6 | enemy units by type, value = hp / 10 |
//! | 1 | acted flag of any unit |
//! | 1 | constant 1 when the perspective team is on move |
//!
//! The perspective team's units always come first, so one model serves
//! both sides.

use crate::core::{Board, Pos, Team, Terrain, UnitType, MAX_HP};

use super::traits::EncodedState;

/// Encodes boards into plane tensors.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoardEncoder;

impl BoardEncoder {
    const TERRAIN: usize = 0;
    const OWN: usize = Self::TERRAIN + Terrain::COUNT;
    const ENEMY: usize = Self::OWN + UnitType::COUNT;
    const ACTED: usize = Self::ENEMY + UnitType::COUNT;
    const TO_MOVE: usize = Self::ACTED + 1;

    /// Number of planes per encoded board.
    pub const CHANNELS: usize = Self::TO_MOVE + 1;

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Shape of the tensor produced for `board`.
    #[must_use]
    pub fn output_shape(&self, board: &Board) -> Vec<usize> {
        vec![Self::CHANNELS, usize::from(board.height()), usize::from(board.width())]
    }

    /// Encode `board` from `perspective`'s point of view.
    #[must_use]
    pub fn encode(&self, board: &Board, perspective: Team) -> EncodedState {
        let (w, h) = (usize::from(board.width()), usize::from(board.height()));
        let mut state = EncodedState::zeros(self.output_shape(board));
        let at = |plane: usize, pos: Pos| plane * w * h + usize::from(pos.y) * w + usize::from(pos.x);

        for y in 0..board.height() {
            for x in 0..board.width() {
                let pos = Pos::new(x, y);
                let terrain = board.terrain_at(pos).code() as usize;
                state.tensor[at(Self::TERRAIN + terrain, pos)] = 1.0;
            }
        }

        for unit in board.units() {
            let base = if unit.team == perspective { Self::OWN } else { Self::ENEMY };
            state.tensor[at(base + unit.kind.index(), unit.pos)] = f32::from(unit.hp) / f32::from(MAX_HP);
            if unit.acted {
                state.tensor[at(Self::ACTED, unit.pos)] = 1.0;
            }
        }

        if board.to_move() == perspective {
            let plane = Self::TO_MOVE * w * h;
            state.tensor[plane..plane + w * h].fill(1.0);
        }
        state
    }
}
