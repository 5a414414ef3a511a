//! State evaluation interfaces.
//!
//! A [`StateEvaluator`] scores a board from one team's point of view. The
//! lookahead planner ranks its leaves with one, and MCTS can use one to
//! score rollouts cut off before the game ends.
//!
//! Learned models plug in through [`ValueModel`]: the board is encoded with
//! a [`BoardEncoder`](super::BoardEncoder) and the model maps the tensor to
//! a value. [`ModelEvaluator`] glues the two together.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Team, UnitType};

use super::encoder::BoardEncoder;

/// Encoded board as a flat tensor for model input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[channels, height, width]`.
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Scores a board for one team.
///
/// Implementations must be deterministic and return a value in `[0, 1]`,
/// where 1 is a certain win for `team`.
pub trait StateEvaluator: Send + Sync {
    fn evaluate(&self, board: &Board, team: Team) -> f64;

    /// Batch evaluation (optional optimization).
    fn evaluate_batch(&self, boards: &[Board], team: Team) -> Vec<f64> {
        boards.iter().map(|b| self.evaluate(b, team)).collect()
    }
}

/// Share of the total remaining hit points held by `team`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HpRatioEvaluator;

impl StateEvaluator for HpRatioEvaluator {
    fn evaluate(&self, board: &Board, team: Team) -> f64 {
        let mine = f64::from(board.total_hp(team));
        let theirs = f64::from(board.total_hp(team.opponent()));
        if mine + theirs == 0.0 {
            0.5
        } else {
            mine / (mine + theirs)
        }
    }
}

/// Hit points weighted by unit value.
///
/// Air units count most and infantry least, so trading infantry for a
/// fighter scores as a gain.
#[derive(Clone, Copy, Debug)]
pub struct MaterialEvaluator {
    weights: [f64; UnitType::COUNT],
}

impl MaterialEvaluator {
    /// Default unit values, indexed by [`UnitType::index`].
    pub const DEFAULT_WEIGHTS: [f64; UnitType::COUNT] = [2.0, 2.0, 1.5, 1.0, 0.7, 0.2];

    #[must_use]
    pub fn with_weights(weights: [f64; UnitType::COUNT]) -> Self {
        Self { weights }
    }

    fn material(&self, board: &Board, team: Team) -> f64 {
        board
            .team_units(team)
            .map(|u| f64::from(u.hp) * self.weights[u.kind.index()])
            .sum()
    }
}

impl Default for MaterialEvaluator {
    fn default() -> Self {
        Self::with_weights(Self::DEFAULT_WEIGHTS)
    }
}

impl StateEvaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, team: Team) -> f64 {
        let mine = self.material(board, team);
        let theirs = self.material(board, team.opponent());
        if mine + theirs <= 0.0 {
            0.5
        } else {
            mine / (mine + theirs)
        }
    }
}

/// A value model over encoded boards, typically backed by a trained network.
pub trait ValueModel: Send + Sync {
    /// Win probability for the perspective team the state was encoded for.
    fn predict(&self, encoded: &EncodedState) -> f32;

    /// Batch prediction (optional optimization).
    fn predict_batch(&self, encoded: &[EncodedState]) -> Vec<f32> {
        encoded.iter().map(|e| self.predict(e)).collect()
    }
}

/// [`StateEvaluator`] that encodes the board and asks a [`ValueModel`].
#[derive(Clone, Debug)]
pub struct ModelEvaluator<M> {
    encoder: BoardEncoder,
    model: M,
}

impl<M: ValueModel> ModelEvaluator<M> {
    pub fn new(encoder: BoardEncoder, model: M) -> Self {
        Self { encoder, model }
    }
}

impl<M: ValueModel> StateEvaluator for ModelEvaluator<M> {
    fn evaluate(&self, board: &Board, team: Team) -> f64 {
        let encoded = self.encoder.encode(board, team);
        f64::from(self.model.predict(&encoded)).clamp(0.0, 1.0)
    }

    fn evaluate_batch(&self, boards: &[Board], team: Team) -> Vec<f64> {
        let encoded: Vec<EncodedState> = boards.iter().map(|b| self.encoder.encode(b, team)).collect();
        self.model
            .predict_batch(&encoded)
            .into_iter()
            .map(|v| f64::from(v).clamp(0.0, 1.0))
            .collect()
    }
}
