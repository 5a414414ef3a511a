//! Board evaluation.
//!
//! - **Evaluators**: `StateEvaluator` with `HpRatioEvaluator` and
//!   `MaterialEvaluator` built in
//! - **Encoding**: `BoardEncoder` turns a board into plane tensors for
//!   external models, plugged in through `ValueModel` and `ModelEvaluator`

pub mod encoder;
pub mod traits;

pub use encoder::BoardEncoder;
pub use traits::{
    EncodedState, HpRatioEvaluator, MaterialEvaluator, ModelEvaluator, StateEvaluator, ValueModel,
};
