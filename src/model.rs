/// Module that contains the per-gate parameter bundle and gradient accumulator
pub mod gate;
/// Module that contains the LSTM cell: parameter store, forward pass, BPTT backward pass and SGD update
pub mod lstm;
/// Module that contains weight serialization for saving and loading trained models
pub mod serialize;
/// Module that contains the fixed-epoch training loop
pub mod trainer;

pub use gate::*;
pub use lstm::*;
pub use serialize::*;

pub(crate) use crate::error::ModelError;
pub(crate) use crate::math::{all_finite, outer, sigmoid};
pub(crate) use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
