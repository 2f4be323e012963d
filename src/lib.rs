/// Module `error` contains the error taxonomies used across the crate.
///
/// Model-side failures (`ModelError`) cover shape inconsistencies, numerical
/// instability during training, and out-of-order operations; persistence
/// failures (`IoError`) cover file I/O, JSON serialization, and structurally
/// invalid stored artifacts. The engine never retries internally — every
/// error is fatal to the current operation and surfaced to the caller, who
/// decides whether to skip or halt.
pub mod error;

/// Module `math` contains the numeric helpers the engine is built on.
///
/// # Core Functions
///
/// - `sigmoid` - Numerically stable sigmoid for the three multiplicative gates
/// - `outer` - Vector outer product used by the BPTT weight-gradient accumulation
/// - `all_finite` - NaN/Inf detection for outputs, gradients, and parameters
/// - `mean_squared_error` - Evaluation metric for predictions
///
/// # Example
/// ```rust
/// use lstm_forecast::math::{outer, sigmoid};
/// use ndarray::array;
///
/// let s = sigmoid(0.0);
/// assert!((s - 0.5).abs() < 1e-12);
///
/// let m = outer(array![1.0, 2.0].view(), array![3.0, 4.0].view());
/// assert_eq!(m, array![[3.0, 4.0], [6.0, 8.0]]);
/// ```
pub mod math;

/// Module `model` contains the recurrent sequence-learning engine.
///
/// A single-layer LSTM cell plus a linear readout, implemented from first
/// principles: the forward pass advances the cell one timestep at a time and
/// caches every gate activation, the backward pass derives all fourteen
/// parameter gradients by the LSTM chain rule (backpropagation-through-time),
/// and the updater applies plain gradient descent. Trained models round-trip
/// through a JSON artifact that stores every named tensor plus the two size
/// hyperparameters.
///
/// # Core Components
///
/// - `LstmModel` - Parameter store, forward/backward/update, prediction, training loop
/// - `Gate` - One gate's kernel, recurrent kernel, bias, and gradient slots
/// - `GateGradient` - Zero-initialized per-gate gradient accumulator
/// - `SerializableLstmModel` - Named-tensor persistence container
///
/// # Example
/// ```rust
/// use lstm_forecast::model::LstmModel;
/// use ndarray::{array, Array1, Array2};
///
/// // Two tracked categories, four hidden units
/// let mut model = LstmModel::new(2, 4).unwrap();
///
/// let sequences: Vec<Array2<f64>> = vec![array![[0.1, 0.5], [0.2, 0.6], [0.3, 0.7]]];
/// let targets: Vec<Array1<f64>> = vec![array![0.4, 0.8]];
///
/// let losses = model.train(&sequences, &targets, 20, 0.05).unwrap();
/// assert_eq!(losses.len(), 20);
///
/// let prediction = model.predict(sequences[0].view()).unwrap();
/// assert_eq!(prediction.len(), 2);
/// ```
pub mod model;

/// A convenience module that re-exports the most commonly used types from this crate.
///
/// # Example
/// ```rust
/// use lstm_forecast::prelude::*;
///
/// // Quick access to LstmModel, MinMaxScaler, make_windows, error types, math helpers
/// ```
pub mod prelude;

/// Module `utility` contains the data-preparation helpers around the engine.
///
/// - `MinMaxScaler` - Per-column min-max scaling into `[0, 1]` with
///   invertible, persistable bounds
/// - `make_windows` - Sliding-window builder pairing each window of
///   consecutive periods with the following period as its target
pub mod utility;
