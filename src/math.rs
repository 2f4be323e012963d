use ndarray::{Array2, ArrayView1};

/// Calculates the sigmoid function value for a given input
///
/// The sigmoid function transforms any real-valued number into a value
/// between 0 and 1, and is used by the three multiplicative LSTM gates.
///
/// # Parameters
///
/// * `z` - The input value to the sigmoid function
///
/// # Returns
///
/// * `f64` - The sigmoid of the input: 1 / (1 + e^(-z))
///
/// # Example
/// ```rust
/// use lstm_forecast::math::sigmoid;
///
/// let result = sigmoid(0.0);
/// assert!((result - 0.5).abs() < 1e-10);
/// ```
pub fn sigmoid(z: f64) -> f64 {
    // Use numerically stable computation for extreme values
    const MAX_SIGMOID_INPUT: f64 = 500.0;
    const MIN_SIGMOID_INPUT: f64 = -500.0;

    if z > MAX_SIGMOID_INPUT {
        // For very large positive values, sigmoid(z) approaches 1
        return 1.0;
    } else if z < MIN_SIGMOID_INPUT {
        // For very large negative values, sigmoid(z) approaches 0
        return 0.0;
    }

    // Standard computation for normal range
    1.0 / (1.0 + (-z).exp())
}

/// Computes the outer product of two vectors
///
/// Used during backpropagation-through-time to turn a per-gate delta vector
/// and a cached input (or previous hidden state) into a weight-shaped
/// gradient contribution.
///
/// # Parameters
///
/// - `a` - Left vector of length `m`
/// - `b` - Right vector of length `n`
///
/// # Returns
///
/// * `Array2<f64>` - The `m x n` matrix with entries `a[i] * b[j]`
pub fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    let m = a.len();
    let n = b.len();
    Array2::from_shape_fn((m, n), |(i, j)| a[i] * b[j])
}

/// Checks that every value in an iterator is a finite floating-point number
///
/// Training aborts with a numerical-instability error as soon as a `NaN` or
/// infinite value shows up in outputs, gradients, or updated parameters, so
/// this check runs after each of those stages.
///
/// # Parameters
///
/// * `values` - Iterator over the values to inspect
///
/// # Returns
///
/// * `bool` - `true` if all values are finite, `false` otherwise
pub fn all_finite<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().all(|v| v.is_finite())
}

/// Calculates the mean squared error between predicted and actual vectors
///
/// # Parameters
///
/// - `predicted` - Predicted values
/// - `actual` - Ground truth values
///
/// # Returns
///
/// * `f64` - The average of squared element-wise differences
pub fn mean_squared_error(predicted: ArrayView1<f64>, actual: ArrayView1<f64>) -> f64 {
    let n = predicted.len().max(1) as f64;
    predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a) * (p - a))
        .sum::<f64>()
        / n
}
