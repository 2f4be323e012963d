use super::*;
use rand_distr::{Distribution, Normal};

/// Standard deviation for the zero-mean normal weight initializer.
/// Small enough to keep early gate pre-activations in the linear region
/// of sigmoid/tanh for min-max scaled inputs.
const WEIGHT_INIT_STD: f64 = 0.01;

/// Parameters and gradient slots for a single LSTM gate.
///
/// Each of the four gates (input, forget, cell candidate, output) owns an
/// input kernel, a recurrent kernel, and a bias. The gradient slots are
/// `None` until a backward pass populates them and are consumed by the
/// SGD update.
///
/// # Fields
///
/// - `kernel` - Weight matrix for input connections with shape (hidden_size, input_size)
/// - `recurrent_kernel` - Weight matrix for recurrent connections with shape (hidden_size, hidden_size)
/// - `bias` - Bias vector of length hidden_size
/// - `grad_kernel` - Optional gradient for input weights, accumulated during backpropagation
/// - `grad_recurrent_kernel` - Optional gradient for recurrent weights, accumulated during backpropagation
/// - `grad_bias` - Optional gradient for bias terms, accumulated during backpropagation
pub struct Gate {
    pub kernel: Array2<f64>,
    pub recurrent_kernel: Array2<f64>,
    pub bias: Array1<f64>,
    pub grad_kernel: Option<Array2<f64>>,
    pub grad_recurrent_kernel: Option<Array2<f64>>,
    pub grad_bias: Option<Array1<f64>>,
}

impl Gate {
    /// Creates a gate with randomly initialized weights.
    ///
    /// Both kernels are drawn from a zero-mean normal distribution with a
    /// small standard deviation; the bias starts at zero.
    ///
    /// # Parameters
    ///
    /// - `input_size` - Dimensionality of the input features
    /// - `hidden_size` - Width of the cell (number of hidden units)
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - A new gate instance with initialized parameters
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If `input_size` or `hidden_size` is 0
    pub fn new(input_size: usize, hidden_size: usize) -> Result<Self, ModelError> {
        validate_dimension_greater_than_zero(input_size, "input_size")?;
        validate_dimension_greater_than_zero(hidden_size, "hidden_size")?;

        let normal = Normal::new(0.0, WEIGHT_INIT_STD).unwrap();
        let mut rng = rand::rng();

        let kernel =
            Array2::from_shape_fn((hidden_size, input_size), |_| normal.sample(&mut rng));
        let recurrent_kernel =
            Array2::from_shape_fn((hidden_size, hidden_size), |_| normal.sample(&mut rng));
        let bias = Array1::zeros(hidden_size);

        Ok(Self {
            kernel,
            recurrent_kernel,
            bias,
            grad_kernel: None,
            grad_recurrent_kernel: None,
            grad_bias: None,
        })
    }

    /// Computes the gate pre-activation: kernel . x_t + recurrent_kernel . h_prev + bias
    ///
    /// # Parameters
    ///
    /// - `x_t` - Input vector at the current timestep, length input_size
    /// - `h_prev` - Previous hidden state, length hidden_size
    ///
    /// # Returns
    ///
    /// * `Array1<f64>` - Pre-activation values of length hidden_size
    #[inline]
    pub fn pre_activation(&self, x_t: ArrayView1<f64>, h_prev: ArrayView1<f64>) -> Array1<f64> {
        self.kernel.dot(&x_t) + self.recurrent_kernel.dot(&h_prev) + &self.bias
    }

    /// Moves an accumulated gradient into this gate's gradient slots,
    /// replacing whatever a previous backward pass left there.
    #[inline]
    pub fn store_gradients(&mut self, grad: GateGradient) {
        self.grad_kernel = Some(grad.kernel);
        self.grad_recurrent_kernel = Some(grad.recurrent_kernel);
        self.grad_bias = Some(grad.bias);
    }

    /// Applies one gradient-descent step to this gate's parameters in place.
    ///
    /// Does nothing when no backward pass has stored gradients yet.
    ///
    /// # Parameters
    ///
    /// * `lr` - Learning rate
    #[inline]
    pub fn apply_sgd(&mut self, lr: f64) {
        if let (Some(gk), Some(grk), Some(gb)) = (
            &self.grad_kernel,
            &self.grad_recurrent_kernel,
            &self.grad_bias,
        ) {
            self.kernel = &self.kernel - &(lr * gk);
            self.recurrent_kernel = &self.recurrent_kernel - &(lr * grk);
            self.bias = &self.bias - &(lr * gb);
        }
    }
}

/// Zero-initialized gradient accumulator for one gate, rebuilt at the start
/// of every backward pass and handed to [`Gate::store_gradients`] at the end.
///
/// # Fields
///
/// - `kernel` - Accumulated input-kernel gradient, same shape as the gate kernel
/// - `recurrent_kernel` - Accumulated recurrent-kernel gradient
/// - `bias` - Accumulated bias gradient
pub struct GateGradient {
    pub kernel: Array2<f64>,
    pub recurrent_kernel: Array2<f64>,
    pub bias: Array1<f64>,
}

impl GateGradient {
    /// Creates a zero accumulator matching a gate sized by `(input_size, hidden_size)`.
    pub fn zeros(input_size: usize, hidden_size: usize) -> Self {
        Self {
            kernel: Array2::zeros((hidden_size, input_size)),
            recurrent_kernel: Array2::zeros((hidden_size, hidden_size)),
            bias: Array1::zeros(hidden_size),
        }
    }

    /// Accumulates one timestep's contribution from a gate delta vector.
    ///
    /// The delta is the gate's pre-activation gradient; the kernel gradient is
    /// its outer product with the cached input, the recurrent gradient its
    /// outer product with the cached previous hidden state.
    ///
    /// # Parameters
    ///
    /// - `delta` - Gate pre-activation gradient, length hidden_size
    /// - `x_t` - Cached input vector for the timestep
    /// - `h_prev` - Cached previous hidden state for the timestep
    #[inline]
    pub fn accumulate(
        &mut self,
        delta: ArrayView1<f64>,
        x_t: ArrayView1<f64>,
        h_prev: ArrayView1<f64>,
    ) {
        self.kernel += &outer(delta, x_t);
        self.recurrent_kernel += &outer(delta, h_prev);
        self.bias += &delta;
    }

    /// Returns whether every accumulated value is finite.
    pub fn is_finite(&self) -> bool {
        all_finite(self.kernel.iter())
            && all_finite(self.recurrent_kernel.iter())
            && all_finite(self.bias.iter())
    }
}

/// Validates that a dimension value is greater than 0
///
/// # Parameters
///
/// - `value` - The dimension value to validate
/// - `name` - The name of the dimension for error messages
///
/// # Returns
///
/// * `Ok(())` if validation passes
/// * `Err(ModelError)` if validation fails
pub(crate) fn validate_dimension_greater_than_zero(
    value: usize,
    name: &str,
) -> Result<(), ModelError> {
    if value == 0 {
        return Err(ModelError::ShapeMismatch(format!(
            "{} must be greater than 0",
            name
        )));
    }
    Ok(())
}
