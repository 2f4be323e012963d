use super::*;
use rand_distr::{Distribution, Normal};

/// Values captured by one forward step, consumed by backpropagation-through-time.
///
/// One entry is appended per timestep, so after a forward pass over a
/// sequence of length `n` the cache holds exactly `n` entries. The backward
/// pass reads the entries in reverse order and the next forward pass
/// replaces them wholesale.
///
/// # Fields
///
/// - `x` - Input vector for the timestep
/// - `h_prev` - Hidden state entering the timestep
/// - `c_prev` - Cell state entering the timestep
/// - `i` - Input gate activation (sigmoid applied)
/// - `f` - Forget gate activation (sigmoid applied)
/// - `o` - Output gate activation (sigmoid applied)
/// - `g` - Candidate cell value (tanh applied)
/// - `c` - Resulting cell state
/// - `h` - Resulting hidden state
pub(crate) struct StepCache {
    pub x: Array1<f64>,
    pub h_prev: Array1<f64>,
    pub c_prev: Array1<f64>,
    pub i: Array1<f64>,
    pub f: Array1<f64>,
    pub o: Array1<f64>,
    pub g: Array1<f64>,
    pub c: Array1<f64>,
    pub h: Array1<f64>,
}

/// A single-layer LSTM cell with a linear readout, trained by manual
/// backpropagation-through-time.
///
/// The cell maps sequences of feature vectors (one scalar per tracked
/// category, one vector per time period) to a prediction for the following
/// period. Everything is computed from first principles: the forward pass
/// caches per-timestep gate activations, the backward pass derives every
/// parameter gradient by the LSTM chain rule, and the update is plain
/// gradient descent. There is no batching and no framework layer
/// abstraction; the model is sized for small per-entity datasets.
///
/// # Mathematical Operations
///
/// For each timestep t:
/// 1. i_t = σ(W_i·x_t + U_i·h_{t-1} + b_i)  (Input gate)
/// 2. f_t = σ(W_f·x_t + U_f·h_{t-1} + b_f)  (Forget gate)
/// 3. o_t = σ(W_o·x_t + U_o·h_{t-1} + b_o)  (Output gate)
/// 4. g_t = tanh(W_c·x_t + U_c·h_{t-1} + b_c)  (Candidate cell value)
/// 5. c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t  (Cell state update)
/// 6. h_t = o_t ⊙ tanh(c_t)  (Hidden state update)
/// 7. y_t = W_y·h_t + b_y  (Linear readout)
///
/// Where σ is the sigmoid function and ⊙ is element-wise multiplication.
///
/// # Example
/// ```rust
/// use lstm_forecast::model::LstmModel;
/// use ndarray::array;
///
/// let mut model = LstmModel::new(2, 4).unwrap();
///
/// // One window of three scaled monthly vectors, two categories each
/// let window = array![[0.10, 0.20], [0.15, 0.25], [0.20, 0.30]];
///
/// let next_month = model.predict(window.view()).unwrap();
/// assert_eq!(next_month.len(), 2);
/// ```
pub struct LstmModel {
    pub(crate) input_size: usize,
    pub(crate) hidden_size: usize,

    // Four gates: input, forget, candidate cell, output
    pub(crate) input_gate: Gate,
    pub(crate) forget_gate: Gate,
    pub(crate) cell_gate: Gate,
    pub(crate) output_gate: Gate,

    // Linear readout: y_t = W_y . h_t + b_y
    pub(crate) output_kernel: Array2<f64>,
    pub(crate) output_bias: Array1<f64>,
    pub(crate) grad_output_kernel: Option<Array2<f64>>,
    pub(crate) grad_output_bias: Option<Array1<f64>>,

    // One entry per timestep of the most recent forward pass
    pub(crate) cache: Vec<StepCache>,
}

impl LstmModel {
    /// Creates a new LSTM model with randomly initialized parameters
    ///
    /// All eight gate weight matrices and the readout matrix are drawn from a
    /// zero-mean normal distribution with small standard deviation; every
    /// bias starts at zero. Shapes are fixed by the two sizes and never
    /// change afterwards.
    ///
    /// # Parameters
    ///
    /// - `input_size` - Number of features per timestep (tracked categories)
    /// - `hidden_size` - Width of the cell (number of hidden units)
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - A new `LstmModel` instance
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If `input_size` or `hidden_size` is 0
    pub fn new(input_size: usize, hidden_size: usize) -> Result<Self, ModelError> {
        gate::validate_dimension_greater_than_zero(input_size, "input_size")?;
        gate::validate_dimension_greater_than_zero(hidden_size, "hidden_size")?;

        let normal = Normal::new(0.0, 0.01).unwrap();
        let mut rng = rand::rng();
        let output_kernel =
            Array2::from_shape_fn((input_size, hidden_size), |_| normal.sample(&mut rng));
        let output_bias = Array1::zeros(input_size);

        Ok(Self {
            input_size,
            hidden_size,
            input_gate: Gate::new(input_size, hidden_size)?,
            forget_gate: Gate::new(input_size, hidden_size)?,
            cell_gate: Gate::new(input_size, hidden_size)?,
            output_gate: Gate::new(input_size, hidden_size)?,
            output_kernel,
            output_bias,
            grad_output_kernel: None,
            grad_output_bias: None,
            cache: Vec::new(),
        })
    }

    /// Gets the `input_size` field.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Gets the `hidden_size` field.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Runs the cell across a full input sequence
    ///
    /// Advances the cell one timestep at a time starting from zero hidden and
    /// cell states, caching every intermediate gate activation for the
    /// backward pass. The cache from any previous call is replaced, so only
    /// one forward/backward cycle can be outstanding at a time.
    ///
    /// # Parameters
    ///
    /// * `sequence` - Input window with shape (timesteps, input_size)
    ///
    /// # Returns
    ///
    /// * `Result<Array2<f64>, ModelError>` - Readout outputs with shape (timesteps, input_size)
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the sequence is empty or its feature width differs from `input_size`
    /// - `ModelError::NumericalInstability` - If a non-finite value appears in the outputs
    pub fn forward(&mut self, sequence: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        let seq_len = sequence.nrows();
        if seq_len == 0 {
            return Err(ModelError::ShapeMismatch(
                "input sequence must contain at least one timestep".to_string(),
            ));
        }
        if sequence.ncols() != self.input_size {
            return Err(ModelError::ShapeMismatch(format!(
                "input sequence has {} features per timestep, model expects {}",
                sequence.ncols(),
                self.input_size
            )));
        }

        self.cache = Vec::with_capacity(seq_len);

        let mut h = Array1::<f64>::zeros(self.hidden_size);
        let mut c = Array1::<f64>::zeros(self.hidden_size);
        let mut outputs = Array2::<f64>::zeros((seq_len, self.input_size));

        for t in 0..seq_len {
            let x = sequence.row(t).to_owned();

            let i_t = self
                .input_gate
                .pre_activation(x.view(), h.view())
                .mapv(sigmoid);
            let f_t = self
                .forget_gate
                .pre_activation(x.view(), h.view())
                .mapv(sigmoid);
            let o_t = self
                .output_gate
                .pre_activation(x.view(), h.view())
                .mapv(sigmoid);
            let g_t = self
                .cell_gate
                .pre_activation(x.view(), h.view())
                .mapv(f64::tanh);

            // c_t = f_t * c_prev + i_t * g_t
            let c_t = &f_t * &c + &i_t * &g_t;

            // h_t = o_t * tanh(c_t)
            let h_t = &o_t * &c_t.mapv(f64::tanh);

            // y_t = W_y . h_t + b_y
            let y_t = self.output_kernel.dot(&h_t) + &self.output_bias;
            outputs.row_mut(t).assign(&y_t);

            self.cache.push(StepCache {
                x,
                h_prev: h,
                c_prev: c,
                i: i_t,
                f: f_t,
                o: o_t,
                g: g_t,
                c: c_t.clone(),
                h: h_t.clone(),
            });

            h = h_t;
            c = c_t;
        }

        if !all_finite(outputs.iter()) {
            return Err(ModelError::NumericalInstability(
                "non-finite value in forward outputs".to_string(),
            ));
        }

        Ok(outputs)
    }

    /// Backpropagation-through-time over the most recent forward pass
    ///
    /// Walks the cached timesteps from last to first, accumulating a gradient
    /// for every parameter and the squared-error loss against the target at
    /// each timestep. The gradients are stored on the model for the next
    /// [`update_parameters`](Self::update_parameters) call.
    ///
    /// # Parameters
    ///
    /// * `targets` - Per-timestep target matrix with shape (timesteps, input_size),
    ///   matching the sequence passed to the preceding `forward` call
    ///
    /// # Returns
    ///
    /// * `Result<f64, ModelError>` - The mean loss over the sequence length
    ///
    /// # Errors
    ///
    /// - `ModelError::ProcessingError` - If no forward pass has been run
    /// - `ModelError::ShapeMismatch` - If the target dimensions do not match the cached sequence
    /// - `ModelError::NumericalInstability` - If a non-finite value appears in a gradient accumulator
    pub fn backward(&mut self, targets: ArrayView2<f64>) -> Result<f64, ModelError> {
        if self.cache.is_empty() {
            return Err(ModelError::ProcessingError(
                "forward pass has not been run".to_string(),
            ));
        }
        let seq_len = self.cache.len();
        if targets.nrows() != seq_len || targets.ncols() != self.input_size {
            return Err(ModelError::ShapeMismatch(format!(
                "targets have shape ({}, {}), expected ({}, {})",
                targets.nrows(),
                targets.ncols(),
                seq_len,
                self.input_size
            )));
        }

        let mut grad_input = GateGradient::zeros(self.input_size, self.hidden_size);
        let mut grad_forget = GateGradient::zeros(self.input_size, self.hidden_size);
        let mut grad_cell = GateGradient::zeros(self.input_size, self.hidden_size);
        let mut grad_output = GateGradient::zeros(self.input_size, self.hidden_size);
        let mut grad_out_kernel = Array2::<f64>::zeros((self.input_size, self.hidden_size));
        let mut grad_out_bias = Array1::<f64>::zeros(self.input_size);

        let mut dh_next = Array1::<f64>::zeros(self.hidden_size);
        let mut dc_next = Array1::<f64>::zeros(self.hidden_size);

        let mut loss = 0.0;

        for t in (0..seq_len).rev() {
            let step = &self.cache[t];

            // Readout error: dy_t = y_t - target_t, loss += 0.5 * |dy_t|^2
            let y_t = self.output_kernel.dot(&step.h) + &self.output_bias;
            let dy = &y_t - &targets.row(t);
            loss += 0.5 * dy.dot(&dy);

            grad_out_kernel += &outer(dy.view(), step.h.view());
            grad_out_bias += &dy;

            // Hidden state gradient, with the carry-in from the later timestep
            let dh = self.output_kernel.t().dot(&dy) + &dh_next;

            let c_tanh = step.c.mapv(f64::tanh);

            // Output gate: d_o = dh * tanh(c_t) * o * (1 - o)
            let d_o = &dh * &c_tanh * &step.o * &step.o.mapv(|v| 1.0 - v);

            // Cell state gradient combines the output-gate path with the carried-in dc
            let dc = &dh * &step.o * &c_tanh.mapv(|v| 1.0 - v * v) + &dc_next;

            // Candidate: d_g = dc * i * (1 - g^2)
            let d_g = &dc * &step.i * &step.g.mapv(|v| 1.0 - v * v);

            // Input gate: d_i = dc * g * i * (1 - i)
            let d_i = &dc * &step.g * &step.i * &step.i.mapv(|v| 1.0 - v);

            // Forget gate: d_f = dc * c_prev * f * (1 - f)
            let d_f = &dc * &step.c_prev * &step.f * &step.f.mapv(|v| 1.0 - v);

            grad_output.accumulate(d_o.view(), step.x.view(), step.h_prev.view());
            grad_cell.accumulate(d_g.view(), step.x.view(), step.h_prev.view());
            grad_input.accumulate(d_i.view(), step.x.view(), step.h_prev.view());
            grad_forget.accumulate(d_f.view(), step.x.view(), step.h_prev.view());

            // Carry-outs for the previous timestep
            dh_next = self.input_gate.recurrent_kernel.t().dot(&d_i)
                + self.forget_gate.recurrent_kernel.t().dot(&d_f)
                + self.output_gate.recurrent_kernel.t().dot(&d_o)
                + self.cell_gate.recurrent_kernel.t().dot(&d_g);
            dc_next = &dc * &step.f;
        }

        let accumulators_finite = grad_input.is_finite()
            && grad_forget.is_finite()
            && grad_cell.is_finite()
            && grad_output.is_finite()
            && all_finite(grad_out_kernel.iter())
            && all_finite(grad_out_bias.iter());
        if !accumulators_finite {
            return Err(ModelError::NumericalInstability(
                "non-finite value in gradient accumulators".to_string(),
            ));
        }

        self.input_gate.store_gradients(grad_input);
        self.forget_gate.store_gradients(grad_forget);
        self.cell_gate.store_gradients(grad_cell);
        self.output_gate.store_gradients(grad_output);
        self.grad_output_kernel = Some(grad_out_kernel);
        self.grad_output_bias = Some(grad_out_bias);

        Ok(loss / seq_len as f64)
    }

    /// Applies one gradient-descent step to every parameter tensor in place
    ///
    /// Each of the four gates and the readout is updated with an explicit
    /// statement (`param -= lr * grad`); tensors whose gradient slot is still
    /// empty are left untouched.
    ///
    /// # Parameters
    ///
    /// * `learning_rate` - Step size for gradient descent
    ///
    /// # Errors
    ///
    /// - `ModelError::NumericalInstability` - If a non-finite value appears in an updated parameter
    pub fn update_parameters(&mut self, learning_rate: f64) -> Result<(), ModelError> {
        self.input_gate.apply_sgd(learning_rate);
        self.forget_gate.apply_sgd(learning_rate);
        self.cell_gate.apply_sgd(learning_rate);
        self.output_gate.apply_sgd(learning_rate);

        if let (Some(gk), Some(gb)) = (&self.grad_output_kernel, &self.grad_output_bias) {
            self.output_kernel = &self.output_kernel - &(learning_rate * gk);
            self.output_bias = &self.output_bias - &(learning_rate * gb);
        }

        if !self.parameters_finite() {
            return Err(ModelError::NumericalInstability(
                "non-finite value in updated parameters".to_string(),
            ));
        }
        Ok(())
    }

    /// Predicts the feature vector for the period following the input window
    ///
    /// Runs a single forward pass and returns the last timestep's readout.
    /// Values are on the scaled range the model was trained on; undoing the
    /// scaling is the caller's responsibility.
    ///
    /// # Parameters
    ///
    /// * `sequence` - Input window with shape (timesteps, input_size)
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - Predicted vector of length `input_size`
    pub fn predict(&mut self, sequence: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let outputs = self.forward(sequence)?;
        let last = outputs.nrows() - 1;
        Ok(outputs.row(last).to_owned())
    }

    fn parameters_finite(&self) -> bool {
        let gates = [
            &self.input_gate,
            &self.forget_gate,
            &self.cell_gate,
            &self.output_gate,
        ];
        gates.iter().all(|g| {
            all_finite(g.kernel.iter())
                && all_finite(g.recurrent_kernel.iter())
                && all_finite(g.bias.iter())
        }) && all_finite(self.output_kernel.iter())
            && all_finite(self.output_bias.iter())
    }
}
