use super::*;
use indicatif::{ProgressBar, ProgressStyle};

impl LstmModel {
    /// Trains the model over a set of windows for a fixed number of epochs
    ///
    /// For each epoch, each sequence is processed in the supplied order with
    /// one forward pass, one backward pass and one parameter update — no
    /// shuffling, no early stopping, no validation split. The per-sequence
    /// losses are averaged into one value per epoch.
    ///
    /// The target the backward pass sees at each timestep is the next input
    /// row of the window, with the caller's next-period vector as the target
    /// of the final timestep, so every timestep trains the readout to predict
    /// the following period.
    ///
    /// # Parameters
    ///
    /// - `sequences` - Training windows, each with shape (window, input_size)
    /// - `targets` - One next-period vector of length `input_size` per window
    /// - `epochs` - Number of full passes over the training set
    /// - `learning_rate` - Step size for the per-sequence gradient-descent update
    ///
    /// # Returns
    ///
    /// * `Result<Vec<f64>, ModelError>` - Average loss per epoch, in order
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the training set is empty, the number of targets
    ///   differs from the number of sequences, or any sequence/target dimension is
    ///   inconsistent with `input_size`
    /// - `ModelError::NumericalInstability` - Propagated from forward, backward, or update
    ///
    /// # Example
    /// ```rust
    /// use lstm_forecast::model::LstmModel;
    /// use ndarray::{array, Array1, Array2};
    ///
    /// let mut model = LstmModel::new(1, 3).unwrap();
    /// let sequences: Vec<Array2<f64>> = vec![array![[0.1], [0.2], [0.3]]];
    /// let targets: Vec<Array1<f64>> = vec![array![0.4]];
    ///
    /// let losses = model.train(&sequences, &targets, 10, 0.05).unwrap();
    /// assert_eq!(losses.len(), 10);
    /// ```
    pub fn train(
        &mut self,
        sequences: &[Array2<f64>],
        targets: &[Array1<f64>],
        epochs: u32,
        learning_rate: f64,
    ) -> Result<Vec<f64>, ModelError> {
        self.validate_training_inputs(sequences, targets)?;

        // Create progress bar for training epochs
        let progress_bar = ProgressBar::new(epochs as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} | Loss: {msg}")
                .expect("Failed to set progress bar template")
                .progress_chars("█▓░"),
        );

        let mut loss_history = Vec::with_capacity(epochs as usize);

        for _ in 0..epochs {
            let mut total_loss = 0.0;

            for (sequence, target) in sequences.iter().zip(targets.iter()) {
                let step_targets = next_step_targets(sequence.view(), target.view());

                self.forward(sequence.view())?;
                let loss = self.backward(step_targets.view())?;
                self.update_parameters(learning_rate)?;

                total_loss += loss;
            }

            let avg_loss = total_loss / sequences.len() as f64;
            loss_history.push(avg_loss);

            progress_bar.set_message(format!("{:.6}", avg_loss));
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Training completed");

        Ok(loss_history)
    }

    /// Validates the training set against the model dimensions
    ///
    /// # Parameters
    ///
    /// - `sequences` - Training windows to validate
    /// - `targets` - Next-period target vectors to validate
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If validation passes
    /// - `Err(ModelError)` - If validation fails
    fn validate_training_inputs(
        &self,
        sequences: &[Array2<f64>],
        targets: &[Array1<f64>],
    ) -> Result<(), ModelError> {
        if sequences.is_empty() {
            return Err(ModelError::ShapeMismatch(
                "training set must contain at least one sequence".to_string(),
            ));
        }
        if sequences.len() != targets.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "got {} sequences but {} targets",
                sequences.len(),
                targets.len()
            )));
        }

        for (idx, (sequence, target)) in sequences.iter().zip(targets.iter()).enumerate() {
            if sequence.nrows() == 0 {
                return Err(ModelError::ShapeMismatch(format!(
                    "sequence {} is empty",
                    idx
                )));
            }
            if sequence.ncols() != self.input_size {
                return Err(ModelError::ShapeMismatch(format!(
                    "sequence {} has {} features per timestep, model expects {}",
                    idx,
                    sequence.ncols(),
                    self.input_size
                )));
            }
            if target.len() != self.input_size {
                return Err(ModelError::ShapeMismatch(format!(
                    "target {} has length {}, model expects {}",
                    idx,
                    target.len(),
                    self.input_size
                )));
            }
        }

        Ok(())
    }
}

/// Builds the per-timestep target matrix for one training window.
///
/// Row `t` is the window's row `t + 1`; the final row is the caller-supplied
/// next-period vector. This trains the readout to predict the following
/// period at every position in the window.
fn next_step_targets(sequence: ArrayView2<f64>, target: ArrayView1<f64>) -> Array2<f64> {
    let seq_len = sequence.nrows();
    let width = sequence.ncols();

    let mut step_targets = Array2::<f64>::zeros((seq_len, width));
    for t in 0..seq_len - 1 {
        step_targets.row_mut(t).assign(&sequence.row(t + 1));
    }
    step_targets.row_mut(seq_len - 1).assign(&target);

    step_targets
}
