use super::*;
use crate::error::IoError;
use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Serializable representation of a single gate's weights.
///
/// # Fields
///
/// - `kernel` - Input weight matrix as nested vectors, shape (hidden_size, input_size)
/// - `recurrent_kernel` - Recurrent weight matrix, shape (hidden_size, hidden_size)
/// - `bias` - Bias vector of length hidden_size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableGateWeight {
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Serializable representation of the full parameter set.
///
/// Holds every named tensor of the model — four gates of three tensors each,
/// the readout kernel and bias — plus the two size hyperparameters needed to
/// validate their shapes on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableLstmModel {
    pub input_size: usize,
    pub hidden_size: usize,
    pub input_gate: SerializableGateWeight,
    pub forget_gate: SerializableGateWeight,
    pub cell_gate: SerializableGateWeight,
    pub output_gate: SerializableGateWeight,
    pub output_kernel: Vec<Vec<f64>>,
    pub output_bias: Vec<f64>,
}

impl LstmModel {
    /// Saves the model parameters and size hyperparameters to a JSON file.
    ///
    /// The stored artifact contains every named tensor; gradients, caches and
    /// training state are not part of it. Round-tripping through
    /// [`load_from_path`](Self::load_from_path) reproduces the parameters to
    /// floating-point serialization precision.
    ///
    /// # Parameters
    ///
    /// * `path` - File path where the model will be saved (e.g., "stored_model.json")
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Model successfully saved to file
    /// - `Err(IoError::StdIoError)` - File creation or write operation failed
    /// - `Err(IoError::JsonError)` - Serialization to JSON failed
    pub fn save_to_path(&self, path: &str) -> Result<(), IoError> {
        let serializable = SerializableLstmModel {
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            input_gate: serialize_gate(&self.input_gate),
            forget_gate: serialize_gate(&self.forget_gate),
            cell_gate: serialize_gate(&self.cell_gate),
            output_gate: serialize_gate(&self.output_gate),
            output_kernel: array2_to_vec2(&self.output_kernel),
            output_bias: self.output_bias.to_vec(),
        };

        let file = File::create(path).map_err(IoError::StdIoError)?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, &serializable).map_err(IoError::JsonError)?;
        writer.flush().map_err(IoError::StdIoError)?;

        Ok(())
    }

    /// Loads a model from a JSON file written by [`save_to_path`](Self::save_to_path).
    ///
    /// Every named tensor is checked against the declared `input_size` and
    /// `hidden_size`; nothing is reconstructed from a structurally invalid
    /// artifact.
    ///
    /// # Parameters
    ///
    /// * `path` - File path from which to load the model
    ///
    /// # Returns
    ///
    /// - `Ok(LstmModel)` - The reconstructed model
    /// - `Err(IoError::StdIoError)` - File could not be opened or read
    /// - `Err(IoError::CorruptArtifact)` - A named tensor is missing, malformed,
    ///   or its shape disagrees with the declared sizes
    pub fn load_from_path(path: &str) -> Result<LstmModel, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let stored: SerializableLstmModel = serde_json::from_reader(reader)
            .map_err(|e| IoError::CorruptArtifact(e.to_string()))?;

        let input_size = stored.input_size;
        let hidden_size = stored.hidden_size;
        if input_size == 0 || hidden_size == 0 {
            return Err(IoError::CorruptArtifact(format!(
                "declared sizes must be positive, got input_size={}, hidden_size={}",
                input_size, hidden_size
            )));
        }

        let mut model = LstmModel::new(input_size, hidden_size)
            .map_err(|e| IoError::CorruptArtifact(e.to_string()))?;

        apply_gate(&mut model.input_gate, &stored.input_gate, "input_gate", input_size, hidden_size)?;
        apply_gate(&mut model.forget_gate, &stored.forget_gate, "forget_gate", input_size, hidden_size)?;
        apply_gate(&mut model.cell_gate, &stored.cell_gate, "cell_gate", input_size, hidden_size)?;
        apply_gate(&mut model.output_gate, &stored.output_gate, "output_gate", input_size, hidden_size)?;

        model.output_kernel = vec2_to_array2(
            &stored.output_kernel,
            (input_size, hidden_size),
            "output_kernel",
        )?;
        model.output_bias = vec_to_array1(&stored.output_bias, input_size, "output_bias")?;

        Ok(model)
    }
}

fn serialize_gate(gate: &Gate) -> SerializableGateWeight {
    SerializableGateWeight {
        kernel: array2_to_vec2(&gate.kernel),
        recurrent_kernel: array2_to_vec2(&gate.recurrent_kernel),
        bias: gate.bias.to_vec(),
    }
}

fn apply_gate(
    gate: &mut Gate,
    stored: &SerializableGateWeight,
    name: &str,
    input_size: usize,
    hidden_size: usize,
) -> Result<(), IoError> {
    gate.kernel = vec2_to_array2(
        &stored.kernel,
        (hidden_size, input_size),
        &format!("{}.kernel", name),
    )?;
    gate.recurrent_kernel = vec2_to_array2(
        &stored.recurrent_kernel,
        (hidden_size, hidden_size),
        &format!("{}.recurrent_kernel", name),
    )?;
    gate.bias = vec_to_array1(&stored.bias, hidden_size, &format!("{}.bias", name))?;
    Ok(())
}

fn array2_to_vec2(array: &Array2<f64>) -> Vec<Vec<f64>> {
    array.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn vec2_to_array2(
    vec: &[Vec<f64>],
    expected: (usize, usize),
    name: &str,
) -> Result<Array2<f64>, IoError> {
    let (rows, cols) = expected;
    if vec.len() != rows || vec.iter().any(|row| row.len() != cols) {
        return Err(IoError::CorruptArtifact(format!(
            "tensor '{}' does not have the declared shape ({}, {})",
            name, rows, cols
        )));
    }
    let flat: Vec<f64> = vec.iter().flat_map(|row| row.iter().copied()).collect();
    Array2::from_shape_vec((rows, cols), flat).map_err(|e| {
        IoError::CorruptArtifact(format!("tensor '{}' could not be rebuilt: {}", name, e))
    })
}

fn vec_to_array1(vec: &[f64], expected: usize, name: &str) -> Result<Array1<f64>, IoError> {
    if vec.len() != expected {
        return Err(IoError::CorruptArtifact(format!(
            "tensor '{}' has length {}, declared length is {}",
            name,
            vec.len(),
            expected
        )));
    }
    Ok(Array1::from_vec(vec.to_vec()))
}
