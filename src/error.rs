use std::fs::File;
use std::io::BufReader;

/// Error types that can occur while running the LSTM engine
///
/// # Variants
///
/// - `ShapeMismatch` - indicates that constructor sizes, an input feature width,
///   a window length, or target dimensions are inconsistent with the model
/// - `NumericalInstability` - indicates that a `NaN` or infinite value appeared in
///   forward outputs, gradient accumulators, or updated parameters
/// - `ProcessingError` - indicates that an operation was invoked in the wrong order,
///   e.g. `backward` without a matching `forward`
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    ShapeMismatch(String),
    NumericalInstability(String),
    ProcessingError(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            ModelError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            ModelError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Input/Output error types that can occur during model serialization and file operations
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, writing, file access)
/// - `JsonError` - Wraps JSON serialization/deserialization errors when working with stored weights
/// - `CorruptArtifact` - A stored model is structurally invalid: a named tensor is missing
///   or its shape disagrees with the declared `input_size`/`hidden_size`
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    CorruptArtifact(String),
}

impl IoError {
    pub fn load_in_buf_reader(path: &str) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(IoError::StdIoError)?;
        Ok(BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
            IoError::CorruptArtifact(msg) => write!(f, "Corrupt model artifact: {}", msg),
        }
    }
}

impl std::error::Error for IoError {}
