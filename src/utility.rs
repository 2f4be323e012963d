use crate::error::ModelError;
use crate::model::gate::validate_dimension_greater_than_zero;
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

/// Per-column min-max feature scaler.
///
/// Maps every column of a dataset into `[0, 1]` using the column's observed
/// minimum and maximum, which keeps gate activations in a well-conditioned
/// range during training. The fitted bounds can be read back out so a caller
/// can persist them next to a stored model and undo the scaling on
/// predictions later.
///
/// A column with zero range transforms to `0.0`.
///
/// # Example
/// ```rust
/// use lstm_forecast::utility::MinMaxScaler;
/// use ndarray::array;
///
/// let data = array![[100.0, 50.0], [110.0, 55.0], [120.0, 60.0]];
/// let scaler = MinMaxScaler::fit(data.view()).unwrap();
///
/// let scaled = scaler.transform(data.view()).unwrap();
/// assert!((scaled[[0, 0]] - 0.0).abs() < 1e-12);
/// assert!((scaled[[2, 0]] - 1.0).abs() < 1e-12);
///
/// let restored = scaler.inverse_transform_row(scaled.row(2)).unwrap();
/// assert!((restored[0] - 120.0).abs() < 1e-9);
/// ```
pub struct MinMaxScaler {
    data_min: Array1<f64>,
    data_max: Array1<f64>,
}

impl MinMaxScaler {
    /// Fits the scaler to a dataset, recording each column's minimum and maximum.
    ///
    /// # Parameters
    ///
    /// * `data` - Dataset with shape (periods, features)
    ///
    /// # Returns
    ///
    /// * `Result<Self, ModelError>` - A fitted scaler
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the dataset has no rows or no columns
    pub fn fit(data: ArrayView2<f64>) -> Result<Self, ModelError> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ModelError::ShapeMismatch(
                "cannot fit a scaler to an empty dataset".to_string(),
            ));
        }

        let mut data_min = Array1::from_elem(data.ncols(), f64::INFINITY);
        let mut data_max = Array1::from_elem(data.ncols(), f64::NEG_INFINITY);
        for row in data.rows() {
            for (j, &value) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(value);
                data_max[j] = data_max[j].max(value);
            }
        }

        Ok(Self { data_min, data_max })
    }

    /// Rebuilds a scaler from previously persisted per-column bounds.
    ///
    /// # Errors
    ///
    /// - `ModelError::ShapeMismatch` - If the two bound vectors differ in length or are empty
    pub fn from_bounds(data_min: Array1<f64>, data_max: Array1<f64>) -> Result<Self, ModelError> {
        if data_min.is_empty() || data_min.len() != data_max.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "bound vectors have lengths {} and {}",
                data_min.len(),
                data_max.len()
            )));
        }
        Ok(Self { data_min, data_max })
    }

    /// Gets the fitted per-column minimums.
    pub fn data_min(&self) -> &Array1<f64> {
        &self.data_min
    }

    /// Gets the fitted per-column maximums.
    pub fn data_max(&self) -> &Array1<f64> {
        &self.data_max
    }

    /// Scales a dataset into `[0, 1]` using the fitted bounds.
    ///
    /// # Parameters
    ///
    /// * `data` - Dataset with shape (periods, features); the feature count
    ///   must match the fitted bounds
    ///
    /// # Returns
    ///
    /// * `Result<Array2<f64>, ModelError>` - The scaled dataset
    pub fn transform(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        if data.ncols() != self.data_min.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "dataset has {} features, scaler was fitted on {}",
                data.ncols(),
                self.data_min.len()
            )));
        }

        Ok(Array2::from_shape_fn(data.dim(), |(i, j)| {
            let range = self.data_max[j] - self.data_min[j];
            if range > 0.0 {
                (data[[i, j]] - self.data_min[j]) / range
            } else {
                0.0
            }
        }))
    }

    /// Maps a single scaled vector back to the original units.
    ///
    /// # Parameters
    ///
    /// * `row` - Scaled vector, e.g. a model prediction
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - The vector in original units
    pub fn inverse_transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, ModelError> {
        if row.len() != self.data_min.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "vector has length {}, scaler was fitted on {} features",
                row.len(),
                self.data_min.len()
            )));
        }

        Ok(Array1::from_shape_fn(row.len(), |j| {
            let range = self.data_max[j] - self.data_min[j];
            row[j] * range + self.data_min[j]
        }))
    }
}

/// Builds a sliding-window training set from a time-ordered dataset.
///
/// Each window holds `window_size` consecutive periods and is paired with the
/// immediately following period as its target, so a dataset of `n` periods
/// yields `n - window_size` training pairs.
///
/// # Parameters
///
/// - `data` - Time-ordered dataset with shape (periods, features)
/// - `window_size` - Number of consecutive periods per window
///
/// # Returns
///
/// * `Result<(Vec<Array2<f64>>, Vec<Array1<f64>>), ModelError>` - Windows and
///   their next-period targets, in chronological order
///
/// # Errors
///
/// - `ModelError::ShapeMismatch` - If `window_size` is 0 or the dataset has
///   fewer than `window_size + 1` periods
///
/// # Example
/// ```rust
/// use lstm_forecast::utility::make_windows;
/// use ndarray::array;
///
/// let data = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
/// let (windows, targets) = make_windows(data.view(), 3).unwrap();
///
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[0], array![[1.0], [2.0], [3.0]]);
/// assert_eq!(targets[0], array![4.0]);
/// ```
pub fn make_windows(
    data: ArrayView2<f64>,
    window_size: usize,
) -> Result<(Vec<Array2<f64>>, Vec<Array1<f64>>), ModelError> {
    validate_dimension_greater_than_zero(window_size, "window_size")?;
    if data.nrows() < window_size + 1 {
        return Err(ModelError::ShapeMismatch(format!(
            "need at least {} periods to build one window of {} plus its target, got {}",
            window_size + 1,
            window_size,
            data.nrows()
        )));
    }

    let pairs = data.nrows() - window_size;
    let mut windows = Vec::with_capacity(pairs);
    let mut targets = Vec::with_capacity(pairs);
    for start in 0..pairs {
        windows.push(data.slice(s![start..start + window_size, ..]).to_owned());
        targets.push(data.row(start + window_size).to_owned());
    }

    Ok((windows, targets))
}
