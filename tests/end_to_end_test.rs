use approx::assert_abs_diff_eq;
use lstm_forecast::prelude::*;
use ndarray::{s, Array2};

/// Ten months of synthetic expenses for two categories, in raw currency units.
fn monthly_expenses() -> Array2<f64> {
    Array2::from_shape_fn((10, 2), |(month, category)| {
        if category == 0 {
            100.0 + 10.0 * month as f64
        } else {
            50.0 + 5.0 * month as f64
        }
    })
}

#[test]
fn forecast_next_month_from_raw_expense_history() {
    let history = monthly_expenses();
    let window_size = 3;

    // Scale, window, train
    let scaler = MinMaxScaler::fit(history.view()).unwrap();
    let scaled = scaler.transform(history.view()).unwrap();
    let (sequences, targets) = make_windows(scaled.view(), window_size).unwrap();

    let mut model = LstmModel::new(2, 4).unwrap();
    let losses = model.train(&sequences, &targets, 150, 0.05).unwrap();
    assert_eq!(losses.len(), 150);
    assert!(losses.iter().all(|l| l.is_finite()));

    // Predict the month after the last observed window
    let last_window = scaled.slice(s![scaled.nrows() - window_size.., ..]);
    let scaled_prediction = model.predict(last_window).unwrap();
    assert_eq!(scaled_prediction.len(), 2);
    assert!(scaled_prediction.iter().all(|v| v.is_finite()));

    // Back to currency units
    let prediction = scaler
        .inverse_transform_row(scaled_prediction.view())
        .unwrap();
    assert!(prediction.iter().all(|v| v.is_finite()));

    // Reloading the stored model must reproduce the forecast
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expense_model.json");
    let path = path.to_str().unwrap();

    model.save_to_path(path).unwrap();
    let mut reloaded = LstmModel::load_from_path(path).unwrap();
    let reloaded_prediction = reloaded.predict(last_window).unwrap();

    for (a, b) in scaled_prediction.iter().zip(reloaded_prediction.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn insufficient_history_is_reported_before_training() {
    let history = monthly_expenses();
    let two_months = history.slice(s![..2, ..]);

    // Two months cannot fill a window of three plus its target
    assert!(matches!(
        make_windows(two_months, 3),
        Err(ModelError::ShapeMismatch(_))
    ));
}
