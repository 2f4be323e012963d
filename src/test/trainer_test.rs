use super::*;

#[test]
fn test_train_returns_one_loss_per_epoch() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let sequences = vec![array![[0.1, 0.5], [0.2, 0.6], [0.3, 0.7]]];
    let targets = vec![array![0.4, 0.8]];

    let losses = model.train(&sequences, &targets, 5, 0.05).unwrap();

    assert_eq!(losses.len(), 5);
    assert!(losses.iter().all(|l| l.is_finite() && *l >= 0.0));
}

#[test]
fn test_training_reduces_loss_on_sinusoid_with_trend() {
    // 30 periods, window 6: the average epoch loss after 100 epochs must be
    // lower than after the first epoch
    let series = synthetic_series(30);
    let scaler = MinMaxScaler::fit(series.view()).unwrap();
    let scaled = scaler.transform(series.view()).unwrap();
    let (sequences, targets) = make_windows(scaled.view(), 6).unwrap();

    let mut model = LstmModel::new(2, 8).unwrap();
    let losses = model.train(&sequences, &targets, 100, 0.05).unwrap();

    assert_eq!(losses.len(), 100);
    assert!(
        losses[99] < losses[0],
        "expected training to reduce loss, got first {} vs last {}",
        losses[0],
        losses[99]
    );
}

#[test]
fn test_train_rejects_empty_training_set() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let sequences: Vec<Array2<f64>> = Vec::new();
    let targets: Vec<Array1<f64>> = Vec::new();

    assert!(matches!(
        model.train(&sequences, &targets, 1, 0.05),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_train_rejects_mismatched_sequence_and_target_counts() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let sequences = vec![array![[0.1, 0.5], [0.2, 0.6]]];
    let targets = vec![array![0.3, 0.7], array![0.4, 0.8]];

    assert!(matches!(
        model.train(&sequences, &targets, 1, 0.05),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_train_fails_fast_on_wrong_feature_width() {
    let mut model = LstmModel::new(2, 3).unwrap();
    // Second sequence has three features per timestep
    let sequences = vec![
        array![[0.1, 0.5], [0.2, 0.6]],
        array![[0.1, 0.5, 0.9], [0.2, 0.6, 0.8]],
    ];
    let targets = vec![array![0.3, 0.7], array![0.4, 0.8]];

    let before = model.input_gate.kernel.clone();
    assert!(matches!(
        model.train(&sequences, &targets, 1, 0.05),
        Err(ModelError::ShapeMismatch(_))
    ));
    // Validation rejects the set before any parameter is touched
    assert_eq!(model.input_gate.kernel, before);
}

#[test]
fn test_train_rejects_wrong_target_length() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let sequences = vec![array![[0.1, 0.5], [0.2, 0.6]]];
    let targets = vec![array![0.3]];

    assert!(matches!(
        model.train(&sequences, &targets, 1, 0.05),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_single_window_overfits_to_its_target() {
    // One window repeated long enough should drive the prediction close to
    // its next-period target
    let sequences = vec![array![[0.2, 0.4], [0.3, 0.5], [0.4, 0.6]]];
    let targets = vec![array![0.5, 0.7]];

    let mut model = LstmModel::new(2, 6).unwrap();
    let losses = model.train(&sequences, &targets, 2000, 0.1).unwrap();
    assert!(losses[losses.len() - 1] < losses[0]);

    let prediction = model.predict(sequences[0].view()).unwrap();
    for (p, t) in prediction.iter().zip(targets[0].iter()) {
        assert_abs_diff_eq!(*p, *t, epsilon = 0.1);
    }
}
