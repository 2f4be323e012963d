use super::*;

fn sample_window() -> Array2<f64> {
    array![[0.1, 0.5], [0.2, 0.6], [0.3, 0.7], [0.4, 0.8]]
}

#[test]
fn test_constructor_rejects_zero_sizes() {
    assert!(matches!(
        LstmModel::new(0, 4),
        Err(ModelError::ShapeMismatch(_))
    ));
    assert!(matches!(
        LstmModel::new(2, 0),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_parameter_shapes_fixed_by_sizes() {
    let model = LstmModel::new(3, 5).unwrap();

    for gate in [
        &model.input_gate,
        &model.forget_gate,
        &model.cell_gate,
        &model.output_gate,
    ] {
        assert_eq!(gate.kernel.dim(), (5, 3));
        assert_eq!(gate.recurrent_kernel.dim(), (5, 5));
        assert_eq!(gate.bias.len(), 5);
        // Biases start at zero
        assert!(gate.bias.iter().all(|&b| b == 0.0));
    }
    assert_eq!(model.output_kernel.dim(), (3, 5));
    assert_eq!(model.output_bias.len(), 3);
}

#[test]
fn test_forward_is_deterministic() {
    let mut model = LstmModel::new(2, 4).unwrap();
    let window = sample_window();

    let first = model.forward(window.view()).unwrap();
    let second = model.forward(window.view()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_forward_output_shape_and_cache_length() {
    let mut model = LstmModel::new(2, 4).unwrap();
    let window = sample_window();

    let outputs = model.forward(window.view()).unwrap();

    assert_eq!(outputs.dim(), (4, 2));
    assert_eq!(model.cache.len(), window.nrows());
}

#[test]
fn test_forward_rejects_wrong_feature_width() {
    let mut model = LstmModel::new(3, 4).unwrap();
    let window = sample_window(); // two features, model expects three

    assert!(matches!(
        model.forward(window.view()),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_forward_rejects_empty_sequence() {
    let mut model = LstmModel::new(2, 4).unwrap();
    let empty = Array2::<f64>::zeros((0, 2));

    assert!(matches!(
        model.forward(empty.view()),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_forward_replaces_previous_cache() {
    let mut model = LstmModel::new(2, 4).unwrap();

    model.forward(sample_window().view()).unwrap();
    let short = array![[0.1, 0.2], [0.3, 0.4]];
    model.forward(short.view()).unwrap();

    assert_eq!(model.cache.len(), 2);
}

#[test]
fn test_backward_requires_forward() {
    let mut model = LstmModel::new(2, 4).unwrap();
    let targets = Array2::<f64>::zeros((4, 2));

    assert!(matches!(
        model.backward(targets.view()),
        Err(ModelError::ProcessingError(_))
    ));
}

#[test]
fn test_backward_rejects_mismatched_targets() {
    let mut model = LstmModel::new(2, 4).unwrap();
    model.forward(sample_window().view()).unwrap();

    // Wrong length
    let short = Array2::<f64>::zeros((2, 2));
    assert!(matches!(
        model.backward(short.view()),
        Err(ModelError::ShapeMismatch(_))
    ));

    // Wrong width
    model.forward(sample_window().view()).unwrap();
    let wide = Array2::<f64>::zeros((4, 3));
    assert!(matches!(
        model.backward(wide.view()),
        Err(ModelError::ShapeMismatch(_))
    ));
}

#[test]
fn test_backward_populates_every_gradient_slot() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let window = sample_window();
    let targets = Array2::<f64>::from_elem((4, 2), 0.5);

    model.forward(window.view()).unwrap();
    model.backward(targets.view()).unwrap();

    for gate in [
        &model.input_gate,
        &model.forget_gate,
        &model.cell_gate,
        &model.output_gate,
    ] {
        let gk = gate.grad_kernel.as_ref().unwrap();
        let grk = gate.grad_recurrent_kernel.as_ref().unwrap();
        let gb = gate.grad_bias.as_ref().unwrap();
        assert_eq!(gk.dim(), gate.kernel.dim());
        assert_eq!(grk.dim(), gate.recurrent_kernel.dim());
        assert_eq!(gb.len(), gate.bias.len());
    }
    assert_eq!(
        model.grad_output_kernel.as_ref().unwrap().dim(),
        model.output_kernel.dim()
    );
    assert_eq!(
        model.grad_output_bias.as_ref().unwrap().len(),
        model.output_bias.len()
    );
}

#[test]
fn test_update_without_backward_leaves_parameters_unchanged() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let kernel_before = model.input_gate.kernel.clone();
    let readout_before = model.output_kernel.clone();

    model.update_parameters(0.1).unwrap();

    assert_eq!(model.input_gate.kernel, kernel_before);
    assert_eq!(model.output_kernel, readout_before);
}

#[test]
fn test_update_moves_parameters_against_gradient() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let window = sample_window();
    let targets = Array2::<f64>::from_elem((4, 2), 0.5);

    model.forward(window.view()).unwrap();
    model.backward(targets.view()).unwrap();

    let bias_before = model.output_bias.clone();
    let grad = model.grad_output_bias.clone().unwrap();
    model.update_parameters(0.1).unwrap();

    let expected = &bias_before - &(0.1 * &grad);
    for (updated, expected) in model.output_bias.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*updated, *expected, epsilon = 1e-12);
    }
}

#[test]
fn test_update_reports_non_finite_parameters() {
    let mut model = LstmModel::new(2, 3).unwrap();
    let window = sample_window();
    let targets = Array2::<f64>::from_elem((4, 2), 0.5);

    model.forward(window.view()).unwrap();
    model.backward(targets.view()).unwrap();
    model.grad_output_bias = Some(array![f64::NAN, 0.0]);

    assert!(matches!(
        model.update_parameters(0.1),
        Err(ModelError::NumericalInstability(_))
    ));
}

#[test]
fn test_predict_returns_last_timestep_output() {
    let mut model = LstmModel::new(2, 4).unwrap();
    let window = sample_window();

    let outputs = model.forward(window.view()).unwrap();
    let prediction = model.predict(window.view()).unwrap();

    assert_eq!(prediction.len(), 2);
    for (p, o) in prediction.iter().zip(outputs.row(outputs.nrows() - 1).iter()) {
        assert_abs_diff_eq!(*p, *o, epsilon = 1e-12);
    }
}
