use std::f64::consts::PI;

use sf_core::{SignalMap, Value};
use sf_sim::{Arange, RunOptions, StepperType, run};
use sf_vehicle::{DEFAULT_DELAY, delay_model};

#[test]
fn delayed_sine_lags_by_the_configured_time() {
    let mut model = delay_model(3, "x", "xd", DEFAULT_DELAY, 0.0).unwrap();
    let wave = |t: f64| (PI * t / 5.0).sin();
    let opts = RunOptions {
        stepper: StepperType::ForwardEuler,
        ..RunOptions::default()
    };
    let history = run(
        &mut model,
        Arange::new(0.0, 10.0, 0.1).unwrap(),
        |t: f64, _x: &SignalMap, inputs: &mut SignalMap| {
            inputs.insert("x".into(), Value::scalar(wave(t)));
        },
        &SignalMap::new(),
        &opts,
    )
    .unwrap();

    assert_eq!(history.len(), 101);
    let xd = history.scalar_series("xd").unwrap();
    for (t, y) in history.t.iter().zip(&xd) {
        if *t < DEFAULT_DELAY {
            assert_eq!(*y, 0.0, "t={t}");
        } else {
            // linear interpolation between the 0.1 s samples
            assert!((y - wave(t - DEFAULT_DELAY)).abs() < 1e-3, "t={t}");
        }
    }
}

#[test]
fn only_the_input_is_external() {
    let model = delay_model(0, "u", "y", 1.0, 0.5).unwrap();
    assert_eq!(model.external_inputs().into_iter().collect::<Vec<_>>(), ["u"]);
    assert!(model.outputs().contains("-time_delay"));
    assert!(model.outputs().contains("-initial"));
}
