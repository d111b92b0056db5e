use std::collections::BTreeMap;

use sf_project::schema::*;
use sf_project::{ValidationError, validate_scenario};

fn base() -> Scenario {
    Scenario {
        version: 1,
        name: "base".to_string(),
        model: ModelDef::DelayDemo {
            input: "x".to_string(),
            output: "xd".to_string(),
            delay_s: 0.5,
            initial: 0.0,
        },
        parameters: BTreeMap::new(),
        time: TimeDef {
            t0_s: 0.0,
            t_end_s: 1.0,
            dt_s: 0.1,
        },
        stepper: StepperDef::default(),
        resolve_budget: None,
        seed: None,
        inputs: BTreeMap::new(),
    }
}

#[test]
fn base_is_valid() {
    validate_scenario(&base()).unwrap();
}

#[test]
fn rejects_bad_time_grid() {
    let mut s = base();
    s.time.dt_s = 0.0;
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::InvalidValue { ref field, .. }) if field == "time.dt_s"
    ));

    let mut s = base();
    s.time.t_end_s = -1.0;
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.time.t0_s = f64::NAN;
    assert!(validate_scenario(&s).is_err());
}

#[test]
fn rejects_future_version() {
    let mut s = base();
    s.version = 99;
    assert_eq!(
        validate_scenario(&s),
        Err(ValidationError::UnsupportedVersion { version: 99 })
    );
}

#[test]
fn rejects_zero_budget_and_negative_delay() {
    let mut s = base();
    s.resolve_budget = Some(0);
    assert!(validate_scenario(&s).is_err());

    let mut s = base();
    s.model = ModelDef::DelayDemo {
        input: "x".to_string(),
        output: "xd".to_string(),
        delay_s: -0.1,
        initial: 0.0,
    };
    assert!(validate_scenario(&s).is_err());
}

#[test]
fn rejects_malformed_tables() {
    let mut s = base();
    s.inputs.insert(
        "x".to_string(),
        InputDef::Table {
            t_s: vec![0.0, 1.0],
            y: vec![0.0],
        },
    );
    assert!(validate_scenario(&s).is_err());

    s.inputs.insert(
        "x".to_string(),
        InputDef::Table {
            t_s: vec![0.0, 0.0],
            y: vec![0.0, 1.0],
        },
    );
    assert!(validate_scenario(&s).is_err());

    s.inputs.insert(
        "x".to_string(),
        InputDef::Table {
            t_s: vec![],
            y: vec![],
        },
    );
    assert!(validate_scenario(&s).is_err());
}

#[test]
fn input_shadowing_a_parameter_conflicts() {
    let mut s = base();
    s.parameters.insert("x".to_string(), 1.0);
    s.inputs
        .insert("x".to_string(), InputDef::Constant { value: 1.0 });
    assert!(matches!(
        validate_scenario(&s),
        Err(ValidationError::Conflict { ref signal, .. }) if signal == "x"
    ));
}
