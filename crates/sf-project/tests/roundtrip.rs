use std::collections::BTreeMap;

use sf_project::schema::*;
use sf_project::{load_json, load_yaml, save_json, save_yaml, validate_scenario};

fn steering_scenario() -> Scenario {
    Scenario {
        version: 1,
        name: "Steering".to_string(),
        model: ModelDef::Steering {
            request: "front_wheel_angle_Rq".to_string(),
            info: "steering_info".to_string(),
        },
        parameters: BTreeMap::from([("front_wheel_ang_gain".to_string(), 1.0)]),
        time: TimeDef {
            t0_s: 0.0,
            t_end_s: 2.0,
            dt_s: 0.01,
        },
        stepper: StepperDef::Rk4,
        resolve_budget: Some(100),
        seed: Some(7),
        inputs: BTreeMap::from([
            (
                "front_wheel_angle_Rq".to_string(),
                InputDef::Table {
                    t_s: vec![0.0, 1.0, 2.0],
                    y: vec![0.0, 0.1, 0.1],
                },
            ),
        ]),
    }
}

#[test]
fn roundtrip_yaml_steering() {
    let scenario = steering_scenario();
    validate_scenario(&scenario).unwrap();

    let path = std::env::temp_dir().join("sf_project_roundtrip_steering.yaml");
    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_delay_demo() {
    let scenario = Scenario {
        version: 1,
        name: "Delay".to_string(),
        model: ModelDef::DelayDemo {
            input: "x".to_string(),
            output: "xd".to_string(),
            delay_s: 2.7435,
            initial: 0.0,
        },
        parameters: BTreeMap::new(),
        time: TimeDef {
            t0_s: 0.0,
            t_end_s: 10.0,
            dt_s: 0.1,
        },
        stepper: StepperDef::ForwardEuler,
        resolve_budget: None,
        seed: Some(1),
        inputs: BTreeMap::from([(
            "x".to_string(),
            InputDef::Sine {
                amplitude: 1.0,
                frequency_hz: 0.1,
                phase_rad: 0.0,
                offset: 0.0,
            },
        )]),
    };

    let path = std::env::temp_dir().join("sf_project_roundtrip_delay.json");
    save_json(&path, &scenario).unwrap();
    assert_eq!(scenario, load_json(&path).unwrap());
}

#[test]
fn defaults_fill_omitted_fields() {
    let yaml = r#"
version: 1
name: minimal
model:
  type: delay_demo
  delay_s: 1.0
time:
  t_end_s: 1.0
  dt_s: 0.1
"#;
    let scenario = sf_project::from_yaml_str(yaml).unwrap();
    assert_eq!(scenario.stepper, StepperDef::Rk4);
    assert_eq!(scenario.time.t0_s, 0.0);
    assert!(scenario.inputs.is_empty());
    assert_eq!(
        scenario.model,
        ModelDef::DelayDemo {
            input: "x".to_string(),
            output: "xd".to_string(),
            delay_s: 1.0,
            initial: 0.0,
        }
    );
}

#[test]
fn version_zero_is_migrated() {
    let yaml = r#"
version: 0
name: legacy
model:
  type: steering
time:
  t_end_s: 1.0
  dt_s: 0.1
"#;
    let scenario = sf_project::from_yaml_str(yaml).unwrap();
    assert_eq!(scenario.version, sf_project::LATEST_VERSION);
    assert_eq!(scenario.seed, Some(0));
}

#[test]
fn json_scenarios_are_migrated_and_validated() {
    let json = r#"{
        "version": 0,
        "name": "legacy json",
        "model": { "type": "delay_demo", "delay_s": 1.5 },
        "time": { "t_end_s": 2.0, "dt_s": 0.5 }
    }"#;
    let scenario = sf_project::from_json_str(json).unwrap();
    assert_eq!(scenario.version, sf_project::LATEST_VERSION);
    assert_eq!(scenario.seed, Some(0));
    assert_eq!(scenario.stepper, StepperDef::Rk4);

    let bad = json.replace("1.5", "-1.5");
    let err = sf_project::from_json_str(&bad).unwrap_err();
    assert!(matches!(err, sf_project::ProjectError::Validation(_)));
}
