//! Scenario schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub model: ModelDef,
    /// Constant named signals; override the model defaults.
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
    pub time: TimeDef,
    #[serde(default)]
    pub stepper: StepperDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_budget: Option<usize>,
    /// Anonymous-name seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelDef {
    /// Front-wheel steering actuator with pinpoint geometry.
    Steering {
        #[serde(default = "default_steering_request")]
        request: String,
        #[serde(default = "default_steering_info")]
        info: String,
    },
    /// Sinusoid through a transport delay.
    DelayDemo {
        #[serde(default = "default_delay_input")]
        input: String,
        #[serde(default = "default_delay_output")]
        output: String,
        delay_s: f64,
        #[serde(default)]
        initial: f64,
    },
}

fn default_steering_request() -> String {
    "front_wheel_angle_Rq".to_string()
}

fn default_steering_info() -> String {
    "steering_info".to_string()
}

fn default_delay_input() -> String {
    "x".to_string()
}

fn default_delay_output() -> String {
    "xd".to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default)]
    pub t0_s: f64,
    pub t_end_s: f64,
    pub dt_s: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepperDef {
    #[default]
    Rk4,
    ForwardEuler,
}

/// Scalar waveform driving one external input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputDef {
    Constant {
        value: f64,
    },
    Step {
        at_s: f64,
        #[serde(default)]
        before: f64,
        after: f64,
    },
    /// Clamped linear interpolation through `(t_s, y)` points.
    Table {
        t_s: Vec<f64>,
        y: Vec<f64>,
    },
    Sine {
        amplitude: f64,
        frequency_hz: f64,
        #[serde(default)]
        phase_rad: f64,
        #[serde(default)]
        offset: f64,
    },
}
