//! Scenario validation logic.

use crate::schema::{InputDef, ModelDef, Scenario, TimeDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Signal '{signal}' is defined both as {first} and as {second}")]
    Conflict {
        signal: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    validate_model(&scenario.model)?;
    validate_time(&scenario.time)?;

    if scenario.resolve_budget == Some(0) {
        return Err(invalid("resolve_budget", 0, "must be at least 1"));
    }

    for (name, value) in &scenario.parameters {
        if name.is_empty() {
            return Err(invalid("parameters", "\"\"", "signal name must not be empty"));
        }
        finite(&format!("parameters.{name}"), *value)?;
    }

    for (name, input) in &scenario.inputs {
        if name.is_empty() {
            return Err(invalid("inputs", "\"\"", "signal name must not be empty"));
        }
        if scenario.parameters.contains_key(name) {
            return Err(ValidationError::Conflict {
                signal: name.clone(),
                first: "a parameter",
                second: "an input",
            });
        }
        validate_input(name, input)?;
    }

    Ok(())
}

fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    match model {
        ModelDef::Steering { request, info } => {
            if request.is_empty() || info.is_empty() {
                return Err(invalid("model", "steering", "port names must not be empty"));
            }
            if request == info {
                return Err(ValidationError::Conflict {
                    signal: request.clone(),
                    first: "the steering request",
                    second: "the steering info output",
                });
            }
        }
        ModelDef::DelayDemo {
            input,
            output,
            delay_s,
            initial,
        } => {
            if input.is_empty() || output.is_empty() {
                return Err(invalid("model", "delay_demo", "port names must not be empty"));
            }
            finite("model.delay_s", *delay_s)?;
            if *delay_s < 0.0 {
                return Err(invalid("model.delay_s", delay_s, "must not be negative"));
            }
            finite("model.initial", *initial)?;
        }
    }
    Ok(())
}

fn validate_time(time: &TimeDef) -> Result<(), ValidationError> {
    finite("time.t0_s", time.t0_s)?;
    finite("time.t_end_s", time.t_end_s)?;
    finite("time.dt_s", time.dt_s)?;
    if time.dt_s <= 0.0 {
        return Err(invalid("time.dt_s", time.dt_s, "must be positive"));
    }
    if time.t_end_s < time.t0_s {
        return Err(invalid("time.t_end_s", time.t_end_s, "must not be before t0_s"));
    }
    Ok(())
}

fn validate_input(name: &str, input: &InputDef) -> Result<(), ValidationError> {
    let field = |f: &str| format!("inputs.{name}.{f}");
    match input {
        InputDef::Constant { value } => finite(&field("value"), *value)?,
        InputDef::Step { at_s, before, after } => {
            finite(&field("at_s"), *at_s)?;
            finite(&field("before"), *before)?;
            finite(&field("after"), *after)?;
        }
        InputDef::Table { t_s, y } => {
            if t_s.is_empty() {
                return Err(invalid(field("t_s"), "[]", "table must not be empty"));
            }
            if t_s.len() != y.len() {
                return Err(invalid(
                    field("y"),
                    y.len(),
                    "table columns must have the same length",
                ));
            }
            if t_s.windows(2).any(|w| w[1] <= w[0]) {
                return Err(invalid(field("t_s"), format!("{t_s:?}"), "must be strictly increasing"));
            }
            for v in t_s.iter().chain(y) {
                finite(&field("table"), *v)?;
            }
        }
        InputDef::Sine {
            amplitude,
            frequency_hz,
            phase_rad,
            offset,
        } => {
            finite(&field("amplitude"), *amplitude)?;
            finite(&field("frequency_hz"), *frequency_hz)?;
            finite(&field("phase_rad"), *phase_rad)?;
            finite(&field("offset"), *offset)?;
        }
    }
    Ok(())
}
