//! Scenario compilation.
//!
//! A [`Scenario`] is turned into a built model, the parameter map (model
//! defaults overridden by the scenario), the input waveforms and the run
//! options. Every external signal of the model must be covered by either a
//! parameter or an input before the run starts.

use std::path::Path;

use sf_blocks::{DEFAULT_RESOLVE_BUDGET, DEFAULT_SEED, Model};
use sf_core::{SignalMap, Value};
use sf_project::{InputDef, ModelDef, Scenario, StepperDef};
use sf_sim::{Arange, History, InputSet, RunOptions, StepperType, Waveform, run};
use tracing::{debug, info, warn};

use crate::{CliError, CliResult};

/// Everything needed to run a scenario.
#[derive(Debug)]
pub struct CompiledScenario {
    pub name: String,
    pub model: Model,
    pub parameters: SignalMap,
    pub inputs: InputSet,
    pub time: Arange,
    pub options: RunOptions,
}

impl CompiledScenario {
    /// Run the model over the scenario time grid.
    pub fn simulate(&mut self) -> CliResult<History> {
        info!(
            "Running '{}': {} block(s), {} instant(s)",
            self.name,
            self.model.block_count(),
            self.time.len()
        );
        let history = run(
            &mut self.model,
            self.time,
            self.inputs.clone(),
            &self.parameters,
            &self.options,
        )?;
        Ok(history)
    }
}

/// Load a scenario; `.json` files as JSON, anything else as YAML.
pub fn load_scenario(path: &Path) -> CliResult<Scenario> {
    let scenario = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => sf_project::load_json(path)?,
        _ => sf_project::load_yaml(path)?,
    };
    Ok(scenario)
}

pub fn waveform(def: &InputDef) -> Waveform {
    match def {
        InputDef::Constant { value } => Waveform::Constant { value: *value },
        InputDef::Step { at_s, before, after } => Waveform::Step {
            at: *at_s,
            before: *before,
            after: *after,
        },
        InputDef::Table { t_s, y } => Waveform::Table {
            t: t_s.clone(),
            y: y.clone(),
        },
        InputDef::Sine {
            amplitude,
            frequency_hz,
            phase_rad,
            offset,
        } => Waveform::Sine {
            amplitude: *amplitude,
            frequency: *frequency_hz,
            phase: *phase_rad,
            offset: *offset,
        },
    }
}

pub fn stepper_type(def: StepperDef) -> StepperType {
    match def {
        StepperDef::Rk4 => StepperType::RK4,
        StepperDef::ForwardEuler => StepperType::ForwardEuler,
    }
}

fn build_model(def: &ModelDef, seed: u64) -> CliResult<(Model, SignalMap)> {
    let built = match def {
        ModelDef::Steering { request, info } => (
            sf_vehicle::steering_model(seed, request.as_str(), info.as_str())?,
            sf_vehicle::default_parameters(),
        ),
        ModelDef::DelayDemo {
            input,
            output,
            delay_s,
            initial,
        } => (
            sf_vehicle::delay_model(seed, input.as_str(), output.as_str(), *delay_s, *initial)?,
            SignalMap::new(),
        ),
    };
    Ok(built)
}

pub fn compile(scenario: &Scenario) -> CliResult<CompiledScenario> {
    let seed = scenario.seed.unwrap_or(DEFAULT_SEED);
    let (model, mut parameters) = build_model(&scenario.model, seed)?;

    for (name, value) in &scenario.parameters {
        parameters.insert(name.clone(), Value::scalar(*value));
    }

    let mut inputs = InputSet::new();
    for (name, def) in &scenario.inputs {
        // a driven signal replaces the model default of the same name
        if parameters.remove(name).is_some() {
            debug!("Input '{name}' overrides a default parameter");
        }
        inputs.insert(name.clone(), waveform(def));
    }

    let external = model.external_inputs();
    for signal in &external {
        if !parameters.contains_key(signal) && !inputs.names().any(|n| n == signal.as_str()) {
            return Err(CliError::MissingInput {
                signal: signal.clone(),
            });
        }
    }
    for name in inputs.names().filter(|n| !external.contains(*n)) {
        warn!("Input '{name}' is not read by the model");
    }

    let time = Arange::new(scenario.time.t0_s, scenario.time.t_end_s, scenario.time.dt_s)?;
    let options = RunOptions {
        stepper: stepper_type(scenario.stepper),
        resolve_budget: scenario.resolve_budget.unwrap_or(DEFAULT_RESOLVE_BUDGET),
        ..RunOptions::default()
    };

    Ok(CompiledScenario {
        name: scenario.name.clone(),
        model,
        parameters,
        inputs,
        time,
        options,
    })
}
