//! Simulation run loop.
//!
//! Per accepted instant: evaluate the network at `(t, x)`, record every
//! non-parameter signal, commit the stateful blocks. Between instants the
//! stepper advances the integrator states.

use std::collections::BTreeSet;

use sf_blocks::{DEFAULT_RESOLVE_BUDGET, Model};
use sf_core::SignalMap;
use tracing::{debug, trace};

use crate::error::{SimError, SimResult};
use crate::history::History;
use crate::inputs::InputSource;
use crate::stepper::StepperType;
use crate::system::EngineSystem;
use crate::time::TimeAdvance;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Stepper (default: RK4)
    pub stepper: StepperType,
    /// Resolution passes allowed per evaluation
    pub resolve_budget: usize,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            stepper: StepperType::default(),
            resolve_budget: DEFAULT_RESOLVE_BUDGET,
            max_steps: 1_000_000,
        }
    }
}

/// Run `model` over the instants produced by `time`.
///
/// `parameters` are seeded before every evaluation and left out of the history.
pub fn run<T, I>(
    model: &mut Model,
    mut time: T,
    inputs: I,
    parameters: &SignalMap,
    opts: &RunOptions,
) -> SimResult<History>
where
    T: TimeAdvance,
    I: InputSource,
{
    if opts.resolve_budget == 0 {
        return Err(SimError::InvalidArg {
            what: "resolve_budget must be positive",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    let mut t = 0.0;
    if !time.advance(0, &mut t) {
        return Err(SimError::InvalidArg {
            what: "time callback produced no initial instant",
        });
    }

    let exclude: BTreeSet<String> = parameters.keys().cloned().collect();
    let mut system = EngineSystem::new(model, parameters, inputs, opts.resolve_budget);
    let mut x = system.initial_state()?;
    debug!(
        "Running with {} state element(s), {} parameter(s), stepper {:?}",
        system.layout().len(),
        parameters.len(),
        opts.stepper
    );

    let mut history = History::default();
    let known = system.evaluate(t, &x)?;
    history.record(t, &known, &exclude);
    system.commit(t, &known)?;

    let mut step = 1;
    loop {
        let mut t_next = t;
        if !time.advance(step, &mut t_next) {
            break;
        }
        if step > opts.max_steps {
            return Err(SimError::InvalidArg {
                what: "run exceeded max_steps",
            });
        }
        if t_next.is_nan() || t_next <= t {
            return Err(SimError::NonIncreasingTime {
                step,
                from: t,
                to: t_next,
            });
        }

        x = opts.stepper.step(&mut system, t, &x, t_next - t)?;
        t = t_next;

        let known = system.evaluate(t, &x)?;
        history.record(t, &known, &exclude);
        system.commit(t, &known)?;
        trace!("Accepted step {step} at t={t}");
        step += 1;
    }

    debug!("Run finished: {} instant(s), t_end={t}", history.len());
    Ok(history)
}
