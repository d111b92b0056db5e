//! Scenario front end: turns scenario files into runnable models.

pub mod compile;

use sf_blocks::BlockError;
use sf_project::ProjectError;
use sf_sim::SimError;
use thiserror::Error;

pub use compile::{CompiledScenario, compile, load_scenario, stepper_type, waveform};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Scenario error: {0}")]
    Project(#[from] ProjectError),

    #[error("Model construction error: {0}")]
    Model(#[from] BlockError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// An external signal of the model has neither a parameter nor an input.
    #[error("Signal '{signal}' is read by the model but not provided by the scenario")]
    MissingInput { signal: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
