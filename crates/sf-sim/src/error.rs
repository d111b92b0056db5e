//! Error types for simulation runs.

use sf_blocks::BlockError;
use sf_core::CoreError;
use thiserror::Error;

/// Errors encountered while driving a model through time.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A derivative signal does not match the shape of its state.
    #[error("State '{state}' has {expected} element(s) but its derivative has {actual}")]
    StateShape {
        state: String,
        expected: usize,
        actual: usize,
    },

    #[error("Derivative '{derivative}' of state '{state}' was not computed")]
    MissingDerivative { state: String, derivative: String },

    /// The time callback produced a non-increasing time.
    #[error("Time must strictly increase: step {step} goes from t={from} to t={to}")]
    NonIncreasingTime { step: usize, from: f64, to: f64 },

    #[error("Input '{signal}' failed: {source}")]
    Input {
        signal: String,
        #[source]
        source: CoreError,
    },

    /// An input source wrote a signal that is also a parameter.
    #[error("Input '{signal}' shadows the parameter of the same name")]
    InputShadowsParameter { signal: String },

    #[error("Engine error: {0}")]
    Engine(#[from] BlockError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
