//! Time-domain simulation of block models.
//!
//! Provides:
//! - DynamicSystem protocol and the block-model adaptor
//! - Fixed-step RK4 and forward Euler steppers
//! - Time grids and input waveforms
//! - Run loop with history recording and CSV/JSON export

pub mod error;
pub mod history;
pub mod inputs;
pub mod run;
pub mod stepper;
pub mod system;
pub mod time;

pub use error::{SimError, SimResult};
pub use history::History;
pub use inputs::{InputSet, InputSource, NoInputs, Waveform};
pub use run::{RunOptions, run};
pub use stepper::{ForwardEuler, RK4, Stepper, StepperType};
pub use system::{DynamicSystem, EngineSystem, StateLayout};
pub use time::{Arange, TimeAdvance, arange};
