//! Continuous-state integrator.
//!
//! The integrator never computes its output during resolution. Its output
//! signal *is* a solver state: the stepper seeds it into the known-value map
//! and reads back the derivative input once the network has settled.

use std::collections::BTreeMap;

use sf_core::Value;

/// State entries keyed by the integrator's output (state) signal.
pub type States = BTreeMap<String, StateEntry>;

/// One element of the solver state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEntry {
    /// Signal holding `d(state)/dt`.
    pub derivative: String,
    /// Last committed value.
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    value: Value,
}

impl Integrator {
    pub fn new(initial: Value) -> Self {
        Self { value: initial }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn latch(&mut self, value: Value) {
        self.value = value;
    }
}
