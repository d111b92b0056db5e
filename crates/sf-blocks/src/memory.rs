//! Commit-driven holding blocks.

use sf_core::Value;

/// One-step memory: publishes the value latched at the previous commit.
///
/// Always ready during resolution, so it breaks instantaneous cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Memory {
    held: Value,
}

impl Memory {
    pub fn new(initial: Value) -> Self {
        Self { held: initial }
    }

    pub fn held(&self) -> &Value {
        &self.held
    }

    pub(crate) fn latch(&mut self, value: Value) {
        self.held = value;
    }
}

/// Passes its input through until the first commit, then holds that value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialValue {
    latched: Option<Value>,
}

impl InitialValue {
    pub fn latched(&self) -> Option<&Value> {
        self.latched.as_ref()
    }

    pub fn output(&self, input: Option<&Value>) -> Option<Value> {
        self.latched.as_ref().or(input).cloned()
    }

    pub(crate) fn latch(&mut self, value: &Value) {
        if self.latched.is_none() {
            self.latched = Some(value.clone());
        }
    }
}
