//! Backward-difference derivative against the last committed sample.

use sf_core::{CoreResult, Value};

#[derive(Debug, Clone, PartialEq)]
struct Committed {
    t: f64,
    input: Value,
    output: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derivative {
    initial: Value,
    last: Option<Committed>,
}

impl Derivative {
    pub fn new(initial: Value) -> Self {
        Self {
            initial,
            last: None,
        }
    }

    pub fn evaluate(&self, t: f64, x: &Value) -> CoreResult<Value> {
        let Some(last) = &self.last else {
            return Ok(self.initial.clone());
        };
        if t == last.t {
            return Ok(last.output.clone());
        }
        let dt = t - last.t;
        x.zip_with(&last.input, "derivative", |a, b| (a - b) / dt)
    }

    pub(crate) fn record(&mut self, t: f64, input: Value, output: Value) {
        self.last = Some(Committed { t, input, output });
    }
}
