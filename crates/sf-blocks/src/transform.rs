//! Stateless single-input blocks and sources.

use std::fmt;

use sf_core::Value;

/// Scalar multiply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    pub k: f64,
}

impl Gain {
    pub fn apply(&self, x: &Value) -> Value {
        x.scale(self.k)
    }
}

/// User transform of `(t, element)`.
pub type TransformFn = Box<dyn Fn(f64, f64) -> f64>;

/// Elementwise unary transform.
pub enum Transform {
    /// Forward the input unchanged under a new name.
    Identity,
    Sine,
    Function(TransformFn),
}

impl Transform {
    pub fn function(f: impl Fn(f64, f64) -> f64 + 'static) -> Self {
        Transform::Function(Box::new(f))
    }

    pub fn apply(&self, t: f64, x: &Value) -> Value {
        match self {
            Transform::Identity => x.clone(),
            Transform::Sine => x.map(f64::sin),
            Transform::Function(f) => x.map(|v| f(t, v)),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => f.write_str("Identity"),
            Transform::Sine => f.write_str("Sine"),
            Transform::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Fixed-value source.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: Value,
}
