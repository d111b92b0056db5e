//! External input injection.
//!
//! An [`InputSource`] writes the externally driven signals for time `t`.
//! Closures `(t, &states, &mut inputs)` are input sources; [`InputSet`]
//! bundles the standard waveforms under signal names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sf_core::{SignalMap, Value, interp_clamped};

use crate::error::{SimError, SimResult};

pub trait InputSource {
    /// Write the input values for `t`. `states` holds the current state signals.
    fn inputs(&mut self, t: f64, states: &SignalMap, inputs: &mut SignalMap) -> SimResult<()>;
}

impl<F> InputSource for F
where
    F: FnMut(f64, &SignalMap, &mut SignalMap),
{
    fn inputs(&mut self, t: f64, states: &SignalMap, inputs: &mut SignalMap) -> SimResult<()> {
        self(t, states, inputs);
        Ok(())
    }
}

/// No external inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInputs;

impl InputSource for NoInputs {
    fn inputs(&mut self, _t: f64, _states: &SignalMap, _inputs: &mut SignalMap) -> SimResult<()> {
        Ok(())
    }
}

/// Standard scalar waveforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Waveform {
    Constant {
        value: f64,
    },
    /// `before` until `at`, `after` from `at` on.
    Step {
        at: f64,
        #[serde(default)]
        before: f64,
        after: f64,
    },
    /// Clamped linear interpolation through `(t, y)` points.
    Table {
        t: Vec<f64>,
        y: Vec<f64>,
    },
    /// `offset + amplitude * sin(2 pi frequency t + phase)`.
    Sine {
        amplitude: f64,
        frequency: f64,
        #[serde(default)]
        phase: f64,
        #[serde(default)]
        offset: f64,
    },
}

impl Waveform {
    pub fn value_at(&self, t: f64) -> Result<f64, sf_core::CoreError> {
        Ok(match self {
            Waveform::Constant { value } => *value,
            Waveform::Step { at, before, after } => {
                if t < *at {
                    *before
                } else {
                    *after
                }
            }
            Waveform::Table { t: ts, y } => interp_clamped(t, ts, y)?,
            Waveform::Sine {
                amplitude,
                frequency,
                phase,
                offset,
            } => offset + amplitude * (std::f64::consts::TAU * frequency * t + phase).sin(),
        })
    }
}

/// Named waveforms written as scalar signals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSet {
    signals: BTreeMap<String, Waveform>,
}

impl InputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, signal: impl Into<String>, waveform: Waveform) -> Self {
        self.insert(signal, waveform);
        self
    }

    pub fn insert(&mut self, signal: impl Into<String>, waveform: Waveform) {
        self.signals.insert(signal.into(), waveform);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl InputSource for InputSet {
    fn inputs(&mut self, t: f64, _states: &SignalMap, inputs: &mut SignalMap) -> SimResult<()> {
        for (name, waveform) in &self.signals {
            let v = waveform.value_at(t).map_err(|source| SimError::Input {
                signal: name.clone(),
                source,
            })?;
            inputs.insert(name.clone(), Value::scalar(v));
        }
        Ok(())
    }
}

impl FromIterator<(String, Waveform)> for InputSet {
    fn from_iter<T: IntoIterator<Item = (String, Waveform)>>(iter: T) -> Self {
        Self {
            signals: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveforms() {
        let step = Waveform::Step {
            at: 1.0,
            before: 0.0,
            after: 2.0,
        };
        assert_eq!(step.value_at(0.5).unwrap(), 0.0);
        assert_eq!(step.value_at(1.0).unwrap(), 2.0);

        let table = Waveform::Table {
            t: vec![0.0, 1.0, 2.0],
            y: vec![0.0, 10.0, 0.0],
        };
        assert_eq!(table.value_at(0.5).unwrap(), 5.0);
        assert_eq!(table.value_at(-1.0).unwrap(), 0.0);
        assert_eq!(table.value_at(5.0).unwrap(), 0.0);

        let sine = Waveform::Sine {
            amplitude: 2.0,
            frequency: 0.25,
            phase: 0.0,
            offset: 1.0,
        };
        assert!((sine.value_at(1.0).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn bad_table_is_reported_with_signal_name() {
        let mut set = InputSet::new().with(
            "u",
            Waveform::Table {
                t: vec![0.0, 1.0],
                y: vec![0.0],
            },
        );
        let err = set
            .inputs(0.0, &SignalMap::new(), &mut SignalMap::new())
            .unwrap_err();
        assert!(matches!(err, SimError::Input { ref signal, .. } if signal == "u"));
    }

    #[test]
    fn closure_source() {
        let mut src = |t: f64, _x: &SignalMap, inputs: &mut SignalMap| {
            inputs.insert("u".into(), Value::scalar(2.0 * t));
        };
        let mut out = SignalMap::new();
        src.inputs(1.5, &SignalMap::new(), &mut out).unwrap();
        assert_eq!(out["u"].as_scalar(), Some(3.0));
    }
}
