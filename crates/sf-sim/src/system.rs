//! Dynamic systems as seen by the steppers, and the block-model adaptor.

use nalgebra::DVector;
use sf_blocks::{Model, States};
use sf_core::{SignalMap, Value};

use crate::error::{SimError, SimResult};
use crate::inputs::InputSource;

/// Trait for pluggable dynamic systems.
///
/// A DynamicSystem must implement:
/// - State type (Clone, for stage snapshots)
/// - RHS computation: x_dot = f(t, x)
/// - Vector-space arithmetic on states: add, scale by scalar
pub trait DynamicSystem {
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes `&mut self` so systems can re-evaluate internal networks.
    /// Must not change anything that outlives the call's own evaluation.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}

#[derive(Debug, Clone, PartialEq)]
struct StateSlot {
    name: String,
    derivative: String,
    offset: usize,
    len: usize,
}

/// Placement of each integrator state inside the flat solver vector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateLayout {
    slots: Vec<StateSlot>,
    len: usize,
}

impl StateLayout {
    /// Layout in state-name order, with each slot sized by its current value.
    pub fn new(states: &States) -> Self {
        let mut slots = Vec::with_capacity(states.len());
        let mut offset = 0;
        for (name, entry) in states {
            let len = entry.value.len();
            slots.push(StateSlot {
                name: name.clone(),
                derivative: entry.derivative.clone(),
                offset,
                len,
            });
            offset += len;
        }
        Self { slots, len: offset }
    }

    /// Total number of scalar states.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Concatenate the current state values.
    pub fn flatten(&self, states: &States) -> SimResult<DVector<f64>> {
        let mut x = DVector::zeros(self.len);
        for slot in &self.slots {
            let value = states
                .get(&slot.name)
                .ok_or(SimError::InvalidArg {
                    what: "state set does not match the layout",
                })?
                .value
                .as_slice();
            if value.len() != slot.len {
                return Err(SimError::StateShape {
                    state: slot.name.clone(),
                    expected: slot.len,
                    actual: value.len(),
                });
            }
            x.rows_mut(slot.offset, slot.len).copy_from_slice(value);
        }
        Ok(x)
    }

    /// Split a flat vector back into named state signals.
    pub fn unflatten(&self, x: &DVector<f64>) -> SimResult<SignalMap> {
        if x.len() != self.len {
            return Err(SimError::InvalidArg {
                what: "state vector length does not match the layout",
            });
        }
        Ok(self
            .slots
            .iter()
            .map(|s| {
                let part = x.rows(s.offset, s.len).into_owned();
                (s.name.clone(), Value::from(part))
            })
            .collect())
    }

    /// Read every derivative signal out of a settled map.
    pub fn gather_derivatives(&self, known: &SignalMap) -> SimResult<DVector<f64>> {
        let mut dx = DVector::zeros(self.len);
        for slot in &self.slots {
            let value = known
                .get(&slot.derivative)
                .ok_or_else(|| SimError::MissingDerivative {
                    state: slot.name.clone(),
                    derivative: slot.derivative.clone(),
                })?;
            let data: Vec<f64> = if value.len() == slot.len {
                value.iter().collect()
            } else if value.is_scalar() {
                vec![value.as_slice()[0]; slot.len]
            } else {
                return Err(SimError::StateShape {
                    state: slot.name.clone(),
                    expected: slot.len,
                    actual: value.len(),
                });
            };
            dx.rows_mut(slot.offset, slot.len)
                .copy_from_slice(&data);
        }
        Ok(dx)
    }
}

/// Adapts a block [`Model`] to the [`DynamicSystem`] protocol.
///
/// Every evaluation seeds a fresh known-value map with the state signals,
/// the parameters and the current inputs, then settles the network.
pub struct EngineSystem<'a, I> {
    model: &'a mut Model,
    layout: StateLayout,
    parameters: &'a SignalMap,
    inputs: I,
    budget: usize,
}

impl<'a, I: InputSource> EngineSystem<'a, I> {
    pub fn new(model: &'a mut Model, parameters: &'a SignalMap, inputs: I, budget: usize) -> Self {
        let layout = StateLayout::new(&model.collect_states());
        Self {
            model,
            layout,
            parameters,
            inputs,
            budget,
        }
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Flattened committed integrator states.
    pub fn initial_state(&self) -> SimResult<DVector<f64>> {
        self.layout.flatten(&self.model.collect_states())
    }

    /// Settle the network at `(t, x)` and return every known signal.
    pub fn evaluate(&mut self, t: f64, x: &DVector<f64>) -> SimResult<SignalMap> {
        let states = self.layout.unflatten(x)?;
        let mut inputs = SignalMap::new();
        self.inputs.inputs(t, &states, &mut inputs)?;
        if let Some(signal) = inputs.keys().find(|k| self.parameters.contains_key(*k)) {
            return Err(SimError::InputShadowsParameter {
                signal: signal.clone(),
            });
        }

        let mut known = states;
        known.extend(self.parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        known.extend(inputs);
        self.model.settle(t, &mut known, self.budget)?;
        Ok(known)
    }

    /// Latch the accepted instant into the model's stateful blocks.
    pub fn commit(&mut self, t: f64, known: &SignalMap) -> SimResult<()> {
        Ok(self.model.commit(t, known)?)
    }
}

impl<I: InputSource> DynamicSystem for EngineSystem<'_, I> {
    type State = DVector<f64>;

    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        let known = self.evaluate(t, x)?;
        self.layout.gather_derivatives(&known)
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
