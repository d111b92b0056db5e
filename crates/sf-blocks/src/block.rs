//! Blocks and their per-instant processing.
//!
//! A [`Block`] owns its resolved ports, the `processed` flag for the current
//! time instant, and a [`BlockKind`] carrying the behaviour:
//! - **Stateless**: combinators, gain, transforms, constants, bus
//! - **Stateful**: integrator (solver state), memory, delay, derivative,
//!   initial value (all latched on commit)
//! - **Composite**: submodel

use sf_core::{CoreError, CoreResult, Node, SignalMap, Value};

use crate::arithmetic::Combinator;
use crate::delay::Delay;
use crate::derivative::Derivative;
use crate::error::{BlockError, BlockResult};
use crate::integrator::{Integrator, StateEntry, States};
use crate::memory::{InitialValue, Memory};
use crate::submodel::Submodel;
use crate::transform::{Constant, Gain, Transform};

/// Block type and configuration.
#[derive(Debug)]
pub enum BlockKind {
    /// Add/subtract or multiply/divide fold.
    Combinator(Combinator),
    Gain(Gain),
    /// Identity, sine or user function.
    Transform(Transform),
    Constant(Constant),
    /// Concatenate every input into one vector.
    Bus,
    Integrator(Integrator),
    Memory(Memory),
    /// Inputs: live signal, delay duration, fallback.
    Delay(Delay),
    Derivative(Derivative),
    InitialValue(InitialValue),
    Submodel(Submodel),
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Combinator(_) => "combinator",
            BlockKind::Gain(_) => "gain",
            BlockKind::Transform(_) => "transform",
            BlockKind::Constant(_) => "constant",
            BlockKind::Bus => "bus",
            BlockKind::Integrator(_) => "integrator",
            BlockKind::Memory(_) => "memory",
            BlockKind::Delay(_) => "delay",
            BlockKind::Derivative(_) => "derivative",
            BlockKind::InitialValue(_) => "initial value",
            BlockKind::Submodel(_) => "submodel",
        }
    }

    /// Validate port counts against the kind.
    pub(crate) fn check_ports(&self, block: &str, inputs: usize, outputs: usize) -> BlockResult<()> {
        let port_error = |what: &'static str, expected: String, actual: usize| BlockError::PortCount {
            block: block.to_owned(),
            kind: self.name(),
            what,
            expected,
            actual,
        };

        let expected_inputs = match self {
            BlockKind::Submodel(_) => return Ok(()),
            BlockKind::Combinator(c) => {
                if c.arity() != inputs {
                    return Err(BlockError::OperatorArity {
                        block: block.to_owned(),
                        operators: c.arity(),
                        inputs,
                    });
                }
                inputs
            }
            BlockKind::Bus => {
                if inputs == 0 {
                    return Err(port_error("input", "at least 1".into(), 0));
                }
                inputs
            }
            BlockKind::Constant(_) => 0,
            BlockKind::Delay(_) => 3,
            _ => 1,
        };
        if inputs != expected_inputs {
            return Err(port_error("input", expected_inputs.to_string(), inputs));
        }
        if outputs != 1 {
            return Err(port_error("output", "1".into(), outputs));
        }
        Ok(())
    }

    /// The inputs that must be known before the block can fire.
    pub fn needed_inputs<'a>(&self, inputs: &'a [Node]) -> &'a [Node] {
        match self {
            BlockKind::Memory(_) | BlockKind::Constant(_) => &[],
            // The live signal is only consumed on commit
            BlockKind::Delay(_) => inputs.get(1..).unwrap_or(&[]),
            BlockKind::InitialValue(iv) if iv.latched().is_some() => &[],
            _ => inputs,
        }
    }

    /// Outputs for the needed inputs `args` at time `t`.
    pub fn activation(&self, t: f64, args: &[Value]) -> CoreResult<Vec<Value>> {
        let arg = |i: usize| {
            args.get(i).ok_or(CoreError::InvalidArg {
                what: "activation called with too few inputs",
            })
        };
        let out = match self {
            BlockKind::Combinator(c) => c.apply(args)?,
            BlockKind::Gain(g) => g.apply(arg(0)?),
            BlockKind::Transform(tr) => tr.apply(t, arg(0)?),
            BlockKind::Constant(c) => c.value.clone(),
            BlockKind::Bus => Value::concat(args),
            BlockKind::Integrator(int) => int.value().clone(),
            BlockKind::Memory(m) => m.held().clone(),
            BlockKind::Delay(d) => d.evaluate(t, arg(0)?, arg(1)?)?,
            BlockKind::Derivative(d) => d.evaluate(t, arg(0)?)?,
            BlockKind::InitialValue(iv) => iv.output(args.first()).ok_or(CoreError::Empty {
                what: "initial value input",
            })?,
            BlockKind::Submodel(_) => return Ok(Vec::new()),
        };
        Ok(vec![out])
    }
}

/// Processing element in the block network.
#[derive(Debug)]
pub struct Block {
    name: String,
    inputs: Vec<Node>,
    outputs: Vec<Node>,
    processed: bool,
    kind: BlockKind,
}

impl Block {
    pub(crate) fn new(name: String, inputs: Vec<Node>, outputs: Vec<Node>, kind: BlockKind) -> Self {
        Self {
            name,
            inputs,
            outputs,
            processed: false,
            kind,
        }
    }

    /// Dot-qualified block name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Node] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Node] {
        &self.outputs
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    /// Whether the block fired during the current instant.
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn is_submodel(&self) -> bool {
        matches!(self.kind, BlockKind::Submodel(_))
    }

    /// Direct children (empty for leaf blocks).
    pub fn children(&self) -> &[Block] {
        match &self.kind {
            BlockKind::Submodel(sub) => sub.children(),
            _ => &[],
        }
    }

    /// Run the activation function with this block's name attached to errors.
    pub fn activation(&self, t: f64, args: &[Value]) -> BlockResult<Vec<Value>> {
        self.kind
            .activation(t, args)
            .map_err(|source| BlockError::Evaluation {
                block: self.name.clone(),
                source,
            })
    }

    /// Attempt to process the block at `t`. Returns the number of blocks newly fired.
    ///
    /// `reset` clears the `processed` flag first (and, for submodels, of every
    /// descendant visited).
    pub fn process(&mut self, t: f64, known: &mut SignalMap, reset: bool) -> BlockResult<usize> {
        if reset {
            self.processed = false;
        }

        match self.kind {
            BlockKind::Submodel(ref mut sub) => {
                if self.processed {
                    return Ok(0);
                }
                let (fired, done) = sub.pass(t, known, reset)?;
                self.processed = done;
                Ok(fired)
            }
            BlockKind::Integrator(_) => {
                if self.processed {
                    return Ok(0);
                }
                // Ready as soon as the solver can read the derivative
                self.processed = known.contains_key(self.inputs[0].as_str());
                Ok(usize::from(self.processed))
            }
            _ => self.fire(t, known),
        }
    }

    fn fire(&mut self, t: f64, known: &mut SignalMap) -> BlockResult<usize> {
        if self.processed {
            return Ok(0);
        }

        let needed = self.kind.needed_inputs(&self.inputs);
        let mut args = Vec::with_capacity(needed.len());
        for node in needed {
            match known.get(node.as_str()) {
                Some(v) => args.push(v.clone()),
                None => return Ok(0),
            }
        }

        if let Some(node) = self.outputs.iter().find(|o| known.contains_key(o.as_str())) {
            return Err(BlockError::DoubleWrite {
                block: self.name.clone(),
                signal: node.to_string(),
            });
        }

        let values = self.activation(t, &args)?;
        if values.len() != self.outputs.len() {
            return Err(BlockError::Invariant {
                what: "activation produced a different number of outputs than ports",
            });
        }
        for (node, value) in self.outputs.iter().zip(values) {
            known.insert(node.as_str().to_owned(), value);
        }

        self.processed = true;
        Ok(1)
    }

    /// Append this block's solver states (integrators only).
    pub fn collect_states(&self, states: &mut States) {
        match &self.kind {
            BlockKind::Integrator(int) => {
                states.insert(
                    self.outputs[0].to_string(),
                    StateEntry {
                        derivative: self.inputs[0].to_string(),
                        value: int.value().clone(),
                    },
                );
            }
            BlockKind::Submodel(sub) => sub.collect_states(states),
            _ => {}
        }
    }

    /// Latch the accepted values of instant `t` into stateful blocks.
    pub fn commit(&mut self, t: f64, final_values: &SignalMap) -> BlockResult<()> {
        let name = &self.name;
        match &mut self.kind {
            BlockKind::Integrator(int) => {
                int.latch(final_value(name, final_values, &self.outputs[0])?.clone());
            }
            BlockKind::Memory(m) => {
                m.latch(final_value(name, final_values, &self.inputs[0])?.clone());
            }
            BlockKind::Delay(d) => {
                let value = final_value(name, final_values, &self.inputs[0])?.clone();
                d.record(t, value)
                    .map_err(|last| BlockError::NonMonotonicCommit {
                        block: name.clone(),
                        t,
                        last,
                    })?;
            }
            BlockKind::Derivative(d) => {
                let input = final_value(name, final_values, &self.inputs[0])?.clone();
                let output = final_value(name, final_values, &self.outputs[0])?.clone();
                d.record(t, input, output);
            }
            BlockKind::InitialValue(iv) => {
                if iv.latched().is_none() {
                    iv.latch(final_value(name, final_values, &self.inputs[0])?);
                }
            }
            BlockKind::Submodel(sub) => sub.commit(t, final_values)?,
            _ => {}
        }
        Ok(())
    }

    /// Visit descendants depth-first, then this block. Stops when `f` returns `false`.
    pub fn traverse(&self, f: &mut dyn FnMut(&Block) -> bool) -> bool {
        for child in self.children() {
            if !child.traverse(f) {
                return false;
            }
        }
        f(self)
    }

    /// Inputs that keep this block from being processed.
    pub fn missing_inputs(&self, known: &SignalMap) -> Vec<String> {
        let waiting_on: &[Node] = match &self.kind {
            BlockKind::Submodel(_) => &[],
            BlockKind::Integrator(_) => self.inputs.as_slice(),
            kind => kind.needed_inputs(&self.inputs),
        };
        waiting_on
            .iter()
            .filter(|n| !known.contains_key(n.as_str()))
            .map(|n| n.to_string())
            .collect()
    }
}

fn final_value<'a>(block: &str, final_values: &'a SignalMap, node: &Node) -> BlockResult<&'a Value> {
    final_values
        .get(node.as_str())
        .ok_or_else(|| BlockError::MissingSignal {
            block: block.to_owned(),
            signal: node.to_string(),
        })
}
