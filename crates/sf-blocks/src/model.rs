//! A built block network and its per-instant evaluation protocol.
//!
//! The stepper drives a [`Model`] through:
//! 1. [`Model::collect_states`] to read the integrator states
//! 2. [`Model::settle`] (or repeated [`Model::resolve`]) with a known-value
//!    map seeded from states, parameters and inputs
//! 3. [`Model::commit`] once a step is accepted

use std::collections::BTreeSet;

use sf_core::SignalMap;
use tracing::{trace, warn};

use crate::block::Block;
use crate::diagnostics::{UnresolvedBlock, find_cycles, unresolved_blocks};
use crate::error::{BlockError, BlockResult};
use crate::integrator::States;

/// Default number of resolution passes allowed per instant.
pub const DEFAULT_RESOLVE_BUDGET: usize = 1000;

#[derive(Debug)]
pub struct Model {
    root: Block,
    outputs: BTreeSet<String>,
    inputs: BTreeSet<String>,
}

impl Model {
    pub(crate) fn new(root: Block, outputs: BTreeSet<String>, inputs: BTreeSet<String>) -> Self {
        Self {
            root,
            outputs,
            inputs,
        }
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    /// Every registered output signal.
    pub fn outputs(&self) -> &BTreeSet<String> {
        &self.outputs
    }

    /// Every signal referenced as a block input.
    pub fn referenced_inputs(&self) -> &BTreeSet<String> {
        &self.inputs
    }

    /// Inputs no block produces: the caller must seed these.
    pub fn external_inputs(&self) -> BTreeSet<String> {
        self.inputs.difference(&self.outputs).cloned().collect()
    }

    /// Number of leaf blocks.
    pub fn block_count(&self) -> usize {
        let mut n = 0;
        self.root.traverse(&mut |b: &Block| {
            if !b.is_submodel() {
                n += 1;
            }
            true
        });
        n
    }

    pub fn collect_states(&self) -> States {
        let mut states = States::new();
        self.root.collect_states(&mut states);
        states
    }

    /// One resolution pass. Returns the number of blocks newly fired.
    pub fn resolve(&mut self, t: f64, known: &mut SignalMap, reset: bool) -> BlockResult<usize> {
        self.root.process(t, known, reset)
    }

    /// Whether every block fired during the current instant.
    pub fn is_resolved(&self) -> bool {
        self.root.is_processed()
    }

    /// Resolve the instant `t` completely: a reset pass, then further passes
    /// until every block has fired. Returns the number of passes used.
    pub fn settle(&mut self, t: f64, known: &mut SignalMap, budget: usize) -> BlockResult<usize> {
        if budget == 0 {
            return Err(BlockError::InvalidArg {
                what: "resolution budget must be at least 1",
            });
        }

        let mut fired = self.resolve(t, known, true)?;
        let mut passes = 1;
        trace!("t={t}: pass {passes} fired {fired}");
        while !self.is_resolved() {
            if fired == 0 {
                let (blocks, cycles) = self.diagnose(known);
                warn!("t={t}: dataflow stalled with {} unresolved block(s)", blocks.len());
                return Err(BlockError::Unresolved {
                    passes,
                    blocks,
                    cycles,
                });
            }
            if passes >= budget {
                let (blocks, cycles) = self.diagnose(known);
                warn!("t={t}: resolution budget of {budget} exhausted");
                return Err(BlockError::BudgetExhausted {
                    budget,
                    blocks,
                    cycles,
                });
            }
            fired = self.resolve(t, known, false)?;
            passes += 1;
            trace!("t={t}: pass {passes} fired {fired}");
        }
        Ok(passes)
    }

    fn diagnose(&self, known: &SignalMap) -> (Vec<UnresolvedBlock>, Vec<Vec<String>>) {
        let blocks = unresolved_blocks(&self.root, known);
        let cycles = find_cycles(&self.root, &blocks);
        (blocks, cycles)
    }

    /// Unprocessed leaf blocks and the inputs they still miss.
    pub fn unresolved(&self, known: &SignalMap) -> Vec<UnresolvedBlock> {
        unresolved_blocks(&self.root, known)
    }

    /// Latch accepted values into every stateful block.
    pub fn commit(&mut self, t: f64, final_values: &SignalMap) -> BlockResult<()> {
        trace!("t={t}: commit");
        self.root.commit(t, final_values)
    }

    /// Depth-first visit of every block (children before their submodel).
    pub fn traverse(&self, f: &mut dyn FnMut(&Block) -> bool) -> bool {
        self.root.traverse(f)
    }
}
