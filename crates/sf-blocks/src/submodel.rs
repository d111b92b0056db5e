//! Composite block owning an ordered list of children.

use sf_core::SignalMap;

use crate::block::Block;
use crate::error::BlockResult;
use crate::integrator::States;

#[derive(Debug, Default)]
pub struct Submodel {
    children: Vec<Block>,
}

impl Submodel {
    pub(crate) fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// Process every child once in declaration order.
    ///
    /// Returns the number of blocks fired and whether all children are now processed.
    pub(crate) fn pass(&mut self, t: f64, known: &mut SignalMap, reset: bool) -> BlockResult<(usize, bool)> {
        let mut fired = 0;
        let mut done = true;
        for child in &mut self.children {
            fired += child.process(t, known, reset)?;
            done &= child.is_processed();
        }
        Ok((fired, done))
    }

    pub(crate) fn collect_states(&self, states: &mut States) {
        for child in &self.children {
            child.collect_states(states);
        }
    }

    pub(crate) fn commit(&mut self, t: f64, final_values: &SignalMap) -> BlockResult<()> {
        for child in &mut self.children {
            child.commit(t, final_values)?;
        }
        Ok(())
    }
}
