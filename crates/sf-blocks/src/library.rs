//! Convenience constructors for the standard block kinds.
//!
//! Each helper adds one block to the innermost scope and returns its resolved
//! output node, so chains read naturally:
//!
//! ```ignore
//! let y = b.gain("k", "u", Node::auto(), 2.0)?;
//! b.integrator("int", y, "x", 0.0)?;
//! ```

use sf_core::{Node, Value};

use crate::arithmetic::{Combinator, Family};
use crate::block::BlockKind;
use crate::builder::ModelBuilder;
use crate::delay::{DEFAULT_LIFESPAN, Delay};
use crate::derivative::Derivative;
use crate::error::{BlockError, BlockResult};
use crate::integrator::Integrator;
use crate::memory::{InitialValue, Memory};
use crate::transform::{Constant, Gain, Transform};

fn node(n: impl Into<Node>) -> Node {
    n.into()
}

impl ModelBuilder {
    fn single<I: Into<Node>>(
        &mut self,
        name: &str,
        kind: BlockKind,
        inputs: impl IntoIterator<Item = I>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        self.add(name, kind, inputs, [node(output)])?.output()
    }

    /// Fold with an explicit family and seed.
    pub fn combinator<I: Into<Node>>(
        &mut self,
        name: &str,
        combinator: Combinator,
        inputs: impl IntoIterator<Item = I>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        self.single(name, BlockKind::Combinator(combinator), inputs, output)
    }

    /// `operators` over `+`/`-`, seeded with 0.
    pub fn add_sub<I: Into<Node>>(
        &mut self,
        name: &str,
        operators: &str,
        inputs: impl IntoIterator<Item = I>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        let c = Combinator::new(Family::AddSub, operators)?;
        self.combinator(name, c, inputs, output)
    }

    /// `operators` over `*`/`/`, seeded with 1.
    pub fn mul_div<I: Into<Node>>(
        &mut self,
        name: &str,
        operators: &str,
        inputs: impl IntoIterator<Item = I>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        let c = Combinator::new(Family::MulDiv, operators)?;
        self.combinator(name, c, inputs, output)
    }

    pub fn gain(&mut self, name: &str, input: impl Into<Node>, output: impl Into<Node>, k: f64) -> BlockResult<Node> {
        self.single(name, BlockKind::Gain(Gain { k }), [node(input)], output)
    }

    pub fn sine(&mut self, name: &str, input: impl Into<Node>, output: impl Into<Node>) -> BlockResult<Node> {
        self.single(name, BlockKind::Transform(Transform::Sine), [node(input)], output)
    }

    /// Elementwise `f(t, x)`.
    pub fn function(
        &mut self,
        name: &str,
        input: impl Into<Node>,
        output: impl Into<Node>,
        f: impl Fn(f64, f64) -> f64 + 'static,
    ) -> BlockResult<Node> {
        let kind = BlockKind::Transform(Transform::function(f));
        self.single(name, kind, [node(input)], output)
    }

    /// Forward `input` under a new name.
    pub fn signal(&mut self, name: &str, input: impl Into<Node>, output: impl Into<Node>) -> BlockResult<Node> {
        self.single(name, BlockKind::Transform(Transform::Identity), [node(input)], output)
    }

    pub fn constant(&mut self, name: &str, output: impl Into<Node>, value: impl Into<Value>) -> BlockResult<Node> {
        let kind = BlockKind::Constant(Constant { value: value.into() });
        self.single(name, kind, std::iter::empty::<Node>(), output)
    }

    /// Integrate `derivative` into the state signal `output`.
    pub fn integrator(
        &mut self,
        name: &str,
        derivative: impl Into<Node>,
        output: impl Into<Node>,
        initial: impl Into<Value>,
    ) -> BlockResult<Node> {
        let kind = BlockKind::Integrator(Integrator::new(initial.into()));
        self.single(name, kind, [node(derivative)], output)
    }

    pub fn memory(
        &mut self,
        name: &str,
        input: impl Into<Node>,
        output: impl Into<Node>,
        initial: impl Into<Value>,
    ) -> BlockResult<Node> {
        let kind = BlockKind::Memory(Memory::new(initial.into()));
        self.single(name, kind, [node(input)], output)
    }

    /// Transport delay with the default lifespan.
    pub fn delay(
        &mut self,
        name: &str,
        input: impl Into<Node>,
        delay: impl Into<Node>,
        fallback: impl Into<Node>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        self.delay_with_lifespan(name, input, delay, fallback, output, DEFAULT_LIFESPAN)
    }

    pub fn delay_with_lifespan(
        &mut self,
        name: &str,
        input: impl Into<Node>,
        delay: impl Into<Node>,
        fallback: impl Into<Node>,
        output: impl Into<Node>,
        lifespan: f64,
    ) -> BlockResult<Node> {
        let delay_block = Delay::new(lifespan).map_err(|_| BlockError::InvalidArg {
            what: "delay lifespan must be positive",
        })?;
        self.single(
            name,
            BlockKind::Delay(delay_block),
            [node(input), node(delay), node(fallback)],
            output,
        )
    }

    /// Backward-difference derivative, `initial` until the first commit.
    pub fn derivative(
        &mut self,
        name: &str,
        input: impl Into<Node>,
        output: impl Into<Node>,
        initial: impl Into<Value>,
    ) -> BlockResult<Node> {
        let kind = BlockKind::Derivative(Derivative::new(initial.into()));
        self.single(name, kind, [node(input)], output)
    }

    pub fn initial_value(&mut self, name: &str, input: impl Into<Node>, output: impl Into<Node>) -> BlockResult<Node> {
        let kind = BlockKind::InitialValue(InitialValue::default());
        self.single(name, kind, [node(input)], output)
    }

    /// Concatenate `inputs` into one vector signal.
    pub fn bus<I: Into<Node>>(
        &mut self,
        name: &str,
        inputs: impl IntoIterator<Item = I>,
        output: impl Into<Node>,
    ) -> BlockResult<Node> {
        self.single(name, BlockKind::Bus, inputs, output)
    }
}
