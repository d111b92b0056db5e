//! Transport-delay demonstration model.

use sf_blocks::{BlockResult, Model, ModelBuilder};
use sf_core::Node;

pub const DEFAULT_DELAY: f64 = 2.7435;

/// `output(t) = input(t - delay)`, `initial` before any history exists.
pub fn build_delay_demo(
    b: &mut ModelBuilder,
    input: impl Into<Node>,
    output: impl Into<Node>,
    delay: f64,
    initial: f64,
) -> BlockResult<Node> {
    b.constant("TimeDelay", Node::local("time_delay"), delay)?;
    b.constant("Initial", Node::local("initial"), initial)?;
    b.delay(
        "Delay",
        input,
        Node::local("time_delay"),
        Node::local("initial"),
        output,
    )
}

pub fn delay_model(
    seed: u64,
    input: impl Into<Node>,
    output: impl Into<Node>,
    delay: f64,
    initial: f64,
) -> BlockResult<Model> {
    let mut b = ModelBuilder::new().with_seed(seed);
    build_delay_demo(&mut b, input, output, delay, initial)?;
    b.build()
}
