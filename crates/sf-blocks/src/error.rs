//! Error types for model construction and evaluation.

use sf_core::CoreError;
use thiserror::Error;

use crate::diagnostics::{UnresolvedBlock, describe_unresolved};

/// Result type for block and model operations.
pub type BlockResult<T> = Result<T, BlockError>;

/// Errors raised while wiring or evaluating a block network.
///
/// Every variant is a modelling fault; none of them is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlockError {
    /// Two blocks claim the same output signal.
    #[error("Duplicate output signal '{signal}' declared by block '{block}'")]
    DuplicateOutput { signal: String, block: String },

    /// An anonymous input was used before anything produced one in scope.
    #[error("Block '{block}' consumes an anonymous signal but scope '{scope}' has produced none")]
    AnonymousWithoutProducer { block: String, scope: String },

    /// Operator string length disagrees with the input count.
    #[error("Block '{block}' has {operators} operator(s) for {inputs} input(s)")]
    OperatorArity {
        block: String,
        operators: usize,
        inputs: usize,
    },

    /// Operator character not accepted by the combinator family.
    #[error("Unknown operator '{op}' for {family} block")]
    UnknownOperator { op: char, family: &'static str },

    /// Port count does not fit the block kind.
    #[error("Block '{block}' ({kind}) expects {expected} {what} port(s), got {actual}")]
    PortCount {
        block: String,
        kind: &'static str,
        what: &'static str,
        expected: String,
        actual: usize,
    },

    /// A block tried to write a signal that is already known this instant.
    #[error("Block '{block}' writes signal '{signal}' which is already known")]
    DoubleWrite { block: String, signal: String },

    /// Evaluation reached a fixed point with blocks still waiting on inputs.
    #[error("Unresolved dataflow after {passes} pass(es): {}", describe_unresolved(.blocks, .cycles))]
    Unresolved {
        passes: usize,
        blocks: Vec<UnresolvedBlock>,
        cycles: Vec<Vec<String>>,
    },

    /// The resolution budget ran out before every block fired.
    #[error("Resolution budget of {budget} pass(es) exhausted: {}", describe_unresolved(.blocks, .cycles))]
    BudgetExhausted {
        budget: usize,
        blocks: Vec<UnresolvedBlock>,
        cycles: Vec<Vec<String>>,
    },

    /// A stateful block needs a committed value that is not in the final map.
    #[error("Block '{block}' cannot commit: signal '{signal}' has no final value")]
    MissingSignal { block: String, signal: String },

    /// Delay commits must move forward in time.
    #[error("Block '{block}' committed at t={t} which is not after the last sample t={last}")]
    NonMonotonicCommit { block: String, t: f64, last: f64 },

    /// Activation failed on malformed operands.
    #[error("Block '{block}' failed to evaluate: {source}")]
    Evaluation {
        block: String,
        #[source]
        source: CoreError,
    },

    /// Invalid argument provided to a block constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Internal invariant violated.
    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
