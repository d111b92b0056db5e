//! sf-blocks: the block-diagram evaluation engine.
//!
//! Contains:
//! - block kinds (arithmetic, transforms, integrator, memory, delay, ...)
//! - builder (scoped port naming, registries, submodel bodies)
//! - model (multi-pass dataflow resolution, state collection, commit)
//! - diagnostics (unresolved blocks and dependency cycles)

pub mod arithmetic;
pub mod block;
pub mod builder;
pub mod delay;
pub mod derivative;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod library;
pub mod memory;
pub mod model;
pub mod submodel;
pub mod transform;

pub use arithmetic::{Combinator, Family, Operator};
pub use block::{Block, BlockKind};
pub use builder::{BlockPorts, DEFAULT_SEED, ModelBuilder};
pub use delay::{DEFAULT_LIFESPAN, Delay};
pub use derivative::Derivative;
pub use diagnostics::UnresolvedBlock;
pub use error::{BlockError, BlockResult};
pub use integrator::{Integrator, StateEntry, States};
pub use memory::{InitialValue, Memory};
pub use model::{DEFAULT_RESOLVE_BUDGET, Model};
pub use submodel::Submodel;
pub use transform::{Constant, Gain, Transform};
