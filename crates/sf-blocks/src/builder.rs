//! Model construction: scopes, port naming and registries.
//!
//! A [`ModelBuilder`] holds the stack of scopes under construction. Blocks
//! added through it become children of the innermost scope, and their port
//! names are rewritten by that scope:
//! - global names (no marker) are kept verbatim
//! - the bare marker produces a fresh `-<10 letters>` name when used as an
//!   output, and reuses the last generated name when used as an input
//! - other local names are qualified: `-x` inside `Top.Sub` becomes `-Top.Sub.x`
//! - locked nodes are never rewritten

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sf_core::{ANON_MARKER, Node};
use tracing::debug;

use crate::block::{Block, BlockKind};
use crate::error::{BlockError, BlockResult};
use crate::model::Model;
use crate::submodel::Submodel;

/// Seed of the anonymous-name generator unless overridden.
pub const DEFAULT_SEED: u64 = 0x5f5f_5349_474e_414c;

/// Number of random letters in a generated anonymous name.
const ANON_LEN: usize = 10;

#[derive(Debug, Default)]
struct Scope {
    path: String,
    children: Vec<Block>,
    last_anonymous: Option<String>,
}

/// Resolved ports of a newly added block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPorts {
    pub inputs: Vec<Node>,
    pub outputs: Vec<Node>,
}

impl BlockPorts {
    /// The single output of a one-output block.
    pub fn output(&self) -> BlockResult<Node> {
        self.outputs.first().cloned().ok_or(BlockError::Invariant {
            what: "block has no output port",
        })
    }

    pub fn input(&self, i: usize) -> Option<&Node> {
        self.inputs.get(i)
    }
}

#[derive(Debug)]
pub struct ModelBuilder {
    scopes: Vec<Scope>,
    outputs: BTreeSet<String>,
    inputs: BTreeSet<String>,
    rng: StdRng,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Builder with an unnamed root scope.
    pub fn new() -> Self {
        Self::named("")
    }

    /// Builder whose root scope qualifies local names with `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            scopes: vec![Scope {
                path: name.into(),
                ..Scope::default()
            }],
            outputs: BTreeSet::new(),
            inputs: BTreeSet::new(),
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Reseed the anonymous-name generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Dot path of the innermost scope.
    pub fn scope_path(&self) -> &str {
        self.scopes.last().map_or("", |s| s.path.as_str())
    }

    /// Nesting depth (0 at the root).
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Most recent anonymous name generated in the innermost scope.
    pub fn last_anonymous(&self) -> Option<&str> {
        self.scopes.last()?.last_anonymous.as_deref()
    }

    pub fn registered_outputs(&self) -> &BTreeSet<String> {
        &self.outputs
    }

    pub fn referenced_inputs(&self) -> &BTreeSet<String> {
        &self.inputs
    }

    fn scope_mut(&mut self) -> BlockResult<&mut Scope> {
        self.scopes.last_mut().ok_or(BlockError::Invariant {
            what: "builder has no open scope",
        })
    }

    fn qualify_block(&self, name: &str) -> String {
        match self.scope_path() {
            "" => name.to_owned(),
            path => format!("{path}.{name}"),
        }
    }

    fn generate_anonymous(&mut self) -> String {
        (0..ANON_LEN)
            .map(|_| char::from(self.rng.gen_range(b'a'..=b'z')))
            .collect()
    }

    /// Rewrite `node` for the innermost scope. `makenew` is `true` for outputs.
    pub fn resolve_node(&mut self, node: &Node, makenew: bool, block: &str) -> BlockResult<Node> {
        if node.is_locked() {
            return Ok(node.clone());
        }
        if !node.is_local() {
            return Ok(Node::locked(node.as_str()));
        }

        let (local, generated) = if node.is_anonymous() {
            if !makenew {
                let scope = self.scope_path().to_owned();
                return match self.last_anonymous() {
                    Some(name) => Ok(Node::locked(name)),
                    None => Err(BlockError::AnonymousWithoutProducer {
                        block: block.to_owned(),
                        scope,
                    }),
                };
            }
            (self.generate_anonymous(), true)
        } else {
            (node.as_str()[ANON_MARKER.len_utf8()..].to_owned(), false)
        };

        let qualified = match self.scope_path() {
            "" => format!("{ANON_MARKER}{local}"),
            path => format!("{ANON_MARKER}{path}.{local}"),
        };
        if generated {
            self.scope_mut()?.last_anonymous = Some(qualified.clone());
        }
        Ok(Node::locked(qualified))
    }

    fn resolve_ports(&mut self, block: &str, inputs: Vec<Node>, outputs: Vec<Node>) -> BlockResult<BlockPorts> {
        let inputs = inputs
            .iter()
            .map(|n| self.resolve_node(n, false, block))
            .collect::<BlockResult<Vec<_>>>()?;
        let outputs = outputs
            .iter()
            .map(|n| self.resolve_node(n, true, block))
            .collect::<BlockResult<Vec<_>>>()?;
        for n in &inputs {
            self.inputs.insert(n.to_string());
        }
        Ok(BlockPorts { inputs, outputs })
    }

    /// Add a leaf block to the innermost scope.
    pub fn add<I, O>(
        &mut self,
        name: &str,
        kind: BlockKind,
        inputs: impl IntoIterator<Item = I>,
        outputs: impl IntoIterator<Item = O>,
    ) -> BlockResult<BlockPorts>
    where
        I: Into<Node>,
        O: Into<Node>,
    {
        let name = self.qualify_block(name);
        let inputs: Vec<Node> = inputs.into_iter().map(Into::into).collect();
        let outputs: Vec<Node> = outputs.into_iter().map(Into::into).collect();
        kind.check_ports(&name, inputs.len(), outputs.len())?;

        let ports = self.resolve_ports(&name, inputs, outputs)?;
        for out in &ports.outputs {
            if !self.outputs.insert(out.to_string()) {
                return Err(BlockError::DuplicateOutput {
                    signal: out.to_string(),
                    block: name,
                });
            }
        }

        let block = Block::new(name, ports.inputs.clone(), ports.outputs.clone(), kind);
        self.scope_mut()?.children.push(block);
        Ok(ports)
    }

    /// Add a submodel whose children are created by `body`.
    ///
    /// The submodel's ports are resolved in the enclosing scope and handed to
    /// `body` locked. They are not registered as outputs.
    pub fn submodel<I, O, F>(
        &mut self,
        name: &str,
        inputs: impl IntoIterator<Item = I>,
        outputs: impl IntoIterator<Item = O>,
        body: F,
    ) -> BlockResult<BlockPorts>
    where
        I: Into<Node>,
        O: Into<Node>,
        F: FnOnce(&mut ModelBuilder, &BlockPorts) -> BlockResult<()>,
    {
        let name = self.qualify_block(name);
        let inputs: Vec<Node> = inputs.into_iter().map(Into::into).collect();
        let outputs: Vec<Node> = outputs.into_iter().map(Into::into).collect();
        let ports = self.resolve_ports(&name, inputs, outputs)?;

        self.scopes.push(Scope {
            path: name.clone(),
            ..Scope::default()
        });
        let result = body(self, &ports);
        let scope = self.scopes.pop().ok_or(BlockError::Invariant {
            what: "submodel scope vanished during construction",
        })?;
        result?;

        let block = Block::new(
            name,
            ports.inputs.clone(),
            ports.outputs.clone(),
            BlockKind::Submodel(Submodel::new(scope.children)),
        );
        self.scope_mut()?.children.push(block);
        Ok(ports)
    }

    /// Finish construction.
    pub fn build(mut self) -> BlockResult<Model> {
        if self.scopes.len() != 1 {
            return Err(BlockError::Invariant {
                what: "unbalanced submodel scopes at build",
            });
        }
        let root = self.scopes.remove(0);
        let block = Block::new(
            root.path,
            Vec::new(),
            Vec::new(),
            BlockKind::Submodel(Submodel::new(root.children)),
        );
        let model = Model::new(block, self.outputs, self.inputs);
        debug!(
            "Built model '{}': {} block(s), {} output signal(s), {} external input(s)",
            model.name(),
            model.block_count(),
            model.outputs().len(),
            model.external_inputs().len()
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_names_pass_through() {
        let mut b = ModelBuilder::named("Top");
        let n = b.resolve_node(&Node::new("speed"), true, "blk").unwrap();
        assert_eq!(n.as_str(), "speed");
        assert!(n.is_locked());
    }

    #[test]
    fn local_names_are_qualified() {
        let mut b = ModelBuilder::named("Top");
        let n = b.resolve_node(&Node::local("x"), false, "blk").unwrap();
        assert_eq!(n.as_str(), "-Top.x");

        let mut root = ModelBuilder::new();
        let n = root.resolve_node(&Node::local("x"), false, "blk").unwrap();
        assert_eq!(n.as_str(), "-x");
    }

    #[test]
    fn anonymous_output_then_input_pair_up() {
        let mut b = ModelBuilder::named("Top");
        let out = b.resolve_node(&Node::auto(), true, "a").unwrap();
        let inp = b.resolve_node(&Node::new(""), false, "b").unwrap();
        assert_eq!(out, inp);
        assert!(out.as_str().starts_with("-Top."));
        assert_eq!(out.as_str().len(), "-Top.".len() + ANON_LEN);
    }

    #[test]
    fn anonymous_input_without_producer() {
        let mut b = ModelBuilder::new();
        let err = b.resolve_node(&Node::new("auto"), false, "b").unwrap_err();
        assert!(matches!(err, BlockError::AnonymousWithoutProducer { .. }));
    }

    #[test]
    fn locked_nodes_untouched() {
        let mut b = ModelBuilder::named("Top");
        let n = Node::locked("-Outer.x");
        assert_eq!(b.resolve_node(&n, false, "b").unwrap(), n);
    }

    #[test]
    fn same_seed_same_names() {
        let mut a = ModelBuilder::new().with_seed(7);
        let mut b = ModelBuilder::new().with_seed(7);
        let na = a.resolve_node(&Node::auto(), true, "x").unwrap();
        let nb = b.resolve_node(&Node::auto(), true, "x").unwrap();
        assert_eq!(na, nb);
    }
}
