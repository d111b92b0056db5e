//! Unresolved-dataflow report and dependency-cycle detection.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use sf_core::SignalMap;

use crate::block::Block;

/// A block that did not fire, with the inputs it was still waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedBlock {
    pub name: String,
    pub missing: Vec<String>,
}

/// Collect every unprocessed leaf block under `root`.
pub fn unresolved_blocks(root: &Block, known: &SignalMap) -> Vec<UnresolvedBlock> {
    let mut out = Vec::new();
    root.traverse(&mut |block: &Block| {
        if !block.is_submodel() && !block.is_processed() {
            out.push(UnresolvedBlock {
                name: block.name().to_owned(),
                missing: block.missing_inputs(known),
            });
        }
        true
    });
    out
}

/// Dependency cycles among unresolved blocks.
///
/// An edge `a -> b` exists when `b` waits on a signal produced by `a`. Each
/// returned cycle is a strongly connected component of size > 1, or a block
/// waiting on its own output. Block names within a cycle are sorted.
pub fn find_cycles(root: &Block, unresolved: &[UnresolvedBlock]) -> Vec<Vec<String>> {
    let mut producers: BTreeMap<String, String> = BTreeMap::new();
    root.traverse(&mut |block: &Block| {
        if !block.is_submodel() {
            for out in block.outputs() {
                producers.insert(out.to_string(), block.name().to_owned());
            }
        }
        true
    });

    let mut graph = DiGraph::<&str, ()>::new();
    let mut index: BTreeMap<&str, NodeIndex> = BTreeMap::new();
    for block in unresolved {
        index.insert(block.name.as_str(), graph.add_node(block.name.as_str()));
    }

    let mut self_loops = BTreeSet::new();
    for block in unresolved {
        let to = index[block.name.as_str()];
        for signal in &block.missing {
            let Some(producer) = producers.get(signal) else {
                continue;
            };
            let Some(&from) = index.get(producer.as_str()) else {
                continue;
            };
            if from == to {
                self_loops.insert(to);
            }
            graph.add_edge(from, to, ());
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || self_loops.contains(&scc[0]))
        .map(|scc| {
            let mut names: Vec<String> = scc.iter().map(|&i| graph[i].to_owned()).collect();
            names.sort();
            names
        })
        .collect();
    cycles.sort();
    cycles
}

/// One-line human readable summary used in error messages.
pub fn describe_unresolved(blocks: &[UnresolvedBlock], cycles: &[Vec<String>]) -> String {
    let mut parts: Vec<String> = blocks
        .iter()
        .map(|b| {
            if b.missing.is_empty() {
                b.name.clone()
            } else {
                format!("{} (missing {})", b.name, b.missing.join(", "))
            }
        })
        .collect();
    if parts.is_empty() {
        parts.push("no pending blocks".to_owned());
    }

    let mut text = parts.join("; ");
    for cycle in cycles {
        text.push_str(&format!("; cycle [{}]", cycle.join(" -> ")));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_missing_inputs_and_cycles() {
        let blocks = vec![
            UnresolvedBlock {
                name: "a".into(),
                missing: vec!["x".into()],
            },
            UnresolvedBlock {
                name: "b".into(),
                missing: vec![],
            },
        ];
        let text = describe_unresolved(&blocks, &[vec!["a".into(), "c".into()]]);
        assert_eq!(text, "a (missing x); b; cycle [a -> c]");
    }
}
