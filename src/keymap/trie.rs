//! Prefix tree from key sequences to bindings
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A node may hold a
//! binding and still have children (`d` and `dw`). Deleting a binding only
//! tombstones it, so the nodes below stay reachable. Each node counts the
//! live bindings strictly below it, which lets a node whose subtree has been
//! entirely deleted behave like a leaf.

use std::collections::HashMap;

use super::binding::Binding;
use super::types::KeyToken;

/// Index of a node in a [`KeymapTrie`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone)]
struct Slot {
    binding: Binding,
    deleted: bool,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<KeyToken, NodeId>,
    slot: Option<Slot>,
    /// Live bindings strictly below this node
    live_below: usize,
}

impl Node {
    fn live_binding(&self) -> Option<&Binding> {
        self.slot
            .as_ref()
            .filter(|slot| !slot.deleted)
            .map(|slot| &slot.binding)
    }
}

/// Result of feeding one token to the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// No binding continues with this token
    NoMatch,
    /// A binding matched and nothing longer starts with it
    Matched(&'a Binding),
    /// A binding matched but longer sequences also start here
    Ambiguous(NodeId, &'a Binding),
    /// A prefix of one or more bindings
    Pending(NodeId),
}

/// One mode's key sequences
#[derive(Debug, Clone)]
pub struct KeymapTrie {
    nodes: Vec<Node>,
}

impl Default for KeymapTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeymapTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Bind `sequence`, replacing any binding already at that exact path
    pub fn insert(&mut self, sequence: &[KeyToken], binding: Binding) {
        if sequence.is_empty() {
            return;
        }

        let mut path = Vec::with_capacity(sequence.len());
        let mut node = NodeId::ROOT;
        for token in sequence {
            path.push(node);
            node = match self.nodes[node.0].children.get(token) {
                Some(&child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(Node::default());
                    self.nodes[node.0].children.insert(token.clone(), child);
                    child
                }
            };
        }

        let was_live = self.nodes[node.0].live_binding().is_some();
        self.nodes[node.0].slot = Some(Slot {
            binding,
            deleted: false,
        });
        if !was_live {
            for ancestor in path {
                self.nodes[ancestor.0].live_below += 1;
            }
        }
    }

    /// Tombstone the binding at `sequence`; returns whether one was live
    pub fn delete(&mut self, sequence: &[KeyToken]) -> bool {
        let Some(path) = self.path(sequence) else {
            return false;
        };
        let Some(&node) = path.last() else {
            return false;
        };

        match self.nodes[node.0].slot.as_mut() {
            Some(slot) if !slot.deleted => slot.deleted = true,
            _ => return false,
        }
        for ancestor in &path[..path.len() - 1] {
            self.nodes[ancestor.0].live_below -= 1;
        }
        true
    }

    /// Advance from `node` by one token
    pub fn step(&self, node: NodeId, token: &KeyToken) -> Step<'_> {
        let Some(&child) = self.nodes[node.0].children.get(token) else {
            return Step::NoMatch;
        };

        let child_node = &self.nodes[child.0];
        match (child_node.live_binding(), child_node.live_below > 0) {
            (Some(binding), false) => Step::Matched(binding),
            (Some(binding), true) => Step::Ambiguous(child, binding),
            (None, true) => Step::Pending(child),
            (None, false) => Step::NoMatch,
        }
    }

    /// Live binding at exactly `sequence`
    pub fn lookup(&self, sequence: &[KeyToken]) -> Option<&Binding> {
        let path = self.path(sequence)?;
        self.nodes[path.last()?.0].live_binding()
    }

    /// Live binding held by `node`, if any
    pub fn binding(&self, node: NodeId) -> Option<&Binding> {
        self.nodes.get(node.0)?.live_binding()
    }

    /// All live bindings with their sequences, sorted by sequence
    pub fn list(&self) -> Vec<(Vec<KeyToken>, &Binding)> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect(NodeId::ROOT, &mut prefix, &mut out);
        out
    }

    /// Characters bound as complete single-key sequences
    pub fn single_key_chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.nodes[0]
            .children
            .iter()
            .filter(|(_, child)| self.nodes[child.0].live_binding().is_some())
            .filter_map(|(token, _)| token.as_char())
            .collect();
        chars.sort_unstable();
        chars
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.nodes[0].live_below
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nodes visited when walking `sequence`, starting with the root
    fn path(&self, sequence: &[KeyToken]) -> Option<Vec<NodeId>> {
        let mut node = NodeId::ROOT;
        let mut path = vec![node];
        for token in sequence {
            node = *self.nodes[node.0].children.get(token)?;
            path.push(node);
        }
        Some(path)
    }

    fn collect<'a>(
        &'a self,
        node: NodeId,
        prefix: &mut Vec<KeyToken>,
        out: &mut Vec<(Vec<KeyToken>, &'a Binding)>,
    ) {
        let current = &self.nodes[node.0];
        if let Some(binding) = current.live_binding() {
            out.push((prefix.clone(), binding));
        }
        if current.live_below == 0 {
            return;
        }

        let mut children: Vec<(&KeyToken, &NodeId)> = current.children.iter().collect();
        children.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (token, &child) in children {
            prefix.push(token.clone());
            self.collect(child, prefix, out);
            prefix.pop();
        }
    }
}
