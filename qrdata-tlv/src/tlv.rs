//! TLV tree model
//!
//! A decoded payload is an ordered list of [`TlvNode`] siblings. Constructed
//! nodes own their children and keep the raw bytes they were parsed from.
//! Trees are never patched in place; build a new one instead.

use serde::{Deserialize, Serialize};

/// One Tag-Length-Value object
///
/// # Invariants
///
/// - A node with children is constructed; `value` then holds the raw bytes
///   the children were decoded from and is ignored on encode.
/// - A node without children is a leaf and `length == value.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TlvNode {
    pub tag: u32,
    pub length: usize,
    #[serde(with = "serde_bytes")]
    pub value: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TlvNode>,
}

impl TlvNode {
    /// Create a node from raw parts without any consistency check
    pub fn new(tag: u32, length: usize, value: Vec<u8>, children: Vec<TlvNode>) -> Self {
        Self {
            tag,
            length,
            value,
            children,
        }
    }

    /// Create a leaf whose length is taken from `value`
    pub fn primitive(tag: u32, value: impl Into<Vec<u8>>) -> Self {
        let value = value.into();
        Self {
            tag,
            length: value.len(),
            value,
            children: Vec::new(),
        }
    }

    pub fn is_constructed(&self) -> bool {
        !self.children.is_empty()
    }

    /// Value interpreted as UTF-8, with invalid sequences replaced
    pub fn value_as_string(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// Value of the first node with `tag`, searching each node before its children
pub fn find_first(nodes: &[TlvNode], tag: u32) -> Option<&[u8]> {
    for node in nodes {
        if node.tag == tag {
            return Some(&node.value);
        }
        if let Some(found) = find_first(&node.children, tag) {
            return Some(found);
        }
    }
    None
}

/// Values of all nodes with `tag`, in pre-order
pub fn find_all(nodes: &[TlvNode], tag: u32) -> Vec<&[u8]> {
    let mut found = Vec::new();
    visit_all(nodes, &mut |node| {
        if node.tag == tag {
            found.push(node.value.as_slice());
        }
    });
    found
}

/// Apply `f` to every node in pre-order
pub fn visit_all<'a, F>(nodes: &'a [TlvNode], f: &mut F)
where
    F: FnMut(&'a TlvNode),
{
    for node in nodes {
        f(node);
        visit_all(&node.children, f);
    }
}

/// All nodes of the tree in pre-order
pub fn flatten(nodes: &[TlvNode]) -> Vec<&TlvNode> {
    let mut flat = Vec::new();
    visit_all(nodes, &mut |node| flat.push(node));
    flat
}
