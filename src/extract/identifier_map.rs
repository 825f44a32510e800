use std::collections::HashMap;

use crate::extract::extraction_model::McpId;

/// Identifier → live node registry of one extraction pass.
///
/// A new pass builds a fresh map and the owner swaps it in whole; entries
/// are never merged across passes. Stale entries (the document mutated
/// after extraction) still resolve, possibly to a detached node.
#[derive(Debug, Clone)]
pub struct IdentifierMap<N> {
    entries: HashMap<McpId, N>,
    order: Vec<McpId>,
}

impl<N> Default for IdentifierMap<N> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<N: Copy> IdentifierMap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: McpId, node: N) {
        if self.entries.insert(id.clone(), node).is_none() {
            self.order.push(id);
        }
    }

    pub fn resolve(&self, id: &McpId) -> Option<N> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &McpId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&McpId, N)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entries.get(id).map(|n| (id, *n)))
    }
}
