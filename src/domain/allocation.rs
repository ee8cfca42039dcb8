//! The sibling group currently on screen

use crate::domain::redistribution::{self, Adjustment, Normalization, DRIFT_TOLERANCE};
use crate::domain::{CategoryNode, DomainError, NodeId, FULL_ALLOCATION};

/// Ordered categories sharing one parent, constrained to sum to 100%.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiblingGroup {
    nodes: Vec<CategoryNode>,
}

impl SiblingGroup {
    pub fn new(nodes: Vec<CategoryNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[CategoryNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<CategoryNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&CategoryNode, DomainError> {
        self.nodes.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    /// Parent shared by the group, taken from its first member.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.nodes.first().and_then(|n| n.parent_id)
    }

    pub fn total(&self) -> f64 {
        redistribution::total(&self.nodes)
    }

    /// Whether the group satisfies the 100% invariant.
    pub fn is_balanced(&self) -> bool {
        (self.total() - FULL_ALLOCATION).abs() < DRIFT_TOLERANCE
    }

    /// See [`redistribution::adjust`].
    pub fn adjust(&mut self, index: usize, new_value: f64) -> Adjustment {
        redistribution::adjust(&mut self.nodes, index, new_value)
    }

    /// See [`redistribution::normalize`].
    pub fn normalize(&mut self, fixed: usize) -> Normalization {
        redistribution::normalize(&mut self.nodes, fixed)
    }
}

impl From<Vec<CategoryNode>> for SiblingGroup {
    fn from(nodes: Vec<CategoryNode>) -> Self {
        Self::new(nodes)
    }
}
