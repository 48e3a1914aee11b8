#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a node in the node-based graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub u32);

/// Identifier of an edge in the node-based graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EdgeId(pub u32);

/// Identifier of a node in the edge-based graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EdgeBasedNodeId(pub u32);

impl NodeId {
    pub const INVALID: Self = Self(u32::MAX);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl EdgeId {
    pub const INVALID: Self = Self(u32::MAX);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl EdgeBasedNodeId {
    pub const INVALID: Self = Self(u32::MAX);

    pub fn get(self) -> u32 {
        self.0
    }
}

pub type SegmentWeight = u32;
pub type SegmentDuration = u32;
pub type DatasourceId = u8;

/// Relates a node of the node-based graph to its edge-based counterpart.
///
/// Mappings are stored as a flat sequence; consumers rely on the position of
/// each entry, so the order produced by the extractor must be kept.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeMapping {
    pub node_based: NodeId,
    pub edge_based: EdgeBasedNodeId,
}

impl NodeMapping {
    pub fn new(node_based: NodeId, edge_based: EdgeBasedNodeId) -> Self {
        Self {
            node_based,
            edge_based,
        }
    }
}
