#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::types::{DatasourceId, NodeId, SegmentDuration, SegmentWeight};

/// One segment's values across all per-segment columns.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentEntry {
    pub node: NodeId,
    pub fwd_weight: SegmentWeight,
    pub rev_weight: SegmentWeight,
    pub fwd_duration: SegmentDuration,
    pub rev_duration: SegmentDuration,
    pub datasource: DatasourceId,
}

/// Raw column form of [`SegmentData`], as produced by upstream stages.
///
/// Nothing ties the column lengths together here; convert with
/// [`SegmentData::from_columns`] to get a checked aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentColumns {
    pub index: Vec<u32>,
    pub nodes: Vec<NodeId>,
    pub fwd_weights: Vec<SegmentWeight>,
    pub rev_weights: Vec<SegmentWeight>,
    pub fwd_durations: Vec<SegmentDuration>,
    pub rev_durations: Vec<SegmentDuration>,
    pub datasources: Vec<DatasourceId>,
}

/// Per-segment geometry data.
///
/// The six per-segment columns always share one length. The `index` column
/// is independent and usually maps geometry ids to offsets into the columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentData {
    index: Vec<u32>,
    nodes: Vec<NodeId>,
    fwd_weights: Vec<SegmentWeight>,
    rev_weights: Vec<SegmentWeight>,
    fwd_durations: Vec<SegmentDuration>,
    rev_durations: Vec<SegmentDuration>,
    datasources: Vec<DatasourceId>,
}

impl SegmentData {
    pub fn new(index: Vec<u32>) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_capacity(index: Vec<u32>, segments: usize) -> Self {
        Self {
            index,
            nodes: Vec::with_capacity(segments),
            fwd_weights: Vec::with_capacity(segments),
            rev_weights: Vec::with_capacity(segments),
            fwd_durations: Vec::with_capacity(segments),
            rev_durations: Vec::with_capacity(segments),
            datasources: Vec::with_capacity(segments),
        }
    }

    /// Builds the aggregate from raw columns, rejecting any per-segment
    /// column whose length differs from `nodes`.
    pub fn from_columns(columns: SegmentColumns) -> Result<Self, InvariantViolation> {
        let expected = columns.nodes.len();
        let lengths = [
            ("fwd_weights", columns.fwd_weights.len()),
            ("rev_weights", columns.rev_weights.len()),
            ("fwd_durations", columns.fwd_durations.len()),
            ("rev_durations", columns.rev_durations.len()),
            ("datasources", columns.datasources.len()),
        ];
        if let Some((column, actual)) = lengths.into_iter().find(|(_, len)| *len != expected) {
            return Err(InvariantViolation::ColumnLength {
                column,
                expected,
                actual,
            });
        }

        Ok(Self {
            index: columns.index,
            nodes: columns.nodes,
            fwd_weights: columns.fwd_weights,
            rev_weights: columns.rev_weights,
            fwd_durations: columns.fwd_durations,
            rev_durations: columns.rev_durations,
            datasources: columns.datasources,
        })
    }

    pub fn into_columns(self) -> SegmentColumns {
        SegmentColumns {
            index: self.index,
            nodes: self.nodes,
            fwd_weights: self.fwd_weights,
            rev_weights: self.rev_weights,
            fwd_durations: self.fwd_durations,
            rev_durations: self.rev_durations,
            datasources: self.datasources,
        }
    }

    pub fn push(&mut self, entry: SegmentEntry) {
        self.nodes.push(entry.node);
        self.fwd_weights.push(entry.fwd_weight);
        self.rev_weights.push(entry.rev_weight);
        self.fwd_durations.push(entry.fwd_duration);
        self.rev_durations.push(entry.rev_duration);
        self.datasources.push(entry.datasource);
    }

    /// Number of segments (the shared length of the per-segment columns).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn entry(&self, i: usize) -> Option<SegmentEntry> {
        Some(SegmentEntry {
            node: *self.nodes.get(i)?,
            fwd_weight: self.fwd_weights[i],
            rev_weight: self.rev_weights[i],
            fwd_duration: self.fwd_durations[i],
            rev_duration: self.rev_durations[i],
            datasource: self.datasources[i],
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = SegmentEntry> + '_ {
        (0..self.len()).filter_map(move |i| self.entry(i))
    }

    pub fn index(&self) -> &[u32] {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Vec<u32> {
        &mut self.index
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn fwd_weights(&self) -> &[SegmentWeight] {
        &self.fwd_weights
    }

    pub fn rev_weights(&self) -> &[SegmentWeight] {
        &self.rev_weights
    }

    pub fn fwd_durations(&self) -> &[SegmentDuration] {
        &self.fwd_durations
    }

    pub fn rev_durations(&self) -> &[SegmentDuration] {
        &self.rev_durations
    }

    pub fn datasources(&self) -> &[DatasourceId] {
        &self.datasources
    }

    /// Mutable slices of the per-segment columns, in on-disk order.
    ///
    /// Slices cannot change length, so the co-length invariant survives.
    #[allow(clippy::type_complexity)]
    pub fn columns_mut(
        &mut self,
    ) -> (
        &mut [NodeId],
        &mut [SegmentWeight],
        &mut [SegmentWeight],
        &mut [SegmentDuration],
        &mut [SegmentDuration],
        &mut [DatasourceId],
    ) {
        (
            &mut self.nodes,
            &mut self.fwd_weights,
            &mut self.rev_weights,
            &mut self.fwd_durations,
            &mut self.rev_durations,
            &mut self.datasources,
        )
    }

    /// Resizes every per-segment column to `len`, filling with defaults.
    pub fn resize(&mut self, len: usize) {
        self.nodes.resize(len, NodeId::default());
        self.fwd_weights.resize(len, 0);
        self.rev_weights.resize(len, 0);
        self.fwd_durations.resize(len, 0);
        self.rev_durations.resize(len, 0);
        self.datasources.resize(len, 0);
    }
}
