//! Core data structures and errors for waystage artifacts.
//!
//! This crate defines the in-memory shapes exchanged between graph-extraction
//! stages (node mappings, segment data, datasource names and conditional turn
//! restrictions) together with the error types shared by the on-disk format.

pub mod datasources;
pub mod error;
pub mod restriction;
pub mod segment;
pub mod types;

pub use datasources::Datasources;
pub use restriction::{Condition, Modifier, MonthDay, TimeSpan, TurnRestriction, Weekday};
pub use segment::{SegmentColumns, SegmentData, SegmentEntry};
pub use types::{
    DatasourceId, EdgeBasedNodeId, EdgeId, NodeId, NodeMapping, SegmentDuration, SegmentWeight,
};
