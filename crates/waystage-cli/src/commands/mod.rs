//! Subcommands of the `waystage` tool.

pub(crate) mod inspect;
pub(crate) mod validate;

use anyhow::Context;
use waystage_core::{Datasources, NodeMapping, SegmentData, TurnRestriction};
use waystage_format::FileKind;

/// A fully decoded artifact file.
pub(crate) enum Artifact {
    NodeMapping(Vec<NodeMapping>),
    Datasources(Datasources),
    SegmentData(SegmentData),
    TurnRestrictions(Vec<TurnRestriction>),
}

pub(crate) fn load(kind: FileKind, path: &str) -> Result<Artifact, waystage_core::error::Error> {
    Ok(match kind {
        FileKind::NodeMapping => Artifact::NodeMapping(waystage_format::read_node_mappings(path)?),
        FileKind::Datasources => Artifact::Datasources(waystage_format::read_datasources(path)?),
        FileKind::SegmentData => Artifact::SegmentData(waystage_format::read_segment_data(path)?),
        FileKind::TurnRestrictions => {
            Artifact::TurnRestrictions(waystage_format::read_turn_restrictions(path)?)
        }
    })
}

pub(crate) fn load_with_context(kind: FileKind, path: &str) -> anyhow::Result<Artifact> {
    load(kind, path).with_context(|| format!("read {} file {path}", kind.name()))
}
