use serde::Serialize;
use waystage_core::{NodeMapping, SegmentEntry, TurnRestriction};

#[derive(Serialize)]
pub(crate) struct ValidateJson<'a> {
    pub(crate) ok: bool,
    pub(crate) path: &'a str,
    pub(crate) kind: &'static str,
    pub(crate) error: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct InspectJson<'a> {
    pub(crate) path: &'a str,
    pub(crate) kind: &'static str,
    pub(crate) file_length_bytes: u64,
    /// `major.minor.patch` of the fingerprint, for fingerprinted kinds.
    pub(crate) format_version: Option<String>,
    #[serde(flatten)]
    pub(crate) summary: SummaryJson<'a>,
}

#[derive(Serialize)]
#[serde(tag = "contents", rename_all = "snake_case")]
pub(crate) enum SummaryJson<'a> {
    NodeMapping {
        count: usize,
        first: &'a [NodeMapping],
    },
    Datasources {
        named: Vec<DatasourceJson>,
    },
    SegmentData {
        index_count: usize,
        segment_count: usize,
        first: Vec<SegmentEntry>,
    },
    TurnRestrictions {
        count: usize,
        only_count: usize,
        conditional_count: usize,
        first: &'a [TurnRestriction],
    },
}

#[derive(Serialize)]
pub(crate) struct DatasourceJson {
    pub(crate) id: u8,
    pub(crate) name: String,
}
