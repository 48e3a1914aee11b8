//! On-disk container format for intermediate graph-extraction artifacts.
//!
//! Four file kinds are supported, each with a `read_*`/`write_*` pair:
//!
//! | Kind | Header | Body |
//! |---|---|---|
//! | node mapping | fingerprint | `u32` count + `NodeMapping` records |
//! | datasources | none | fixed-size name blob |
//! | segment data | none | index array, `u32` N, six columns of N values |
//! | turn restrictions | fingerprint | `u64` count + variable-length records |
//!
//! All values are stored in native byte order.

mod datasources;
mod fingerprint;
mod fixed;
mod node_mapping;
mod reader;
mod restrictions;
mod segment_data;
mod stage;
mod writer;

pub use datasources::{read_datasources, write_datasources};
pub use fingerprint::{
    Fingerprint, FingerprintPolicy, FINGERPRINT_SIZE, FORMAT_VERSION_MAJOR, FORMAT_VERSION_MINOR,
    FORMAT_VERSION_PATCH,
};
pub use fixed::FixedSize;
pub use node_mapping::{read_node_mappings, write_node_mappings};
pub use reader::FileReader;
pub use restrictions::{
    peek_restriction_count, read_restriction, read_turn_restrictions, write_restriction,
    write_turn_restrictions, RestrictionStreamWriter,
};
pub use segment_data::{read_segment_data, write_segment_data};
pub use stage::Stage;
pub use writer::{CountSlot, FileWriter};

/// The artifact kinds this crate knows how to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    NodeMapping,
    Datasources,
    SegmentData,
    TurnRestrictions,
}

impl FileKind {
    /// Whether files of this kind start with a format fingerprint.
    pub fn has_fingerprint(self) -> bool {
        match self {
            Self::NodeMapping | Self::TurnRestrictions => true,
            Self::Datasources | Self::SegmentData => false,
        }
    }

    /// Policy for opening an existing file of this kind.
    pub fn read_policy(self) -> FingerprintPolicy {
        if self.has_fingerprint() {
            FingerprintPolicy::Verify
        } else {
            FingerprintPolicy::Skip
        }
    }

    /// Policy for creating a new file of this kind.
    pub fn write_policy(self) -> FingerprintPolicy {
        if self.has_fingerprint() {
            FingerprintPolicy::Generate
        } else {
            FingerprintPolicy::Skip
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NodeMapping => "node-mapping",
            Self::Datasources => "datasources",
            Self::SegmentData => "segment-data",
            Self::TurnRestrictions => "turn-restrictions",
        }
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node-mapping" => Ok(Self::NodeMapping),
            "datasources" => Ok(Self::Datasources),
            "segment-data" => Ok(Self::SegmentData),
            "turn-restrictions" => Ok(Self::TurnRestrictions),
            other => Err(format!(
                "unknown file kind {other:?} (expected node-mapping, datasources, segment-data or turn-restrictions)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse_back() {
        for kind in [
            FileKind::NodeMapping,
            FileKind::Datasources,
            FileKind::SegmentData,
            FileKind::TurnRestrictions,
        ] {
            assert_eq!(kind.name().parse::<FileKind>().unwrap(), kind);
        }
        assert!("restrictions".parse::<FileKind>().is_err());
    }

    #[test]
    fn only_mapping_and_restrictions_are_fingerprinted() {
        assert_eq!(FileKind::NodeMapping.write_policy(), FingerprintPolicy::Generate);
        assert_eq!(FileKind::TurnRestrictions.read_policy(), FingerprintPolicy::Verify);
        assert_eq!(FileKind::SegmentData.read_policy(), FingerprintPolicy::Skip);
        assert_eq!(FileKind::Datasources.write_policy(), FingerprintPolicy::Skip);
    }
}
