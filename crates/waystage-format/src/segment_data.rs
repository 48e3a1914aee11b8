use log::debug;
use std::path::Path;
use waystage_core::error::Error;
use waystage_core::SegmentData;

use crate::fingerprint::FingerprintPolicy;
use crate::fixed::FixedSize;
use crate::reader::FileReader;
use crate::stage::Stage;
use crate::writer::FileWriter;
use waystage_core::{DatasourceId, NodeId, SegmentDuration, SegmentWeight};

// Bytes one segment occupies across the six columns.
const SEGMENT_ROW_SIZE: usize = NodeId::SIZE
    + 2 * SegmentWeight::SIZE
    + 2 * SegmentDuration::SIZE
    + DatasourceId::SIZE;

/// Reads segment data: the index array, then one shared count followed by
/// the six per-segment columns in their fixed order.
pub fn read_segment_data(path: impl AsRef<Path>) -> Result<SegmentData, Error> {
    let mut reader = FileReader::open(path, FingerprintPolicy::Skip)?;

    let index = reader.deserialize_vector(Stage::Field("segment_data.index"))?;

    let count_stage = Stage::Field("segment_data.count");
    let count = reader.read_element_count32(count_stage)?;
    reader.ensure_available(u64::from(count), SEGMENT_ROW_SIZE, count_stage)?;

    let count = count as usize;
    let mut data = SegmentData::with_capacity(index, count);
    data.resize(count);
    {
        let (nodes, fwd_weights, rev_weights, fwd_durations, rev_durations, datasources) =
            data.columns_mut();
        reader.read_into(nodes, Stage::Field("segment_data.nodes"))?;
        reader.read_into(fwd_weights, Stage::Field("segment_data.fwd_weights"))?;
        reader.read_into(rev_weights, Stage::Field("segment_data.rev_weights"))?;
        reader.read_into(fwd_durations, Stage::Field("segment_data.fwd_durations"))?;
        reader.read_into(rev_durations, Stage::Field("segment_data.rev_durations"))?;
        reader.read_into(datasources, Stage::Field("segment_data.datasources"))?;
    }

    debug!(
        "read segment data: {} index entries, {} segments",
        data.index().len(),
        data.len()
    );
    reader.finish();
    Ok(data)
}

/// Writes segment data. Column order on disk is part of the format.
pub fn write_segment_data(path: impl AsRef<Path>, data: &SegmentData) -> Result<(), Error> {
    let mut writer = FileWriter::create(path, FingerprintPolicy::Skip)?;

    writer.serialize_vector(data.index(), Stage::Field("segment_data.index"))?;
    writer.write_element_count32(data.len(), Stage::Field("segment_data.count"))?;
    writer.write_from(data.nodes())?;
    writer.write_from(data.fwd_weights())?;
    writer.write_from(data.rev_weights())?;
    writer.write_from(data.fwd_durations())?;
    writer.write_from(data.rev_durations())?;
    writer.write_from(data.datasources())?;

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waystage_core::SegmentEntry;

    fn sample() -> SegmentData {
        let mut data = SegmentData::new(vec![0, 2, 3]);
        for i in 0..3u32 {
            data.push(SegmentEntry {
                node: NodeId(100 + i),
                fwd_weight: i,
                rev_weight: 10 + i,
                fwd_duration: 20 + i,
                rev_duration: 30 + i,
                datasource: i as u8,
            });
        }
        data
    }

    #[test]
    fn columns_are_laid_out_back_to_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.geometry");
        write_segment_data(&path, &sample()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // index count + 3 index values + segment count + 3 rows
        assert_eq!(bytes.len(), 4 + 12 + 4 + 3 * SEGMENT_ROW_SIZE);
        assert_eq!(&bytes[16..20], &3u32.to_ne_bytes());
        // nodes column starts right after the count
        assert_eq!(&bytes[20..24], &100u32.to_ne_bytes());
        // fwd_weights column follows all three nodes
        assert_eq!(&bytes[32..36], &0u32.to_ne_bytes());
        assert_eq!(&bytes[36..40], &1u32.to_ne_bytes());
        // datasources are the last three bytes
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 1, 2]);
    }

    #[test]
    fn roundtrip_preserves_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.geometry");
        let data = sample();
        write_segment_data(&path, &data).unwrap();
        assert_eq!(read_segment_data(&path).unwrap(), data);
    }

    #[test]
    fn declared_count_beyond_file_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.geometry");
        let mut raw = 0u32.to_ne_bytes().to_vec();
        raw.extend_from_slice(&1_000_000u32.to_ne_bytes());
        raw.extend_from_slice(&[0u8; 21]);
        std::fs::write(&path, raw).unwrap();

        let err = read_segment_data(&path).unwrap_err();
        assert!(err.is_truncated());
        assert!(err.to_string().contains("segment_data.count"), "{err}");
    }
}
