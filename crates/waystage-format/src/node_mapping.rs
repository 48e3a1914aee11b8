use log::debug;
use std::path::Path;
use waystage_core::error::Error;
use waystage_core::NodeMapping;

use crate::fingerprint::FingerprintPolicy;
use crate::reader::FileReader;
use crate::stage::Stage;
use crate::writer::FileWriter;

const STAGE: Stage = Stage::Field("node_mappings");

pub fn read_node_mappings(path: impl AsRef<Path>) -> Result<Vec<NodeMapping>, Error> {
    let mut reader = FileReader::open(path, FingerprintPolicy::Verify)?;
    let mappings = reader.deserialize_vector(STAGE)?;
    debug!("read {} node mappings", mappings.len());
    reader.finish();
    Ok(mappings)
}

pub fn write_node_mappings(path: impl AsRef<Path>, mappings: &[NodeMapping]) -> Result<(), Error> {
    let mut writer = FileWriter::create(path, FingerprintPolicy::Generate)?;
    writer.serialize_vector(mappings, STAGE)?;
    writer.finish()?;
    Ok(())
}
