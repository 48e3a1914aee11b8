use log::debug;
use std::path::Path;
use waystage_core::error::Error;
use waystage_core::Datasources;

use crate::fingerprint::FingerprintPolicy;
use crate::reader::FileReader;
use crate::stage::Stage;
use crate::writer::FileWriter;

const STAGE: Stage = Stage::Field("datasources");

/// Reads the datasource name blob. The file has no fingerprint and no count.
pub fn read_datasources(path: impl AsRef<Path>) -> Result<Datasources, Error> {
    let mut reader = FileReader::open(path, FingerprintPolicy::Skip)?;
    let mut blob = vec![0u8; Datasources::BLOB_SIZE];
    reader.read_blob(&mut blob, STAGE)?;
    let sources = Datasources::decode_blob(&blob)
        .map_err(|reason| reader.invalid(STAGE, "Datasources", reason.to_string()))?;
    debug!("read {} named datasources", sources.named_count());
    reader.finish();
    Ok(sources)
}

pub fn write_datasources(path: impl AsRef<Path>, sources: &Datasources) -> Result<(), Error> {
    let mut writer = FileWriter::create(path, FingerprintPolicy::Skip)?;
    let mut blob = vec![0u8; Datasources::BLOB_SIZE];
    sources.encode_blob(&mut blob);
    writer.write_blob(&blob)?;
    writer.finish()?;
    Ok(())
}
