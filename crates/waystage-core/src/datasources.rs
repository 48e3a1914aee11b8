use std::borrow::Cow;

use crate::error::InvariantViolation;
use crate::types::DatasourceId;

pub const MAX_DATASOURCES: usize = 255;
pub const MAX_DATASOURCE_NAME_LENGTH: usize = 255;

const LENGTHS_BYTES: usize = MAX_DATASOURCES * 8;
const NAMES_BYTES: usize = MAX_DATASOURCES * MAX_DATASOURCE_NAME_LENGTH;

/// Names of the data sources a segment's weights can come from.
///
/// Slot 0 is the routing profile itself; further slots are filled by
/// traffic/speed updates. On disk this is a fixed-size blob of
/// [`Datasources::BLOB_SIZE`] bytes: one native-endian `u64` length per slot,
/// followed by every slot's name padded to [`MAX_DATASOURCE_NAME_LENGTH`].
#[derive(Clone, PartialEq, Eq)]
pub struct Datasources {
    lengths: Vec<u64>,
    names: Vec<u8>,
}

impl std::fmt::Debug for Datasources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.named()).finish()
    }
}

impl Default for Datasources {
    fn default() -> Self {
        let mut sources = Self::empty();
        let profile = b"lua profile";
        sources.names[..profile.len()].copy_from_slice(profile);
        sources.lengths[0] = profile.len() as u64;
        sources
    }
}

impl Datasources {
    pub const BLOB_SIZE: usize = LENGTHS_BYTES + NAMES_BYTES;

    /// All slots unnamed.
    pub fn empty() -> Self {
        Self {
            lengths: vec![0; MAX_DATASOURCES],
            names: vec![0; NAMES_BYTES],
        }
    }

    pub fn name(&self, id: DatasourceId) -> Cow<'_, str> {
        self.name_at(usize::from(id))
    }

    fn name_at(&self, slot: usize) -> Cow<'_, str> {
        let Some(&len) = self.lengths.get(slot) else {
            return Cow::Borrowed("");
        };
        let start = slot * MAX_DATASOURCE_NAME_LENGTH;
        let len = usize::try_from(len)
            .unwrap_or(MAX_DATASOURCE_NAME_LENGTH)
            .min(MAX_DATASOURCE_NAME_LENGTH);
        String::from_utf8_lossy(&self.names[start..start + len])
    }

    pub fn set_name(&mut self, id: DatasourceId, name: &str) -> Result<(), InvariantViolation> {
        let slot = usize::from(id);
        if slot >= MAX_DATASOURCES {
            return Err(InvariantViolation::DatasourceOutOfRange {
                id: slot,
                max: MAX_DATASOURCES - 1,
            });
        }
        let bytes = name.as_bytes();
        if bytes.len() > MAX_DATASOURCE_NAME_LENGTH {
            return Err(InvariantViolation::NameTooLong {
                id,
                len: bytes.len(),
                max: MAX_DATASOURCE_NAME_LENGTH,
            });
        }
        let start = slot * MAX_DATASOURCE_NAME_LENGTH;
        let cell = &mut self.names[start..start + MAX_DATASOURCE_NAME_LENGTH];
        cell.fill(0);
        cell[..bytes.len()].copy_from_slice(bytes);
        self.lengths[slot] = bytes.len() as u64;
        Ok(())
    }

    /// Slots with a non-empty name, in id order.
    pub fn named(&self) -> impl Iterator<Item = (DatasourceId, Cow<'_, str>)> + '_ {
        (0..MAX_DATASOURCES)
            .filter(|&slot| self.lengths[slot] > 0)
            .filter_map(|slot| Some((DatasourceId::try_from(slot).ok()?, self.name_at(slot))))
    }

    /// Number of slots with a non-empty name.
    pub fn named_count(&self) -> usize {
        self.lengths.iter().filter(|&&len| len > 0).count()
    }

    /// Writes the blob representation into `out`, which must be exactly
    /// [`Self::BLOB_SIZE`] bytes long.
    pub fn encode_blob(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), Self::BLOB_SIZE);
        let (lengths, names) = out.split_at_mut(LENGTHS_BYTES);
        for (chunk, len) in lengths.chunks_exact_mut(8).zip(&self.lengths) {
            chunk.copy_from_slice(&len.to_ne_bytes());
        }
        names.copy_from_slice(&self.names);
    }

    /// Parses a blob produced by [`Self::encode_blob`].
    ///
    /// Returns a reason string when a slot length exceeds the name capacity.
    pub fn decode_blob(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != Self::BLOB_SIZE {
            return Err("blob size does not match datasource layout");
        }
        let (length_bytes, names) = bytes.split_at(LENGTHS_BYTES);
        let mut lengths = Vec::with_capacity(MAX_DATASOURCES);
        for chunk in length_bytes.chunks_exact(8) {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            let len = u64::from_ne_bytes(raw);
            if len > MAX_DATASOURCE_NAME_LENGTH as u64 {
                return Err("datasource name length exceeds slot capacity");
            }
            lengths.push(len);
        }
        Ok(Self {
            lengths,
            names: names.to_vec(),
        })
    }
}
