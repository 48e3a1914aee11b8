use log::{debug, warn};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use waystage_core::error::{Error, FormatError};

use crate::fingerprint::{self, Fingerprint, FingerprintPolicy};
use crate::fixed::FixedSize;
use crate::stage::Stage;

/// Sequential reader over a memory-mapped file.
///
/// Every read is checked against the bytes left in the file, so a count
/// taken from the file never drives an allocation larger than the file
/// itself could back.
#[derive(Debug)]
pub struct FileReader {
    path: PathBuf,
    // Zero-length files are not mapped.
    mmap: Option<Mmap>,
    pos: usize,
    fingerprint: Option<Fingerprint>,
}

impl FileReader {
    pub fn open(path: impl AsRef<Path>, policy: FingerprintPolicy) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let len = file.metadata()?.len();
        let mmap = if len == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file)? })
        };

        let mut reader = Self {
            path,
            mmap,
            pos: 0,
            fingerprint: None,
        };
        if policy.carries_token() {
            reader.fingerprint = Some(fingerprint::verify(&mut reader)?);
        }
        debug!(
            "opened {} ({len} bytes, fingerprint {:?})",
            reader.path.display(),
            policy
        );
        Ok(reader)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The verified token, if the file was opened with one.
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    pub fn len(&self) -> u64 {
        self.bytes().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes().len() - self.pos
    }

    fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    fn truncated(&self, stage: Stage, needed: u64) -> Error {
        FormatError::Truncated {
            path: self.path.clone(),
            stage: stage.to_string(),
            at: self.position(),
            needed,
            available: self.remaining() as u64,
        }
        .into()
    }

    /// Up to `n` bytes at the current position, without consuming them.
    pub(crate) fn peek(&self, n: usize) -> &[u8] {
        let end = self.pos.saturating_add(n).min(self.bytes().len());
        &self.bytes()[self.pos..end]
    }

    pub(crate) fn invalid(&self, stage: Stage, field: &'static str, reason: String) -> Error {
        FormatError::InvalidValue {
            path: self.path.clone(),
            stage: stage.to_string(),
            field,
            reason,
        }
        .into()
    }

    /// Fails unless `count` elements of at least `min_size` bytes each could
    /// still follow. Used before allocating for a count read from the file.
    pub fn ensure_available(&self, count: u64, min_size: usize, stage: Stage) -> Result<(), Error> {
        let needed = count.saturating_mul(min_size as u64);
        if needed > self.remaining() as u64 {
            return Err(self.truncated(stage, needed));
        }
        Ok(())
    }

    fn take(&mut self, n: usize, stage: Stage) -> Result<&[u8], Error> {
        if n > self.remaining() {
            return Err(self.truncated(stage, n as u64));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.bytes()[start..start + n])
    }

    pub fn read_array<const N: usize>(&mut self, stage: Stage) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, stage)?);
        Ok(out)
    }

    pub fn read_one<T: FixedSize>(&mut self, stage: Stage) -> Result<T, Error> {
        Ok(T::decode(self.take(T::SIZE, stage)?))
    }

    pub fn read_u8(&mut self, stage: Stage) -> Result<u8, Error> {
        self.read_one(stage)
    }

    /// Booleans are one byte and must be exactly 0 or 1.
    pub fn read_bool(&mut self, stage: Stage) -> Result<bool, Error> {
        match self.read_u8(stage)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.invalid(stage, "bool", format!("expected 0 or 1, got {other}"))),
        }
    }

    pub fn read_element_count32(&mut self, stage: Stage) -> Result<u32, Error> {
        self.read_one(stage)
    }

    pub fn read_element_count64(&mut self, stage: Stage) -> Result<u64, Error> {
        self.read_one(stage)
    }

    /// Fills `out` with `out.len()` contiguous elements.
    pub fn read_into<T: FixedSize>(&mut self, out: &mut [T], stage: Stage) -> Result<(), Error> {
        let needed = out
            .len()
            .checked_mul(T::SIZE)
            .ok_or_else(|| self.truncated(stage, u64::MAX))?;
        let bytes = self.take(needed, stage)?;
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(T::SIZE)) {
            *slot = T::decode(chunk);
        }
        Ok(())
    }

    /// Reads `count` contiguous elements. The count is checked against the
    /// remaining bytes before anything is allocated.
    pub fn read_vec<T: FixedSize>(&mut self, count: u64, stage: Stage) -> Result<Vec<T>, Error> {
        self.ensure_available(count, T::SIZE, stage)?;
        // `ensure_available` bounds `count` by the mapped length.
        let count = count as usize;
        let bytes = self.take(count * T::SIZE, stage)?;
        Ok(bytes.chunks_exact(T::SIZE).map(T::decode).collect())
    }

    /// Array Format: `u32` element count, then the elements.
    pub fn deserialize_vector<T: FixedSize>(&mut self, stage: Stage) -> Result<Vec<T>, Error> {
        let count = self.read_element_count32(stage)?;
        self.read_vec(u64::from(count), stage)
    }

    /// Fills `out` with raw bytes, without any count framing.
    pub fn read_blob(&mut self, out: &mut [u8], stage: Stage) -> Result<(), Error> {
        out.copy_from_slice(self.take(out.len(), stage)?);
        Ok(())
    }

    /// Ends a read-all call. Trailing bytes are allowed and left unread.
    pub fn finish(self) {
        let trailing = self.remaining();
        if trailing > 0 {
            warn!(
                "{}: {trailing} trailing bytes after declared contents",
                self.path.display()
            );
        }
    }
}
