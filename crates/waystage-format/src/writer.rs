use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use waystage_core::error::{Error, InvariantViolation};

use crate::fingerprint::{Fingerprint, FingerprintPolicy};
use crate::fixed::FixedSize;
use crate::stage::Stage;

// Elements encoded per batch by `write_from`.
const BATCH: usize = 4096;

/// Position of a count written as a placeholder, to be filled in later by
/// [`FileWriter::patch_element_count64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSlot {
    offset: u64,
}

/// Buffered sequential writer.
///
/// Bytes go to a sibling temporary file which replaces the destination only
/// when [`FileWriter::finish`] succeeds. Dropping an unfinished writer
/// removes the temporary file and leaves the destination untouched.
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    out: Option<BufWriter<File>>,
    written: u64,
    scratch: Vec<u8>,
}

impl FileWriter {
    pub fn create(path: impl AsRef<Path>, policy: FingerprintPolicy) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let (tmp_path, file) = create_temp_sibling(&path)?;
        let mut writer = Self {
            path,
            tmp_path,
            out: Some(BufWriter::new(file)),
            written: 0,
            scratch: Vec::new(),
        };
        if policy.carries_token() {
            writer.write_raw(&Fingerprint::current().to_bytes())?;
        }
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far, including the fingerprint.
    pub fn position(&self) -> u64 {
        self.written
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| std::io::Error::other("writer already finished"))?;
        out.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn write_one<T: FixedSize>(&mut self, value: &T) -> Result<(), Error> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        scratch.resize(T::SIZE, 0);
        value.encode(&mut scratch);
        let res = self.write_raw(&scratch);
        self.scratch = scratch;
        res
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_raw(&[u8::from(value)])
    }

    /// Writes `len` as a `u32` count. Lengths that do not fit are a producer
    /// bug and nothing is written for them.
    pub fn write_element_count32(&mut self, len: usize, stage: Stage) -> Result<(), Error> {
        let count = u32::try_from(len).map_err(|_| InvariantViolation::CountOverflow {
            stage: stage.to_string(),
            count: len,
            max: u64::from(u32::MAX),
        })?;
        self.write_one(&count)
    }

    pub fn write_element_count64(&mut self, len: usize) -> Result<(), Error> {
        self.write_one(&(len as u64))
    }

    /// Writes the elements contiguously, without a count.
    pub fn write_from<T: FixedSize>(&mut self, values: &[T]) -> Result<(), Error> {
        let mut scratch = std::mem::take(&mut self.scratch);
        let mut res = Ok(());
        for batch in values.chunks(BATCH) {
            scratch.clear();
            scratch.resize(batch.len() * T::SIZE, 0);
            for (value, chunk) in batch.iter().zip(scratch.chunks_exact_mut(T::SIZE)) {
                value.encode(chunk);
            }
            res = self.write_raw(&scratch);
            if res.is_err() {
                break;
            }
        }
        self.scratch = scratch;
        res
    }

    /// Array Format: `u32` element count, then the elements.
    pub fn serialize_vector<T: FixedSize>(&mut self, values: &[T], stage: Stage) -> Result<(), Error> {
        self.write_element_count32(values.len(), stage)?;
        self.write_from(values)
    }

    /// Raw bytes, without any count framing.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write_raw(bytes)
    }

    /// Writes a zero `u64` count to be patched once the real count is known.
    pub fn reserve_element_count64(&mut self) -> Result<CountSlot, Error> {
        let slot = CountSlot {
            offset: self.written,
        };
        self.write_one(&0u64)?;
        Ok(slot)
    }

    pub fn patch_element_count64(&mut self, slot: CountSlot, count: u64) -> Result<(), Error> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| std::io::Error::other("writer already finished"))?;
        out.seek(SeekFrom::Start(slot.offset))?;
        out.write_all(&count.to_ne_bytes())?;
        out.seek(SeekFrom::End(0))?;
        Ok(())
    }

    /// Flushes, syncs and moves the file into place. Returns the file length.
    pub fn finish(mut self) -> Result<u64, Error> {
        let out = self
            .out
            .take()
            .ok_or_else(|| std::io::Error::other("writer already finished"))?;
        let moved = out
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|file| file.sync_all())
            .and_then(|()| std::fs::rename(&self.tmp_path, &self.path));
        if let Err(e) = moved {
            let _ = std::fs::remove_file(&self.tmp_path);
            return Err(e.into());
        }
        debug!("wrote {} ({} bytes)", self.path.display(), self.written);
        Ok(self.written)
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if let Some(out) = self.out.take() {
            drop(out);
            let _ = std::fs::remove_file(&self.tmp_path);
        }
    }
}

fn create_temp_sibling(path: &Path) -> Result<(PathBuf, File), Error> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("waystage");

    let mut i = 0u32;
    loop {
        let tmp_name = if i == 0 {
            format!("{base}.tmp")
        } else {
            format!("{base}.tmp.{i}")
        };
        let tmp_path = dir.join(tmp_name);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(f) => return Ok((tmp_path, f)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                i = i.saturating_add(1);
            }
            Err(e) => return Err(e.into()),
        }
    }
}
