//! Conditional turn restrictions.
//!
//! After the fingerprint the file holds a `u64` restriction count followed by
//! that many records:
//!
//! ```text
//! via: u32, from: u32, to: u32, is_only: u8,
//! condition count: u64,
//! per condition: modifier: u8, times[], weekdays[], monthdays[]
//! ```
//!
//! where each `[]` is a `u32` count followed by fixed-size elements. Record
//! length is only known once a record has been decoded.

use log::debug;
use std::path::Path;
use waystage_core::error::Error;
use waystage_core::{Condition, EdgeId, Modifier, NodeId, TurnRestriction};

use crate::fingerprint::FingerprintPolicy;
use crate::reader::FileReader;
use crate::stage::Stage;
use crate::writer::{CountSlot, FileWriter};

const COUNT_STAGE: Stage = Stage::Field("restrictions.count");

// Smallest possible encodings, used to bound counts read from the file.
const MIN_RESTRICTION_SIZE: usize = 4 + 4 + 4 + 1 + 8;
const MIN_CONDITION_SIZE: usize = 1 + 3 * 4;

/// Appends one restriction record to an open writer.
pub fn write_restriction(writer: &mut FileWriter, restriction: &TurnRestriction) -> Result<(), Error> {
    writer.write_one(&restriction.via)?;
    writer.write_one(&restriction.from)?;
    writer.write_one(&restriction.to)?;
    writer.write_bool(restriction.is_only)?;
    writer.write_element_count64(restriction.conditions.len())?;
    for c in &restriction.conditions {
        writer.write_one(&c.modifier.as_u8())?;
        writer.serialize_vector(&c.times, Stage::Field("condition.times"))?;
        writer.serialize_vector(&c.weekdays, Stage::Field("condition.weekdays"))?;
        writer.serialize_vector(&c.monthdays, Stage::Field("condition.monthdays"))?;
    }
    Ok(())
}

/// Decodes the record at the reader's position. `index` is only used to
/// label errors.
pub fn read_restriction(reader: &mut FileReader, index: u64) -> Result<TurnRestriction, Error> {
    let at = |field| Stage::Restriction { index, field };

    let via: NodeId = reader.read_one(at("via"))?;
    let from: EdgeId = reader.read_one(at("from"))?;
    let to: EdgeId = reader.read_one(at("to"))?;
    let is_only = reader.read_bool(at("is_only"))?;

    let num_conditions = reader.read_element_count64(at("condition count"))?;
    reader.ensure_available(num_conditions, MIN_CONDITION_SIZE, at("conditions"))?;
    let mut conditions = Vec::with_capacity(num_conditions as usize);
    for condition in 0..num_conditions {
        conditions.push(read_condition(reader, index, condition)?);
    }

    Ok(TurnRestriction {
        via,
        from,
        to,
        is_only,
        conditions,
    })
}

fn read_condition(reader: &mut FileReader, restriction: u64, condition: u64) -> Result<Condition, Error> {
    let at = |field| Stage::Condition {
        restriction,
        condition,
        field,
    };

    let tag = reader.read_u8(at("modifier"))?;
    let modifier = Modifier::from_u8(tag).ok_or_else(|| {
        reader.invalid(at("modifier"), "Condition.modifier", format!("unknown modifier {tag}"))
    })?;
    let times = reader.deserialize_vector(at("times"))?;
    let weekdays = reader.deserialize_vector(at("weekdays"))?;
    let monthdays = reader.deserialize_vector(at("monthdays"))?;

    Ok(Condition {
        modifier,
        times,
        weekdays,
        monthdays,
    })
}

pub fn write_turn_restrictions(
    path: impl AsRef<Path>,
    restrictions: &[TurnRestriction],
) -> Result<(), Error> {
    let mut writer = FileWriter::create(path, FingerprintPolicy::Generate)?;
    writer.write_element_count64(restrictions.len())?;
    for r in restrictions {
        write_restriction(&mut writer, r)?;
    }
    writer.finish()?;
    Ok(())
}

/// Reads every restriction, in file order. Fails if fewer complete records
/// are present than the header declares; bytes after the last declared
/// record are ignored.
pub fn read_turn_restrictions(path: impl AsRef<Path>) -> Result<Vec<TurnRestriction>, Error> {
    let mut reader = FileReader::open(path, FingerprintPolicy::Verify)?;
    let count = reader.read_element_count64(COUNT_STAGE)?;
    reader.ensure_available(count, MIN_RESTRICTION_SIZE, COUNT_STAGE)?;

    let mut restrictions = Vec::with_capacity(count as usize);
    for index in 0..count {
        restrictions.push(read_restriction(&mut reader, index)?);
    }

    debug!("read {} turn restrictions", restrictions.len());
    reader.finish();
    Ok(restrictions)
}

/// Verifies the fingerprint and returns the declared restriction count
/// without decoding any record.
pub fn peek_restriction_count(path: impl AsRef<Path>) -> Result<u64, Error> {
    let mut reader = FileReader::open(path, FingerprintPolicy::Verify)?;
    reader.read_element_count64(COUNT_STAGE)
}

/// Writes restrictions one at a time as a producer emits them.
///
/// The count is reserved up front and filled in by [`Self::finish`]; the
/// result is byte-identical to [`write_turn_restrictions`]. Dropping the
/// stream without finishing discards everything written.
#[derive(Debug)]
pub struct RestrictionStreamWriter {
    writer: FileWriter,
    slot: CountSlot,
    count: u64,
}

impl RestrictionStreamWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let mut writer = FileWriter::create(path, FingerprintPolicy::Generate)?;
        let slot = writer.reserve_element_count64()?;
        Ok(Self {
            writer,
            slot,
            count: 0,
        })
    }

    pub fn push(&mut self, restriction: &TurnRestriction) -> Result<(), Error> {
        write_restriction(&mut self.writer, restriction)?;
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Patches the count and moves the file into place. Returns the number
    /// of restrictions written.
    pub fn finish(mut self) -> Result<u64, Error> {
        self.writer.patch_element_count64(self.slot, self.count)?;
        self.writer.finish()?;
        Ok(self.count)
    }
}
