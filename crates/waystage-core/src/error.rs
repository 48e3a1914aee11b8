use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl Error {
    /// True when the file carried no fingerprint or a foreign/stale one.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::Format(FormatError::FingerprintMismatch { .. }))
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Format(FormatError::Truncated { .. }))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

/// Problems with the bytes of a file being read.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{}: fingerprint mismatch: {reason}", path.display())]
    FingerprintMismatch { path: PathBuf, reason: String },

    #[error(
        "{}: truncated input at byte {at} while reading {stage}, need {needed} bytes, {available} available",
        path.display()
    )]
    Truncated {
        path: PathBuf,
        stage: String,
        at: u64,
        needed: u64,
        available: u64,
    },

    #[error("{}: invalid value for {field} in {stage}: {reason}", path.display())]
    InvalidValue {
        path: PathBuf,
        stage: String,
        field: &'static str,
        reason: String,
    },
}

/// Logic errors in the producer. These are never caused by file contents.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("segment column {column} has {actual} entries, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("element count {count} for {stage} exceeds {max}")]
    CountOverflow {
        stage: String,
        count: usize,
        max: u64,
    },

    #[error("datasource name for id {id} is {len} bytes, max {max}")]
    NameTooLong { id: u8, len: usize, max: usize },

    #[error("datasource id {id} out of range (max {max})")]
    DatasourceOutOfRange { id: usize, max: usize },
}
