use waystage_core::error::{Error, FormatError};

use crate::reader::FileReader;
use crate::stage::Stage;

pub const FORMAT_VERSION_MAJOR: u8 = 1;
pub const FORMAT_VERSION_MINOR: u8 = 0;
pub const FORMAT_VERSION_PATCH: u8 = 0;

pub const FINGERPRINT_SIZE: usize = 11;

const MAGIC: [u8; 4] = *b"WSTG";
const CHECKED_LEN: usize = 7;

/// How a file's leading format fingerprint is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintPolicy {
    /// Writers embed a fresh token. Readers treat this like `Verify`.
    Generate,
    /// The file carries a token and readers reject it unless it matches.
    /// Writers treat this like `Generate`.
    Verify,
    /// No token; the body starts at byte 0.
    Skip,
}

impl FingerprintPolicy {
    pub fn carries_token(self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// The identity token at the start of fingerprinted files: magic, format
/// version, and a native-endian CRC-32 over those seven bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    magic: [u8; 4],
    major: u8,
    minor: u8,
    patch: u8,
    checksum: u32,
}

impl Fingerprint {
    /// The token for the format version this crate writes.
    pub fn current() -> Self {
        Self::with_version(
            FORMAT_VERSION_MAJOR,
            FORMAT_VERSION_MINOR,
            FORMAT_VERSION_PATCH,
        )
    }

    pub fn with_version(major: u8, minor: u8, patch: u8) -> Self {
        let mut fp = Self {
            magic: MAGIC,
            major,
            minor,
            patch,
            checksum: 0,
        };
        fp.checksum = fp.expected_checksum();
        fp
    }

    pub fn to_bytes(&self) -> [u8; FINGERPRINT_SIZE] {
        let mut out = [0u8; FINGERPRINT_SIZE];
        out[..CHECKED_LEN].copy_from_slice(&self.checked_bytes());
        out[CHECKED_LEN..].copy_from_slice(&self.checksum.to_ne_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; FINGERPRINT_SIZE]) -> Self {
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&bytes[CHECKED_LEN..]);
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            major: bytes[4],
            minor: bytes[5],
            patch: bytes[6],
            checksum: u32::from_ne_bytes(checksum),
        }
    }

    pub fn version(&self) -> (u8, u8, u8) {
        (self.major, self.minor, self.patch)
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn has_valid_checksum(&self) -> bool {
        self.checksum == self.expected_checksum()
    }

    /// Data written under `other` can be read by code expecting `self`.
    /// Patch releases never change the layout.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    fn checked_bytes(&self) -> [u8; CHECKED_LEN] {
        let [m0, m1, m2, m3] = self.magic;
        [m0, m1, m2, m3, self.major, self.minor, self.patch]
    }

    fn expected_checksum(&self) -> u32 {
        crc32fast::hash(&self.checked_bytes())
    }
}

/// Reads the token at the reader's position and checks it against
/// [`Fingerprint::current`].
///
/// A file too short to hold a token is truncated only if what is there is a
/// prefix of the magic; anything else is a fingerprint mismatch, as is a
/// full token that is wrong.
pub(crate) fn verify(reader: &mut FileReader) -> Result<Fingerprint, Error> {
    let head = reader.peek(FINGERPRINT_SIZE);
    if head.len() < FINGERPRINT_SIZE {
        let n = head.len().min(MAGIC.len());
        if head[..n] != MAGIC[..n] {
            return Err(mismatch(
                reader,
                format!("bad magic {:02x?} in {}-byte file", &head[..n], head.len()),
            ));
        }
    }

    let bytes: [u8; FINGERPRINT_SIZE] = reader.read_array(Stage::Fingerprint)?;
    let found = Fingerprint::from_bytes(bytes);

    if !found.has_valid_magic() {
        return Err(mismatch(reader, format!("bad magic {:02x?}", found.magic)));
    }
    if !found.has_valid_checksum() {
        return Err(mismatch(
            reader,
            format!(
                "bad checksum 0x{:08x}, expected 0x{:08x}",
                found.checksum,
                found.expected_checksum()
            ),
        ));
    }
    if !Fingerprint::current().is_compatible(&found) {
        let (major, minor, patch) = found.version();
        return Err(mismatch(
            reader,
            format!(
                "file format {major}.{minor}.{patch} is incompatible with {FORMAT_VERSION_MAJOR}.{FORMAT_VERSION_MINOR}.{FORMAT_VERSION_PATCH}"
            ),
        ));
    }
    Ok(found)
}

fn mismatch(reader: &FileReader, reason: String) -> Error {
    FormatError::FingerprintMismatch {
        path: reader.path().to_path_buf(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_layout() {
        let bytes = Fingerprint::with_version(1, 2, 3).to_bytes();
        assert_eq!(&bytes[..7], b"WSTG\x01\x02\x03");
        assert_eq!(
            &bytes[7..],
            &crc32fast::hash(b"WSTG\x01\x02\x03").to_ne_bytes()
        );
    }

    #[test]
    fn current_token_is_self_consistent() {
        let fp = Fingerprint::current();
        assert!(fp.has_valid_magic());
        assert!(fp.has_valid_checksum());
        assert_eq!(Fingerprint::from_bytes(fp.to_bytes()), fp);
        assert_eq!(
            fp.version(),
            (FORMAT_VERSION_MAJOR, FORMAT_VERSION_MINOR, FORMAT_VERSION_PATCH)
        );
    }

    #[test]
    fn any_single_bit_flip_is_detected() {
        let bytes = Fingerprint::current().to_bytes();
        for i in 0..FINGERPRINT_SIZE {
            for bit in 0..8 {
                let mut corrupt = bytes;
                corrupt[i] ^= 1 << bit;
                let fp = Fingerprint::from_bytes(corrupt);
                assert!(
                    !(fp.has_valid_magic() && fp.has_valid_checksum()),
                    "flip of byte {i} bit {bit} went unnoticed"
                );
                assert_ne!(fp, Fingerprint::current());
            }
        }
    }

    #[test]
    fn patch_versions_are_compatible() {
        let ours = Fingerprint::with_version(1, 0, 0);
        assert!(ours.is_compatible(&Fingerprint::with_version(1, 0, 9)));
        assert!(!ours.is_compatible(&Fingerprint::with_version(1, 1, 0)));
        assert!(!ours.is_compatible(&Fingerprint::with_version(2, 0, 0)));
    }

    #[test]
    fn skip_policy_has_no_token() {
        assert!(FingerprintPolicy::Generate.carries_token());
        assert!(FingerprintPolicy::Verify.carries_token());
        assert!(!FingerprintPolicy::Skip.carries_token());
    }
}
