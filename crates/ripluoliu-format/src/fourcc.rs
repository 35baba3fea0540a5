//! Four-character codes used for framing tags and codec identification.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in a FourCC.
pub const SIZE_FOURCC: usize = 4;

/// Four raw bytes. No text encoding is implied; tags may hold NUL or other
/// non-printable bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; SIZE_FOURCC]);

impl FourCC {
    /// All four bytes NUL.
    pub const EMPTY: Self = Self([0; SIZE_FOURCC]);

    pub const TOC_BEGIN: Self = Self(*b"luo ");
    pub const TOC_END: Self = Self(*b" oul");
    pub const BLOCK_BEGIN: Self = Self(*b"liu ");
    pub const BLOCK_END: Self = Self(*b" uil");

    pub const fn new(bytes: [u8; SIZE_FOURCC]) -> Self {
        Self(bytes)
    }

    /// True if every byte is NUL.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn as_bytes(&self) -> &[u8; SIZE_FOURCC] {
        &self.0
    }

    /// Build a tag from a string, yielding [`FourCC::EMPTY`] unless the
    /// string is exactly four bytes long. Callers must test `is_empty()`.
    pub fn from_str_or_empty(s: &str) -> Self {
        s.parse().unwrap_or(Self::EMPTY)
    }

    /// Copy the four bytes at `offset`. Returns `None` if they do not fit.
    pub fn read_at(buffer: &[u8], offset: usize) -> Option<Self> {
        let end = offset.checked_add(SIZE_FOURCC)?;
        let bytes = buffer.get(offset..end)?;
        let mut tag = [0u8; SIZE_FOURCC];
        tag.copy_from_slice(bytes);
        Some(Self(tag))
    }

    /// True if the four bytes at `offset` equal this tag. Out of range
    /// never matches.
    pub fn matches_at(&self, buffer: &[u8], offset: usize) -> bool {
        Self::read_at(buffer, offset).is_some_and(|tag| tag == *self)
    }

    /// Lowercased ASCII rendering, used for output file extensions.
    pub fn to_lowercase_string(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

impl FromStr for FourCC {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_ascii() {
            return Err(Error::InvalidFourCc(s.to_string()));
        }
        let bytes: [u8; SIZE_FOURCC] = s
            .as_bytes()
            .try_into()
            .map_err(|_| Error::InvalidFourCc(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b == b' ' || b.is_ascii_graphic() {
                b as char
            } else {
                '.'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for FourCC {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
