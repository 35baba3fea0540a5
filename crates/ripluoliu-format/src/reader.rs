//! Bounds-checked little-endian field access into a borrowed buffer.

use crate::{Error, FourCC, Result};
use bytes::Buf;

/// Read-only view over an archive buffer.
///
/// Every accessor checks `offset + width <= len` and fails with
/// [`Error::Truncated`] instead of panicking. The tag checks done by the TOC
/// and block parsers make these failures unreachable in practice.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// True if `len` bytes starting at `offset` lie inside the buffer.
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        offset
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    /// Borrow `len` bytes at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| Error::truncated(offset, len, self.data.len().saturating_sub(offset)))
    }

    pub fn u32_le(&self, offset: usize) -> Result<u32> {
        let mut window = self.slice(offset, 4)?;
        Ok(window.get_u32_le())
    }

    pub fn u64_le(&self, offset: usize) -> Result<u64> {
        let mut window = self.slice(offset, 8)?;
        Ok(window.get_u64_le())
    }

    /// Element `index` of a packed `u32` table starting at `base`.
    pub fn u32_le_at(&self, base: usize, index: usize) -> Result<u32> {
        self.u32_le(base + index * 4)
    }

    /// Element `index` of a packed `u64` table starting at `base`.
    pub fn u64_le_at(&self, base: usize, index: usize) -> Result<u64> {
        self.u64_le(base + index * 8)
    }

    pub fn fourcc(&self, offset: usize) -> Result<FourCC> {
        FourCC::read_at(self.data, offset)
            .ok_or_else(|| Error::truncated(offset, 4, self.data.len().saturating_sub(offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_little_endian() {
        let data = [0x78, 0x56, 0x34, 0x12, 0xff, 0, 0, 0, 0, 0, 0, 0x80];
        let r = ByteReader::new(&data);
        assert_eq!(r.u32_le(0).unwrap(), 0x1234_5678);
        assert_eq!(r.u32_le(4).unwrap(), 0xff);
        assert_eq!(r.u64_le(4).unwrap(), 0x8000_0000_0000_00ff);
    }

    #[test]
    fn test_tables() {
        let data: Vec<u8> = (0u32..4).flat_map(|v| v.to_le_bytes()).collect();
        let r = ByteReader::new(&data);
        assert_eq!(r.u32_le_at(0, 3).unwrap(), 3);
        assert_eq!(r.u64_le_at(0, 1).unwrap(), (3 << 32) | 2);
    }

    #[test]
    fn test_out_of_range() {
        let data = [1u8, 2, 3];
        let r = ByteReader::new(&data);
        assert_matches!(
            r.u32_le(0),
            Err(Error::Truncated { offset: 0, need: 4, have: 3 })
        );
        assert_matches!(r.u64_le(2), Err(Error::Truncated { have: 1, .. }));
        assert_matches!(r.slice(usize::MAX, 2), Err(Error::Truncated { have: 0, .. }));
        assert_matches!(r.fourcc(0), Err(Error::Truncated { .. }));
        assert!(r.contains(1, 2));
        assert!(!r.contains(1, 3));
        assert!(!r.contains(usize::MAX, 1));
    }
}
