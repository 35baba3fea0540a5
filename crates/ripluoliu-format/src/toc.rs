//! Table of contents at the start of an archive.
//!
//! The TOC is a fixed `0x2000` byte region framed by `"luo "` and `" oul"`.
//! Per-stream attributes are stored as parallel tables of [`NUM_STREAMS`]
//! entries; they are gathered here into one [`StreamEntry`] per slot.

use crate::reader::ByteReader;
use crate::{Error, FourCC, Result, TagPosition, SIZE_FOURCC};

/// Number of stream slots in the directory.
pub const NUM_STREAMS: usize = 32;

/// Total size of the TOC region in bytes.
pub const SIZE_TOC: usize = 0x2000;

/// Field displacements from the start of the TOC.
pub(crate) mod layout {
    pub const TIME_BEGIN: usize = 0x004;
    pub const TIME_END: usize = 0x008;
    pub const STREAM_TIME_BEGIN: usize = 0x08C;
    pub const STREAM_TIME_END_PRIMARY: usize = 0x18C;
    pub const CAMERA_ID: usize = 0x20C;
    pub const STREAM_ID: usize = 0x28C;
    pub const STREAM_TIME_END_SECONDARY: usize = 0x30C;
    pub const BLOCK_COUNT: usize = 0x38C;
    pub const STREAM_BYTE_SIZE: usize = 0x40C;
}

/// One directory slot. A slot with `stream_id == 0` is unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct StreamEntry {
    pub stream_id: u32,
    pub camera_id: u32,
    pub block_count: u32,
    pub stream_byte_size: u64,
    pub stream_time_begin: u32,
    pub stream_time_end_primary: u32,
    pub stream_time_end_secondary: u32,
}

impl StreamEntry {
    pub fn is_used(&self) -> bool {
        self.stream_id != 0
    }
}

/// Parsed table of contents.
///
/// `Toc::default()` is the "no TOC" value: zero timestamps and no used slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Toc {
    /// Recording start, Unix seconds.
    pub time_begin: u32,
    /// Recording end, Unix seconds.
    pub time_end: u32,
    /// All slots in directory order, used or not.
    pub slots: [StreamEntry; NUM_STREAMS],
}

impl Toc {
    /// Parse the TOC region starting at `offset`.
    ///
    /// Fails with [`Error::Truncated`] if the region does not fit, or
    /// [`Error::BadTag`] if either framing tag is wrong. Never returns a
    /// partially filled TOC.
    pub fn parse(buffer: &[u8], offset: usize) -> Result<Self> {
        let reader = ByteReader::new(buffer);

        if !reader.contains(offset, SIZE_TOC) {
            return Err(Error::truncated(
                offset,
                SIZE_TOC,
                buffer.len().saturating_sub(offset),
            ));
        }

        let begin = reader.fourcc(offset)?;
        if begin != FourCC::TOC_BEGIN {
            return Err(Error::BadTag {
                position: TagPosition::TocLeading,
                offset,
                expected: FourCC::TOC_BEGIN,
                found: begin,
            });
        }

        let end_offset = offset + SIZE_TOC - SIZE_FOURCC;
        let end = reader.fourcc(end_offset)?;
        if end != FourCC::TOC_END {
            return Err(Error::BadTag {
                position: TagPosition::TocTrailing,
                offset: end_offset,
                expected: FourCC::TOC_END,
                found: end,
            });
        }

        let region = ByteReader::new(reader.slice(offset, SIZE_TOC)?);

        let mut toc = Toc {
            time_begin: region.u32_le(layout::TIME_BEGIN)?,
            time_end: region.u32_le(layout::TIME_END)?,
            ..Default::default()
        };

        for (i, slot) in toc.slots.iter_mut().enumerate() {
            *slot = StreamEntry {
                stream_id: region.u32_le_at(layout::STREAM_ID, i)?,
                camera_id: region.u32_le_at(layout::CAMERA_ID, i)?,
                block_count: region.u32_le_at(layout::BLOCK_COUNT, i)?,
                stream_byte_size: region.u64_le_at(layout::STREAM_BYTE_SIZE, i)?,
                stream_time_begin: region.u32_le_at(layout::STREAM_TIME_BEGIN, i)?,
                stream_time_end_primary: region.u32_le_at(layout::STREAM_TIME_END_PRIMARY, i)?,
                stream_time_end_secondary: region
                    .u32_le_at(layout::STREAM_TIME_END_SECONDARY, i)?,
            };
        }

        tracing::debug!(
            streams = toc.streams().count(),
            "Parsed TOC at offset {:#x}",
            offset
        );

        Ok(toc)
    }

    /// Parse the TOC at offset 0, falling back to `Toc::default()` on any
    /// failure.
    pub fn read(buffer: &[u8]) -> Self {
        Self::parse(buffer, 0).unwrap_or_else(|e| {
            tracing::debug!("No valid TOC: {}", e);
            Self::default()
        })
    }

    /// Used slots in directory order.
    pub fn streams(&self) -> impl Iterator<Item = &StreamEntry> {
        self.slots.iter().filter(|s| s.is_used())
    }

    /// Look up a used slot by stream id.
    pub fn stream(&self, stream_id: u32) -> Option<&StreamEntry> {
        if stream_id == 0 {
            return None;
        }
        self.slots.iter().find(|s| s.stream_id == stream_id)
    }

    /// True if no slot is in use.
    pub fn is_empty(&self) -> bool {
        self.streams().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::encode_toc;
    use assert_matches::assert_matches;

    fn sample_toc() -> Toc {
        let mut toc = Toc {
            time_begin: 1_700_000_000,
            time_end: 1_700_003_600,
            ..Default::default()
        };
        for (i, slot) in toc.slots.iter_mut().enumerate() {
            // Every third slot left unused
            if i % 3 == 1 {
                continue;
            }
            let i = i as u32;
            *slot = StreamEntry {
                stream_id: 0x100 + i,
                camera_id: i,
                block_count: 10 * i + 1,
                stream_byte_size: (u32::MAX as u64) + i as u64,
                stream_time_begin: 1_700_000_000 + i,
                stream_time_end_primary: 1_700_003_000 + i,
                stream_time_end_secondary: 1_700_003_500 + i,
            };
        }
        toc
    }

    #[test]
    fn test_parse_recovers_every_slot() {
        let toc = sample_toc();
        let bytes = encode_toc(&toc);
        let parsed = Toc::parse(&bytes, 0).unwrap();
        assert_eq!(parsed, toc);
        for (i, slot) in parsed.slots.iter().enumerate() {
            assert_eq!(slot, &toc.slots[i]);
        }
    }

    #[test]
    fn test_streams_skip_unused_slots() {
        let toc = Toc::parse(&encode_toc(&sample_toc()), 0).unwrap();
        let ids: Vec<u32> = toc.streams().map(|s| s.stream_id).collect();
        assert_eq!(ids.len(), 21);
        assert!(ids.iter().all(|&id| id != 0));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(toc.stream(0x100).map(|s| s.camera_id), Some(0));
        assert!(toc.stream(0x101).is_none());
        assert!(toc.stream(0).is_none());
    }

    #[test]
    fn test_short_buffer_yields_empty_toc() {
        let bytes = encode_toc(&sample_toc());
        for len in [0, 4, SIZE_TOC / 2, SIZE_TOC - 1] {
            assert_matches!(
                Toc::parse(&bytes[..len], 0),
                Err(Error::Truncated { need: SIZE_TOC, .. })
            );
            let toc = Toc::read(&bytes[..len]);
            assert!(toc.is_empty());
            assert_eq!(toc, Toc::default());
        }
    }

    #[test]
    fn test_bad_leading_tag() {
        let mut bytes = encode_toc(&sample_toc()).to_vec();
        bytes[0] = b'L';
        assert_matches!(
            Toc::parse(&bytes, 0),
            Err(Error::BadTag { position: TagPosition::TocLeading, offset: 0, .. })
        );
    }

    #[test]
    fn test_any_trailing_tag_byte_corrupted() {
        let clean = encode_toc(&sample_toc()).to_vec();
        for i in SIZE_TOC - 4..SIZE_TOC {
            let mut bytes = clean.clone();
            bytes[i] ^= 0x20;
            assert_matches!(
                Toc::parse(&bytes, 0),
                Err(Error::BadTag { position: TagPosition::TocTrailing, offset: 0x1ffc, .. })
            );
            assert!(Toc::read(&bytes).is_empty());
        }
    }

    #[test]
    fn test_parse_at_offset() {
        let mut bytes = vec![0xAAu8; 16];
        bytes.extend_from_slice(&encode_toc(&sample_toc()));
        assert_eq!(Toc::parse(&bytes, 16).unwrap(), sample_toc());
        assert!(Toc::parse(&bytes, 0).is_err());
    }
}
