//! Self-delimiting data blocks following the TOC.

use crate::reader::ByteReader;
use crate::{Error, FourCC, Result, TagPosition, SIZE_FOURCC};
use std::fmt;

/// Size of a block header in bytes. The payload follows immediately.
pub const SIZE_BLOCK_HEADER: usize = 0x80;

/// Field displacements from the start of a block header.
pub(crate) mod layout {
    pub const STREAM_ID: usize = 0x04;
    pub const VIDEO_WIDTH: usize = 0x08;
    pub const VIDEO_HEIGHT: usize = 0x0C;
    pub const VIDEO_FPS: usize = 0x10;
    pub const AUDIO_RATE: usize = 0x14;
    pub const CODEC: usize = 0x18;
    pub const CAMERA_ID: usize = 0x28;
    pub const BLOCK_SIZE: usize = 0x3C;
    pub const TIMESTAMP: usize = 0x48;
}

/// A `u32` header field where all ones means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct MaybeUnset(pub u32);

impl MaybeUnset {
    pub const UNSET: u32 = u32::MAX;

    pub fn is_unset(&self) -> bool {
        self.0 == Self::UNSET
    }

    /// The value, or `None` for the sentinel.
    pub fn get(&self) -> Option<u32> {
        (!self.is_unset()).then_some(self.0)
    }
}

impl fmt::Display for MaybeUnset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            write!(f, "0x{:08X}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Parsed block header.
///
/// The payload is not copied; `payload_offset()` and `block_size` locate it
/// in the buffer the block was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Block {
    /// Absolute offset of the header.
    pub offset: usize,
    pub stream_id: u32,
    pub video_width: MaybeUnset,
    pub video_height: MaybeUnset,
    pub video_fps: MaybeUnset,
    pub audio_rate: MaybeUnset,
    pub codec: FourCC,
    pub camera_id: u32,
    /// Payload length, excluding the header.
    pub block_size: u32,
    /// Unix seconds.
    pub timestamp: u32,
}

impl Block {
    /// Parse the block whose header starts at `offset`.
    ///
    /// Checks, in order: the header fits, the leading `"liu "` tag, the
    /// trailing `" uil"` tag, and finally that the declared payload fits.
    pub fn parse(buffer: &[u8], offset: usize) -> Result<Self> {
        let reader = ByteReader::new(buffer);

        if !reader.contains(offset, SIZE_BLOCK_HEADER) {
            return Err(Error::truncated(
                offset,
                SIZE_BLOCK_HEADER,
                buffer.len().saturating_sub(offset),
            ));
        }

        let begin = reader.fourcc(offset)?;
        if begin != FourCC::BLOCK_BEGIN {
            return Err(Error::BadTag {
                position: TagPosition::BlockLeading,
                offset,
                expected: FourCC::BLOCK_BEGIN,
                found: begin,
            });
        }

        let end_offset = offset + SIZE_BLOCK_HEADER - SIZE_FOURCC;
        let end = reader.fourcc(end_offset)?;
        if end != FourCC::BLOCK_END {
            return Err(Error::BadTag {
                position: TagPosition::BlockTrailing,
                offset: end_offset,
                expected: FourCC::BLOCK_END,
                found: end,
            });
        }

        let header = ByteReader::new(reader.slice(offset, SIZE_BLOCK_HEADER)?);

        let block = Block {
            offset,
            stream_id: header.u32_le(layout::STREAM_ID)?,
            video_width: MaybeUnset(header.u32_le(layout::VIDEO_WIDTH)?),
            video_height: MaybeUnset(header.u32_le(layout::VIDEO_HEIGHT)?),
            video_fps: MaybeUnset(header.u32_le(layout::VIDEO_FPS)?),
            audio_rate: MaybeUnset(header.u32_le(layout::AUDIO_RATE)?),
            codec: header.fourcc(layout::CODEC)?,
            camera_id: header.u32_le(layout::CAMERA_ID)?,
            block_size: header.u32_le(layout::BLOCK_SIZE)?,
            timestamp: header.u32_le(layout::TIMESTAMP)?,
        };

        // Header is framed correctly but the payload may still run past EOF
        if !reader.contains(block.payload_offset(), block.payload_len()) {
            return Err(Error::truncated(
                block.payload_offset(),
                block.payload_len(),
                buffer.len().saturating_sub(block.payload_offset()),
            ));
        }

        Ok(block)
    }

    /// Parse the block at `offset`, or `None` if it is not valid.
    pub fn read(buffer: &[u8], offset: usize) -> Option<Self> {
        Self::parse(buffer, offset).ok()
    }

    /// Offset of the first payload byte.
    pub fn payload_offset(&self) -> usize {
        self.offset + SIZE_BLOCK_HEADER
    }

    pub fn payload_len(&self) -> usize {
        self.block_size as usize
    }

    /// Offset of the following block header, valid or not.
    pub fn next_offset(&self) -> usize {
        self.payload_offset() + self.payload_len()
    }

    /// Borrow the payload from the buffer this block was parsed from.
    pub fn payload<'a>(&self, buffer: &'a [u8]) -> Result<&'a [u8]> {
        ByteReader::new(buffer).slice(self.payload_offset(), self.payload_len())
    }

    /// True if this block carries `stream_id` encoded as `codec`.
    pub fn matches(&self, stream_id: u32, codec: FourCC) -> bool {
        self.stream_id == stream_id && self.codec == codec
    }
}
