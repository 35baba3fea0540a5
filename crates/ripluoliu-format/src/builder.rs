//! Synthetic archive writer.
//!
//! Produces well-formed archives for tests, benchmarks and fixtures. Only the
//! fields this crate reads are written; everything else is zero.

use crate::block::{layout as block_layout, MaybeUnset, SIZE_BLOCK_HEADER};
use crate::toc::{layout as toc_layout, StreamEntry, NUM_STREAMS, SIZE_TOC};
use crate::{FourCC, Toc, SIZE_FOURCC};
use bytes::{BufMut, BytesMut};

/// Header values for one block written by [`ArchiveBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    pub stream_id: u32,
    pub video_width: u32,
    pub video_height: u32,
    pub video_fps: u32,
    pub audio_rate: u32,
    pub codec: FourCC,
    pub camera_id: u32,
    pub timestamp: u32,
}

impl BlockSpec {
    /// A 1920x1080 @ 25 fps video block; audio rate unset.
    pub fn video(stream_id: u32, codec: FourCC) -> Self {
        Self {
            stream_id,
            video_width: 1920,
            video_height: 1080,
            video_fps: 25,
            audio_rate: MaybeUnset::UNSET,
            codec,
            camera_id: 0,
            timestamp: 0,
        }
    }

    /// An 8 kHz audio block; video fields unset.
    pub fn audio(stream_id: u32, codec: FourCC) -> Self {
        Self {
            stream_id,
            video_width: MaybeUnset::UNSET,
            video_height: MaybeUnset::UNSET,
            video_fps: MaybeUnset::UNSET,
            audio_rate: 8000,
            codec,
            camera_id: 0,
            timestamp: 0,
        }
    }
}

/// Encode a complete TOC region.
pub fn encode_toc(toc: &Toc) -> BytesMut {
    let mut buf = BytesMut::zeroed(SIZE_TOC);
    put_at(&mut buf, 0, FourCC::TOC_BEGIN.as_bytes());
    put_at(&mut buf, SIZE_TOC - SIZE_FOURCC, FourCC::TOC_END.as_bytes());
    put_at(&mut buf, toc_layout::TIME_BEGIN, &toc.time_begin.to_le_bytes());
    put_at(&mut buf, toc_layout::TIME_END, &toc.time_end.to_le_bytes());

    for (i, s) in toc.slots.iter().enumerate() {
        let u32_tables = [
            (toc_layout::STREAM_ID, s.stream_id),
            (toc_layout::CAMERA_ID, s.camera_id),
            (toc_layout::BLOCK_COUNT, s.block_count),
            (toc_layout::STREAM_TIME_BEGIN, s.stream_time_begin),
            (toc_layout::STREAM_TIME_END_PRIMARY, s.stream_time_end_primary),
            (toc_layout::STREAM_TIME_END_SECONDARY, s.stream_time_end_secondary),
        ];
        for (base, value) in u32_tables {
            put_at(&mut buf, base + i * 4, &value.to_le_bytes());
        }
        put_at(
            &mut buf,
            toc_layout::STREAM_BYTE_SIZE + i * 8,
            &s.stream_byte_size.to_le_bytes(),
        );
    }

    buf
}

/// Encode one block: header followed by `payload`.
pub fn encode_block(spec: &BlockSpec, payload: &[u8]) -> BytesMut {
    let mut header = BytesMut::zeroed(SIZE_BLOCK_HEADER);
    put_at(&mut header, 0, FourCC::BLOCK_BEGIN.as_bytes());
    put_at(
        &mut header,
        SIZE_BLOCK_HEADER - SIZE_FOURCC,
        FourCC::BLOCK_END.as_bytes(),
    );

    let fields = [
        (block_layout::STREAM_ID, spec.stream_id),
        (block_layout::VIDEO_WIDTH, spec.video_width),
        (block_layout::VIDEO_HEIGHT, spec.video_height),
        (block_layout::VIDEO_FPS, spec.video_fps),
        (block_layout::AUDIO_RATE, spec.audio_rate),
        (block_layout::CAMERA_ID, spec.camera_id),
        (block_layout::BLOCK_SIZE, payload.len() as u32),
        (block_layout::TIMESTAMP, spec.timestamp),
    ];
    for (offset, value) in fields {
        put_at(&mut header, offset, &value.to_le_bytes());
    }
    put_at(&mut header, block_layout::CODEC, spec.codec.as_bytes());

    let mut buf = BytesMut::with_capacity(SIZE_BLOCK_HEADER + payload.len());
    buf.put(header);
    buf.put_slice(payload);
    buf
}

fn put_at(buf: &mut BytesMut, offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Assembles a TOC and a block chain into one archive buffer.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    toc: Toc,
    blocks: BytesMut,
}

impl ArchiveBuilder {
    /// Empty archive: valid TOC framing, no streams, no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn times(&mut self, time_begin: u32, time_end: u32) -> &mut Self {
        self.toc.time_begin = time_begin;
        self.toc.time_end = time_end;
        self
    }

    /// Fill directory slot `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= NUM_STREAMS`.
    pub fn stream(&mut self, slot: usize, entry: StreamEntry) -> &mut Self {
        assert!(slot < NUM_STREAMS, "slot {} out of range", slot);
        self.toc.slots[slot] = entry;
        self
    }

    /// Append a block to the chain.
    pub fn block(&mut self, spec: &BlockSpec, payload: &[u8]) -> &mut Self {
        self.blocks.put(encode_block(spec, payload));
        self
    }

    /// Append raw bytes after the blocks written so far.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.blocks.put_slice(bytes);
        self
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = encode_toc(&self.toc);
        out.extend_from_slice(&self.blocks);
        out.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Block;

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = ArchiveBuilder::new().build();
        assert_eq!(bytes.len(), SIZE_TOC);
        let toc = Toc::parse(&bytes, 0).unwrap();
        assert!(toc.is_empty());
    }

    #[test]
    fn test_encoded_toc_parses_back() {
        let mut builder = ArchiveBuilder::new();
        builder.times(1_700_000_000, 1_700_003_600).stream(
            5,
            StreamEntry {
                stream_id: 0x77,
                camera_id: 2,
                block_count: 9,
                stream_byte_size: 1 << 33,
                ..Default::default()
            },
        );
        let bytes = builder.build();
        assert_eq!(&Toc::parse(&bytes, 0).unwrap(), builder.toc());
    }

    #[test]
    fn test_block_layout() {
        let bytes = encode_block(&BlockSpec::audio(7, FourCC(*b"G711")), &[9; 3]);
        assert_eq!(bytes.len(), SIZE_BLOCK_HEADER + 3);
        assert_eq!(&bytes[..4], b"liu ");
        assert_eq!(&bytes[0x7c..0x80], b" uil");
        assert_eq!(&bytes[0x18..0x1c], b"G711");
        assert_eq!(&bytes[0x3c..0x40], &3u32.to_le_bytes());
        let block = Block::parse(&bytes, 0).unwrap();
        assert!(block.video_width.is_unset());
        assert_eq!(block.audio_rate.get(), Some(8000));
    }
}
