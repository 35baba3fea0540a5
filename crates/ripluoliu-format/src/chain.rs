//! Forward walk over the block region.

use crate::{Block, Error, FourCC, SIZE_TOC};

/// Lazy, forward-only iterator over consecutive blocks.
///
/// Yields blocks starting at the given offset and stops for good at the
/// first block that fails to parse. There is no resynchronisation: one
/// corrupt block hides every block after it.
#[derive(Debug)]
pub struct BlockChain<'a> {
    buffer: &'a [u8],
    next: usize,
    visited: usize,
    limit: Option<usize>,
    finished: bool,
    stop_reason: Option<Error>,
}

impl<'a> BlockChain<'a> {
    /// Walk from `offset` with no limit on blocks visited.
    pub fn new(buffer: &'a [u8], offset: usize) -> Self {
        Self {
            buffer,
            next: offset,
            visited: 0,
            limit: None,
            finished: false,
            stop_reason: None,
        }
    }

    /// Walk from the first block, directly after the TOC.
    pub fn from_start(buffer: &'a [u8]) -> Self {
        Self::new(buffer, SIZE_TOC)
    }

    /// Stop after at most `limit` blocks.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of blocks yielded so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Why the walk ended.
    ///
    /// `None` while the walk is running or when it ended cleanly at the end
    /// of the buffer.
    pub fn stop_reason(&self) -> Option<&Error> {
        self.stop_reason.as_ref()
    }

    /// True if the walk ended because the block limit was hit.
    pub fn limit_reached(&self) -> bool {
        matches!(self.stop_reason, Some(Error::LimitReached(_)))
    }

    fn finish(&mut self, reason: Option<Error>) {
        match &reason {
            Some(e) => tracing::debug!(
                blocks = self.visited,
                "Block chain stopped at offset {:#x}: {}",
                self.next,
                e
            ),
            None => tracing::debug!(blocks = self.visited, "Block chain reached end of buffer"),
        }
        self.finished = true;
        self.stop_reason = reason;
    }
}

impl Iterator for BlockChain<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.finished {
            return None;
        }

        if self.next == self.buffer.len() {
            self.finish(None);
            return None;
        }

        if let Some(limit) = self.limit {
            if self.visited >= limit {
                self.finish(Some(Error::LimitReached(limit)));
                return None;
            }
        }

        let block = match Block::parse(self.buffer, self.next) {
            Ok(block) => block,
            Err(e) => {
                self.finish(Some(e));
                return None;
            }
        };

        let next = block.next_offset();
        if next <= block.offset {
            self.finish(Some(Error::NoProgress {
                offset: block.offset,
                next,
            }));
            return None;
        }

        tracing::trace!(
            stream_id = block.stream_id,
            codec = %block.codec,
            size = block.block_size,
            "Block at offset {:#x}",
            block.offset
        );

        self.visited += 1;
        self.next = next;
        Some(block)
    }
}

impl std::iter::FusedIterator for BlockChain<'_> {}

/// Block tally for one (stream, codec) pair seen in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct StreamInventory {
    pub stream_id: u32,
    pub codec: FourCC,
    pub blocks: u64,
    pub bytes: u64,
    /// Timestamp of the first block seen.
    pub first_timestamp: u32,
    /// Timestamp of the last block seen.
    pub last_timestamp: u32,
}

/// Result of [`inventory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Inventory {
    pub streams: Vec<StreamInventory>,
    /// The walk was cut short by the block limit, so the tallies are partial.
    pub limit_reached: bool,
}

/// Tally the block chain per (stream, codec), in first-seen order.
pub fn inventory(buffer: &[u8], limit: Option<usize>) -> Inventory {
    let mut entries: Vec<StreamInventory> = Vec::new();
    let mut chain = BlockChain::from_start(buffer).with_limit(limit);

    for block in chain.by_ref() {
        match entries
            .iter_mut()
            .find(|e| e.stream_id == block.stream_id && e.codec == block.codec)
        {
            Some(entry) => {
                entry.blocks += 1;
                entry.bytes += block.block_size as u64;
                entry.last_timestamp = block.timestamp;
            }
            None => entries.push(StreamInventory {
                stream_id: block.stream_id,
                codec: block.codec,
                blocks: 1,
                bytes: block.block_size as u64,
                first_timestamp: block.timestamp,
                last_timestamp: block.timestamp,
            }),
        }
    }

    Inventory {
        streams: entries,
        limit_reached: chain.limit_reached(),
    }
}
