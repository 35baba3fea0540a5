//! Per-stream payload extraction.

use crate::{BlockChain, FourCC, Result, Toc};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What one extraction pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ExtractStats {
    pub blocks: u64,
    pub bytes: u64,
    /// The walk was cut short by the block limit; the output is partial.
    pub limit_reached: bool,
}

/// One stream written by [`extract_all_streams`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ExtractedStream {
    pub stream_id: u32,
    pub path: PathBuf,
    pub stats: ExtractStats,
}

/// Append the payload of every block carrying `stream_id` as `codec` to
/// `sink`, in chain order.
pub fn extract_stream<W: Write>(
    sink: &mut W,
    buffer: &[u8],
    stream_id: u32,
    codec: FourCC,
) -> Result<ExtractStats> {
    extract_stream_limited(sink, buffer, stream_id, codec, None)
}

/// Like [`extract_stream`], visiting at most `max_blocks` blocks.
pub fn extract_stream_limited<W: Write>(
    sink: &mut W,
    buffer: &[u8],
    stream_id: u32,
    codec: FourCC,
    max_blocks: Option<usize>,
) -> Result<ExtractStats> {
    let mut stats = ExtractStats::default();
    let mut chain = BlockChain::from_start(buffer).with_limit(max_blocks);

    for block in chain.by_ref() {
        if !block.matches(stream_id, codec) {
            continue;
        }
        sink.write_all(block.payload(buffer)?)?;
        stats.blocks += 1;
        stats.bytes += block.block_size as u64;
    }
    stats.limit_reached = chain.limit_reached();

    tracing::debug!(
        blocks = stats.blocks,
        bytes = stats.bytes,
        limit_reached = stats.limit_reached,
        "Extracted stream {:#010x} ({})",
        stream_id,
        codec
    );

    Ok(stats)
}

/// Output path for one stream: `<stem>-0x<id>.<codec>` next to `input`.
///
/// The id is eight lowercase hex digits, the extension is the lowercased
/// codec tag. Path separators and dots in the tag become `_` so the name
/// always stays in the input's directory.
pub fn output_path(input: &Path, stream_id: u32, codec: FourCC) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = format!("{}-0x{:08x}.{}", stem, stream_id, extension(codec));
    input.with_file_name(name)
}

fn extension(codec: FourCC) -> String {
    codec
        .to_lowercase_string()
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '.' => '_',
            c => c,
        })
        .collect()
}

/// Extract every stream listed in the TOC of `buffer`, encoded as `codec`.
///
/// For each used directory slot, in slot order, `open` is called with the
/// path from [`output_path`] and the stream is written to the returned
/// sink. An empty `input`, empty `buffer` or empty `codec` makes this a
/// no-op; so does a missing or invalid TOC.
pub fn extract_all_streams<F, W>(
    input: &Path,
    buffer: &[u8],
    codec: FourCC,
    max_blocks: Option<usize>,
    mut open: F,
) -> Result<Vec<ExtractedStream>>
where
    F: FnMut(&Path) -> std::io::Result<W>,
    W: Write,
{
    if input.as_os_str().is_empty() || buffer.is_empty() || codec.is_empty() {
        return Ok(Vec::new());
    }

    let toc = Toc::read(buffer);
    let mut extracted = Vec::new();

    for entry in toc.streams() {
        let path = output_path(input, entry.stream_id, codec);
        let mut sink = open(&path)?;
        let stats = extract_stream_limited(&mut sink, buffer, entry.stream_id, codec, max_blocks)?;
        sink.flush()?;

        tracing::info!(
            blocks = stats.blocks,
            bytes = stats.bytes,
            limit_reached = stats.limit_reached,
            "Wrote stream {:#010x} to {}",
            entry.stream_id,
            path.display()
        );

        extracted.push(ExtractedStream {
            stream_id: entry.stream_id,
            path,
            stats,
        });
    }

    Ok(extracted)
}
