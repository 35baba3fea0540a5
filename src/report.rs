//! Human-readable and JSON reports for an archive.

use chrono::DateTime;
use ripluoliu_format::{Block, ExtractedStream, Inventory, StreamEntry, Toc};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Everything printed for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: PathBuf,
    pub file_size: u64,
    pub toc: TocReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Inventory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extracted: Vec<ExtractedStream>,
}

/// TOC view with unused slots dropped.
#[derive(Debug, Clone, Serialize)]
pub struct TocReport {
    pub valid: bool,
    pub time_begin: u32,
    pub time_end: u32,
    pub streams: Vec<StreamEntry>,
}

impl TocReport {
    pub fn new(toc: &Toc, valid: bool) -> Self {
        Self {
            valid,
            time_begin: toc.time_begin,
            time_end: toc.time_end,
            streams: toc.streams().copied().collect(),
        }
    }
}

/// Render Unix seconds as `YYYYMMDD-HHMMSS` (UTC).
pub fn format_time(t: u32) -> String {
    DateTime::from_timestamp(i64::from(t), 0)
        .map(|dt| dt.format("%Y%m%d-%H%M%S").to_string())
        .unwrap_or_else(|| t.to_string())
}

pub fn format_stream_id(id: u32) -> String {
    format!("0x{:08X}", id)
}

pub fn write_toc<W: Write>(out: &mut W, toc: &TocReport) -> io::Result<()> {
    if !toc.valid {
        writeln!(out, "No valid table of contents")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "time_begin       = {}", format_time(toc.time_begin))?;
    writeln!(out, "time_end         = {}", format_time(toc.time_end))?;
    writeln!(out)?;

    for s in &toc.streams {
        writeln!(out, "stream_id        = {}", format_stream_id(s.stream_id))?;
        writeln!(out, "camera_id        = {}", s.camera_id)?;
        writeln!(out, "block_count      = {}", s.block_count)?;
        writeln!(out, "stream_size      = {}", s.stream_byte_size)?;
        writeln!(out, "stream_begin     = {}", format_time(s.stream_time_begin))?;
        writeln!(out, "stream_end       = {}", format_time(s.stream_time_end_primary))?;
        writeln!(out, "stream_end2      = {}", format_time(s.stream_time_end_secondary))?;
        writeln!(out)?;
    }

    Ok(())
}

pub fn write_block<W: Write>(out: &mut W, block: &Block) -> io::Result<()> {
    writeln!(out, "offset       = 0x{:X}", block.offset)?;
    writeln!(out, "stream_id    = {}", format_stream_id(block.stream_id))?;
    writeln!(out, "video_width  = {}", block.video_width)?;
    writeln!(out, "video_height = {}", block.video_height)?;
    writeln!(out, "video_fps    = {}", block.video_fps)?;
    writeln!(out, "audio_rate   = {}", block.audio_rate)?;
    writeln!(out, "codec        = {}", block.codec)?;
    writeln!(out, "camera_id    = {}", block.camera_id)?;
    writeln!(out, "block_size   = {}", block.block_size)?;
    writeln!(out, "timestamp    = {}", format_time(block.timestamp))?;
    writeln!(out)
}

pub fn write_inventory<W: Write>(out: &mut W, inventory: &Inventory) -> io::Result<()> {
    writeln!(out, "Inventory: {} stream/codec pairs", inventory.streams.len())?;
    if inventory.limit_reached {
        writeln!(out, "  (partial: block limit reached)")?;
    }
    for e in &inventory.streams {
        writeln!(
            out,
            "  {} {}  {} blocks, {} bytes  {} .. {}",
            format_stream_id(e.stream_id),
            e.codec,
            e.blocks,
            e.bytes,
            format_time(e.first_timestamp),
            format_time(e.last_timestamp)
        )?;
    }
    writeln!(out)
}

pub fn write_text<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "File: {}", report.input.display())?;
    writeln!(out, "Size: {} bytes", report.file_size)?;
    writeln!(out)?;

    write_toc(out, &report.toc)?;

    for block in &report.blocks {
        write_block(out, block)?;
    }

    if let Some(inventory) = &report.inventory {
        write_inventory(out, inventory)?;
    }

    if !report.extracted.is_empty() {
        writeln!(out, "Extracted {} streams", report.extracted.len())?;
        for s in &report.extracted {
            write!(
                out,
                "  {} -> {} ({} blocks, {} bytes)",
                format_stream_id(s.stream_id),
                s.path.display(),
                s.stats.blocks,
                s.stats.bytes
            )?;
            if s.stats.limit_reached {
                write!(out, " [partial: block limit reached]")?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}
