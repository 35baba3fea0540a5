//! ripluoliu-format: reader for luo/liu DVR capture archives
//!
//! An archive is a fixed-size table of contents followed by a chain of
//! self-delimiting blocks, each carrying a video or audio payload for one
//! stream:
//!
//! ```text
//! 0x0000  "luo " ... TOC (0x2000 bytes) ... " oul"
//! 0x2000  "liu " ... header (0x80) ... " uil" | payload (block_size bytes)
//!         "liu " ... header (0x80) ... " uil" | payload
//!         ...
//! ```
//!
//! All parsing borrows the caller's buffer and never reads past its end.
//!
//! # Modules
//!
//! - `fourcc` - four-byte tags for framing and codecs
//! - `reader` - bounds-checked little-endian field access
//! - `toc` - table of contents and stream directory
//! - `block` - block header parsing
//! - `chain` - block chain walk and per-stream inventory
//! - `extract` - per-stream payload extraction
//! - `builder` - synthetic archive writer
//!
//! # Example
//!
//! ```
//! use ripluoliu_format::builder::{ArchiveBuilder, BlockSpec};
//! use ripluoliu_format::{extract_stream, BlockChain, FourCC, StreamEntry, Toc};
//!
//! let h265: FourCC = "H265".parse().unwrap();
//! let mut builder = ArchiveBuilder::new();
//! builder
//!     .stream(0, StreamEntry { stream_id: 1, ..Default::default() })
//!     .block(&BlockSpec::video(1, h265), b"frame");
//! let archive = builder.build();
//!
//! let toc = Toc::read(&archive);
//! assert_eq!(toc.streams().count(), 1);
//! assert_eq!(BlockChain::from_start(&archive).count(), 1);
//!
//! let mut out = Vec::new();
//! extract_stream(&mut out, &archive, 1, h265).unwrap();
//! assert_eq!(out, b"frame");
//! ```

pub mod block;
pub mod builder;
pub mod chain;
pub mod error;
pub mod extract;
pub mod fourcc;
pub mod reader;
pub mod toc;

pub use block::{Block, MaybeUnset, SIZE_BLOCK_HEADER};
pub use chain::{inventory, BlockChain, Inventory, StreamInventory};
pub use error::{Error, ErrorKind, Result, TagPosition};
pub use extract::{
    extract_all_streams, extract_stream, extract_stream_limited, output_path, ExtractStats,
    ExtractedStream,
};
pub use fourcc::{FourCC, SIZE_FOURCC};
pub use reader::ByteReader;
pub use toc::{StreamEntry, Toc, NUM_STREAMS, SIZE_TOC};
