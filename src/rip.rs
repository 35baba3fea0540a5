//! Writing extracted streams to disk.

use crate::config::Config;
use anyhow::{Context, Result};
use ripluoliu_format::{extract_all_streams, ExtractedStream, FourCC};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Rip every stream in `buffer` encoded as `codec` into its own file.
///
/// Files are named `<input-stem>-0x<stream id>.<codec>` and placed next to
/// `input`, or in `extract.output_dir` when configured.
pub fn rip_streams(
    input: &Path,
    buffer: &[u8],
    codec: FourCC,
    config: &Config,
) -> Result<Vec<ExtractedStream>> {
    let output_dir = config.extract.output_dir.as_deref();
    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    let mut extracted = extract_all_streams(
        input,
        buffer,
        codec,
        config.walk.max_blocks,
        |path| File::create(relocate(path, output_dir)).map(BufWriter::new),
    )
    .with_context(|| format!("Failed to extract {} streams from {:?}", codec, input))?;

    for stream in &mut extracted {
        stream.path = relocate(&stream.path, output_dir);
        if stream.stats.limit_reached {
            tracing::warn!(
                "Block limit reached before end of archive; {:?} is incomplete",
                stream.path
            );
        }
    }

    if extracted.is_empty() {
        tracing::warn!("No streams extracted from {:?}", input);
    }

    Ok(extracted)
}

fn relocate(path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtractConfig, WalkConfig};
    use ripluoliu_format::builder::{ArchiveBuilder, BlockSpec};
    use ripluoliu_format::StreamEntry;
    use tempfile::tempdir;

    const H265: FourCC = FourCC(*b"H265");

    fn archive() -> Vec<u8> {
        let mut builder = ArchiveBuilder::new();
        builder
            .stream(1, StreamEntry { stream_id: 0xA, ..Default::default() })
            .block(&BlockSpec::video(0xA, H265), b"abc")
            .block(&BlockSpec::video(0xA, H265), b"def");
        builder.build()
    }

    #[test]
    fn test_rip_next_to_input() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("cam.dat");
        let bytes = archive();

        let out = rip_streams(&input, &bytes, H265, &Config::default()).unwrap();
        assert_eq!(out.len(), 1);
        let expected = temp.path().join("cam-0x0000000a.h265");
        assert_eq!(out[0].path, expected);
        assert_eq!(fs::read(expected).unwrap(), b"abcdef");
    }

    #[test]
    fn test_rip_into_output_dir() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("cam.dat");
        let out_dir = temp.path().join("rips/nested");
        let config = Config {
            extract: ExtractConfig {
                output_dir: Some(out_dir.clone()),
            },
            ..Default::default()
        };

        let out = rip_streams(&input, &archive(), H265, &config).unwrap();
        let expected = out_dir.join("cam-0x0000000a.h265");
        assert_eq!(out[0].path, expected);
        assert_eq!(fs::read(expected).unwrap(), b"abcdef");
        assert!(!temp.path().join("cam-0x0000000a.h265").exists());
    }

    #[test]
    fn test_rip_flags_block_limit() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("cam.dat");
        let config = Config {
            walk: WalkConfig {
                max_blocks: Some(1),
            },
            ..Default::default()
        };

        let out = rip_streams(&input, &archive(), H265, &config).unwrap();
        assert!(out[0].stats.limit_reached);
        assert_eq!(fs::read(&out[0].path).unwrap(), b"abc");

        let out = rip_streams(&input, &archive(), H265, &Config::default()).unwrap();
        assert!(!out[0].stats.limit_reached);
    }

    #[test]
    fn test_rip_empty_codec_writes_nothing() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("cam.dat");
        let out = rip_streams(&input, &archive(), FourCC::EMPTY, &Config::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
