use clap::Parser;
use ripluoliu_format::FourCC;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ripluoliu")]
#[command(author, version, about = "Inspect luo/liu DVR capture archives and rip their streams")]
pub struct Cli {
    /// Capture archive to read
    #[arg(required = true)]
    pub input: PathBuf,

    /// Extract every stream encoded with this codec tag (e.g. H265)
    #[arg(long, value_name = "FOURCC", value_parser = parse_fourcc)]
    pub rip: Option<FourCC>,

    /// Also print the first N block headers
    #[arg(long, value_name = "N")]
    pub blocks: Option<usize>,

    /// Print block and byte counts per stream and codec
    #[arg(long)]
    pub inventory: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Stop walking the block chain after N blocks
    #[arg(long, value_name = "N")]
    pub max_blocks: Option<usize>,

    /// Directory for ripped streams (default: next to the input)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_fourcc(s: &str) -> Result<FourCC, String> {
    s.parse().map_err(|e: ripluoliu_format::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rip_flag_with_equals() {
        let cli = Cli::try_parse_from(["ripluoliu", "cap.dat", "--rip=H265"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("cap.dat"));
        assert_eq!(cli.rip, Some(FourCC(*b"H265")));
        assert!(!cli.json);
    }

    #[test]
    fn test_rip_flag_wrong_length() {
        let err = Cli::try_parse_from(["ripluoliu", "cap.dat", "--rip=H26"]).unwrap_err();
        assert!(err.to_string().contains("exactly 4 ASCII characters"));

        // Four bytes, three characters
        let err = Cli::try_parse_from(["ripluoliu", "cap.dat", "--rip=ÄBC"]).unwrap_err();
        assert!(err.to_string().contains("exactly 4 ASCII characters"));
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(Cli::try_parse_from(["ripluoliu", "cap.dat", "--frobnicate"]).is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["ripluoliu"]).is_err());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "ripluoliu",
            "-v",
            "--blocks",
            "2",
            "--inventory",
            "--json",
            "--max-blocks",
            "100",
            "-o",
            "out",
            "-c",
            "rip.toml",
            "cap.dat",
        ])
        .unwrap();
        assert!(cli.verbose && cli.inventory && cli.json);
        assert_eq!(cli.blocks, Some(2));
        assert_eq!(cli.max_blocks, Some(100));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.config, Some(PathBuf::from("rip.toml")));
        assert!(cli.rip.is_none());
    }
}
