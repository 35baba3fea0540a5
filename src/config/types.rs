use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WalkConfig {
    /// Maximum number of blocks visited per walk (unset: no limit)
    #[serde(default)]
    pub max_blocks: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractConfig {
    /// Directory for ripped streams (unset: next to the input file)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}
