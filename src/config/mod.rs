mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./ripluoliu.toml", "~/.config/ripluoliu/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

impl Config {
    /// Apply command-line overrides on top of file settings.
    pub fn with_overrides(mut self, max_blocks: Option<usize>, output_dir: Option<PathBuf>) -> Result<Self> {
        if max_blocks.is_some() {
            self.walk.max_blocks = max_blocks;
        }
        if output_dir.is_some() {
            self.extract.output_dir = output_dir;
        }
        validate_config(&self)?;
        Ok(self)
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.walk.max_blocks == Some(0) {
        anyhow::bail!("walk.max_blocks cannot be 0");
    }

    if let Some(dir) = &config.extract.output_dir {
        if dir.exists() && !dir.is_dir() {
            anyhow::bail!("extract.output_dir is not a directory: {:?}", dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("ripluoliu.toml");
        fs::write(
            &path,
            r#"
[walk]
max_blocks = 5000

[extract]
output_dir = "/tmp/rips"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.walk.max_blocks, Some(5000));
        assert_eq!(config.extract.output_dir, Some(PathBuf::from("/tmp/rips")));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(load_config(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_zero_block_limit_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[walk]\nmax_blocks = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("max_blocks"));
    }

    #[test]
    fn test_output_dir_must_be_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        assert!(Config::default().with_overrides(None, Some(file)).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Path::new("/nonexistent/ripluoliu.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            walk: WalkConfig { max_blocks: Some(10) },
            extract: ExtractConfig::default(),
        };
        let merged = config
            .clone()
            .with_overrides(None, Some(PathBuf::from("out")))
            .unwrap();
        assert_eq!(merged.walk.max_blocks, Some(10));
        assert_eq!(merged.extract.output_dir, Some(PathBuf::from("out")));

        let merged = config.with_overrides(Some(3), None).unwrap();
        assert_eq!(merged.walk.max_blocks, Some(3));
        assert!(merged.extract.output_dir.is_none());
    }
}
