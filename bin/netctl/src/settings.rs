use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "netctl.toml";

/// Top-level netctl settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// JSON-RPC endpoint of the wallet used by `switch`
    #[serde(default)]
    pub wallet_url: Option<String>,

    /// Network table replacing the built-in one
    #[serde(default)]
    pub networks: Option<PathBuf>,
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Load an explicit config file, or `netctl.toml` if it exists.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }
}
