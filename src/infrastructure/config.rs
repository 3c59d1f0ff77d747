//! Configuration loading.
//!
//! Optional `pysift.toml`; every field has a default so a missing file or a
//! partial file is fine.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pysift.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub scan: ScanConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Pretty-print analysis output.
    pub pretty: bool,
    /// Spaces per indent level when pretty-printing.
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names skipped while collecting files.
    pub exclude: Vec<String>,
    /// Batch worker threads; 0 picks automatically.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: [".git", "__pycache__", ".venv", "venv", "node_modules"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 7878 }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid pysift configuration")
    }

    /// Load `explicit` if given (it must exist), else `./pysift.toml` if present,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("In config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml("[output]\npretty = false\n").unwrap();
        assert!(!config.output.pretty);
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.scan, ScanConfig::default());
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
[output]
pretty = true
indent = 2

[scan]
exclude = ["build"]
workers = 3

[server]
port = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.output.indent, 2);
        assert_eq!(config.scan.exclude, vec!["build".to_string()]);
        assert_eq!(config.scan.workers, 3);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml("[output]\ncolour = true\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/pysift.toml"))).unwrap_err();
        assert!(err.to_string().contains("Cannot read config"));
    }
}
