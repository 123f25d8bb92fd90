use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bundle::DEFAULT_TITLE;

pub const DEFAULT_SOURCE_DIR: &str = "source";
pub const DEFAULT_REQUEST_FILE: &str = "request/site-brief.yaml";
pub const DEFAULT_OUTPUT: &str = "build/context-bundle.md";

/// Optional defaults read from `site-bundler.toml`
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub source_dir: Option<PathBuf>,
    pub request_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
}

impl Config {
    /// Project-local config file name, looked up in the working directory
    pub const LOCAL_FILE: &'static str = "site-bundler.toml";

    /// Get the per-user config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("site-bundler"))
    }

    /// Find the config file to use: an explicit path, then the local file, then the user file
    pub fn discover(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {:?}", path);
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(Self::LOCAL_FILE);
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(Self::config_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists()))
    }

    /// Load config from file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Load the discovered config, or return default if none is found
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match Self::discover(explicit)? {
            Some(path) => Ok((Self::load_from(&path)?, Some(path))),
            None => Ok((Config::default(), None)),
        }
    }

    /// Config with every field set to the built-in default
    pub fn with_defaults() -> Self {
        Self {
            source_dir: Some(PathBuf::from(DEFAULT_SOURCE_DIR)),
            request_file: Some(PathBuf::from(DEFAULT_REQUEST_FILE)),
            output: Some(PathBuf::from(DEFAULT_OUTPUT)),
            title: Some(DEFAULT_TITLE.to_string()),
        }
    }

    /// Write config to `path`, refusing to replace an existing file
    pub fn save_new(&self, path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {:?}", path);
        }

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

/// Paths given on the command line; unset ones fall back to config, then defaults
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub request_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub request_file: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(overrides: Overrides, config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            source_dir: overrides
                .source_dir
                .or(config.source_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            request_file: overrides
                .request_file
                .or(config.request_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REQUEST_FILE)),
            output: overrides
                .output
                .or(config.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            title: config
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            config_path,
        }
    }

    /// Discover and load the config, then apply the command-line overrides
    pub fn load(overrides: Overrides, explicit_config: Option<&Path>) -> Result<Self> {
        let (config, path) = Config::load(explicit_config)?;
        Ok(Self::resolve(overrides, config, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(Overrides::default(), Config::default(), None);
        assert_eq!(settings.source_dir, PathBuf::from("source"));
        assert_eq!(settings.request_file, PathBuf::from("request/site-brief.yaml"));
        assert_eq!(settings.output, PathBuf::from("build/context-bundle.md"));
        assert_eq!(settings.title, "Website Request Bundle");
    }

    #[test]
    fn test_cli_beats_config_beats_default() {
        let config = Config {
            source_dir: Some(PathBuf::from("assets")),
            output: Some(PathBuf::from("out/bundle.md")),
            title: Some("Client Site".to_string()),
            ..Config::default()
        };
        let overrides = Overrides {
            source_dir: Some(PathBuf::from("docs")),
            ..Overrides::default()
        };

        let settings = Settings::resolve(overrides, config, None);
        assert_eq!(settings.source_dir, PathBuf::from("docs"));
        assert_eq!(settings.output, PathBuf::from("out/bundle.md"));
        assert_eq!(settings.request_file, PathBuf::from("request/site-brief.yaml"));
        assert_eq!(settings.title, "Client Site");
    }

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-bundler.toml");
        std::fs::write(
            &path,
            "source_dir = \"material\"\nrequest_file = \"brief.yaml\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.source_dir, Some(PathBuf::from("material")));
        assert_eq!(config.request_file, Some(PathBuf::from("brief.yaml")));
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-bundler.toml");
        std::fs::write(&path, "source_dir = [").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(Config::discover(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_save_new_round_trip_and_no_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("site-bundler.toml");

        Config::with_defaults().save_new(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::with_defaults());
        assert!(Config::default().save_new(&path).is_err());
    }
}
