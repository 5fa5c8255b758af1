//! Optional `md2opml.toml` settings.
//!
//! Relative `input`/`output` paths in the file are resolved against the
//! directory holding the file, so a config checked in next to a feed list
//! works from any working directory. Keys left out fall back to the built-in
//! defaults, which stay relative to the working directory.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::feed::DEFAULT_TITLE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("`title` in {} must not be empty", .path.display())]
    EmptyTitle { path: PathBuf },
}

/// Resolved conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Markdown document to read.
    pub input: PathBuf,
    /// OPML file to write. Overwritten without confirmation.
    pub output: PathBuf,
    /// Title written to the OPML `<head>`.
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("README.md"),
            output: PathBuf::from("feeds.opml"),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// On-disk shape of the config file. Misspelled keys are an error rather
/// than a silently ignored setting.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    title: Option<String>,
}

impl Config {
    /// Loads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_file(file, path.parent().unwrap_or(Path::new("")))
            .ok_or_else(|| ConfigError::EmptyTitle {
                path: path.to_path_buf(),
            })?;

        tracing::info!(
            path = %path.display(),
            input = %config.input.display(),
            output = %config.output.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Merges file values over the defaults. `None` if the title is blank.
    fn from_file(file: ConfigFile, base: &Path) -> Option<Self> {
        let defaults = Self::default();

        let title = match file.title {
            Some(title) if title.trim().is_empty() => return None,
            Some(title) => title,
            None => defaults.title,
        };

        Some(Self {
            input: file.input.map_or(defaults.input, |p| base.join(p)),
            output: file.output.map_or(defaults.output, |p| base.join(p)),
            title,
        })
    }
}
