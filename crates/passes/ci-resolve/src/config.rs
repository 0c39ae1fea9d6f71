//! Resolver options

use miette::Diagnostic;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::de;

/// Knobs for a resolution run
///
/// Every field has a default, so an empty TOML document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveOptions {
    /// Most "did you mean" names attached to an unresolved identifier
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Largest edit distance at which a visible name is still suggested
    #[serde(default = "default_max_suggestion_distance")]
    pub max_suggestion_distance: usize,
    /// Errors kept before the rest are dropped; `0` keeps all of them
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
    /// Whether switch structure is checked after binding
    #[serde(default = "default_validate_switches")]
    pub validate_switches: bool,
}

const fn default_max_suggestions() -> usize {
    3
}

const fn default_max_suggestion_distance() -> usize {
    3
}

const fn default_max_errors() -> usize {
    100
}

const fn default_validate_switches() -> bool {
    true
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            max_suggestion_distance: default_max_suggestion_distance(),
            max_errors: default_max_errors(),
            validate_switches: default_validate_switches(),
        }
    }
}

impl ResolveOptions {
    /// Parses options from a flat TOML table
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML, a mistyped value or
    /// an unknown key.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads options from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the errors of [`ResolveOptions::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Whether `count` collected errors already fill the limit
    pub const fn error_limit_reached(&self, count: usize) -> bool {
        self.max_errors != 0 && count >= self.max_errors
    }
}

/// Failure to load [`ResolveOptions`]
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// The options file could not be read
    #[error("cannot read resolver options from {}", .path.display())]
    #[diagnostic(code(resolve::config::read))]
    Read {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// The options document is not valid
    #[error("invalid resolver options: {0}")]
    #[diagnostic(code(resolve::config::parse))]
    Parse(#[from] de::Error),
}
