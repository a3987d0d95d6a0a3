//! Pharos configuration.
//!
//! Typed settings for the extract-variable engine, deserialized from TOML.
//! Loading is strict about shape (serde) and validates semantic constraints
//! afterwards, so callers either get a usable [`RefactorConfig`] or a
//! [`ConfigError`] naming the offending key.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Casing style applied when joining inferred name fragments into an
/// identifier.
///
/// The serialized spellings are the literal style names users know them by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingStyle {
    #[default]
    #[serde(rename = "lowerCamelCase")]
    LowerCamelCase,
    #[serde(rename = "CamelCase")]
    CamelCase,
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Casing style for synthesized variable names.
    #[serde(default)]
    pub style: NamingStyle,

    /// How many trailing fragments of the inferred sequence make it into the
    /// final identifier. Long getter chains are truncated to this many
    /// segments. Must be at least 1.
    #[serde(default = "NamingConfig::default_pieces")]
    pub pieces: usize,
}

impl NamingConfig {
    fn default_pieces() -> usize {
        2
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            style: NamingStyle::default(),
            pieces: Self::default_pieces(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Line ending used for inserted declaration lines.
    ///
    /// When unset, the engine matches the document's existing line endings
    /// (falling back to `"\n"` for documents without any line break).
    #[serde(default)]
    pub newline: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Logging level for all Pharos crates.
    ///
    /// Either a simple level (`info`, `debug`, ...) or a full
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// Create the effective `EnvFilter` for Pharos tracing.
    ///
    /// If `RUST_LOG` is set, it is merged into (and takes precedence over) the
    /// configured directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let config_directives = {
            let trimmed = self.level.trim();
            if trimmed.is_empty() {
                Self::default_level()
            } else {
                trimmed.to_owned()
            }
        };

        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let directives = match env_directives {
            Some(env_directives) => format!("{config_directives},{env_directives}"),
            None => config_directives,
        };

        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// Install a process-global stderr subscriber honoring `logging.level`.
///
/// Does nothing when a subscriber is already installed (tests, embedding
/// hosts that own their own logging).
pub fn init_tracing(config: &LoggingConfig) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed, keeping it");
    }
}

/// Root configuration for the extract-variable engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefactorConfig {
    pub naming: NamingConfig,
    pub editor: EditorConfig,
    pub logging: LoggingConfig,
}

impl RefactorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.pieces == 0 {
            return Err(ConfigError::InvalidValue {
                key: "naming.pieces",
                message: "must be at least 1".to_owned(),
            });
        }

        if let Some(newline) = self.editor.newline.as_deref() {
            if newline != "\n" && newline != "\r\n" {
                return Err(ConfigError::InvalidValue {
                    key: "editor.newline",
                    message: format!("expected \"\\n\" or \"\\r\\n\", got {newline:?}"),
                });
            }
        }

        Ok(())
    }
}
