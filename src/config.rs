//! Configuration for listql
//!
//! Handles loading `listql.toml`: database credentials plus list defaults.

use std::path::{Path, PathBuf};

use listql_core::EvaluateOptions;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "listql.toml";

const DEFAULT_PORT: u16 = 5432;

// ============================================================================
// Sections
// ============================================================================

/// `[database]`: a connection URL, or discrete host parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub sslmode: Option<String>,
    /// Server-side bound on each statement, applied on connect
    pub statement_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    /// Connection string for the `postgres` driver. A URL wins over host
    /// parameters.
    pub fn connection_string(&self) -> String {
        if let Some(ref url) = self.url {
            return url.clone();
        }
        let mut s = format!(
            "host={} port={}",
            self.host.as_deref().unwrap_or("localhost"),
            self.port.unwrap_or(DEFAULT_PORT)
        );
        for (key, value) in [
            ("user", &self.user),
            ("password", &self.password),
            ("dbname", &self.dbname),
            ("sslmode", &self.sslmode),
        ] {
            if let Some(value) = value {
                s.push_str(&format!(" {key}={}", quote_param(value)));
            }
        }
        s
    }
}

/// Quote a key/value connection parameter when it holds spaces or quotes.
fn quote_param(value: &str) -> String {
    if !value.is_empty() && !value.contains([' ', '\'', '\\']) {
        return value.to_owned();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// `[list]`: defaults applied to every evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListConfig {
    /// Absent means unpaged
    pub default_page_size: Option<u64>,
}

impl ListConfig {
    /// Fresh options carrying the configured page size.
    pub fn evaluate_options(&self) -> EvaluateOptions {
        EvaluateOptions {
            page_size: self.default_page_size,
            ..EvaluateOptions::default()
        }
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub list: ListConfig,
}

impl Config {
    /// Load from default config file
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(ref db) = self.database
            && db.url.is_none()
            && db.host.is_none()
        {
            return Err(Error::Invalid(
                "[database] needs either `url` or `host`".into(),
            ));
        }
        if self.list.default_page_size == Some(0) {
            return Err(Error::Invalid(
                "[list] default_page_size must be positive; omit it for unpaged lists".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================
