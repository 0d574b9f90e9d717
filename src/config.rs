//! Container settings, read from TOML.
//!
//! Settings live under a `[container]` table. Without one, the top-level
//! `max_depth` and `detect_cycles` keys are read instead. Other top-level
//! keys and tables belong to the application and are left alone, so the
//! container can share a config file. Several files can be layered with
//! [`ContainerConfig::load_layered`]:
//!
//! ```
//! use wireup::ContainerConfig;
//!
//! let config = ContainerConfig::from_toml_str(r#"
//!     [container]
//!     max_depth = 16
//! "#).unwrap();
//!
//! assert_eq!(config.max_depth, 16);
//! assert!(config.detect_cycles);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value};

const SECTION: &str = "container";
const SETTINGS: [&str; 2] = ["max_depth", "detect_cycles"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid container setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Deepest dependency chain a compile may walk.
    pub max_depth: usize,
    pub detect_cycles: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfig {
            max_depth: 128,
            detect_cycles: true,
        }
    }
}

impl ContainerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let table: Table = toml::from_str(s)?;
        Self::from_table(table)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_table(read_table(path.as_ref())?)
    }

    /// Merge every file in `paths` that exists, later files winning, and
    /// build a config from the result. Missing files are skipped, so with no
    /// files at all this yields the defaults.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut merged = Value::Table(Table::new());
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                tracing::debug!(path = %path.display(), "skipping missing config layer");
                continue;
            }
            let layer = Value::Table(read_table(path)?);
            merged = merge_values(&merged, &layer);
        }
        match merged {
            Value::Table(table) => Self::from_table(table),
            _ => Ok(Self::default()),
        }
    }

    fn from_table(mut table: Table) -> Result<Self, ConfigError> {
        let section = match table.remove(SECTION) {
            Some(Value::Table(section)) => {
                if let Some(key) = SETTINGS.iter().find(|key| table.contains_key(**key)) {
                    return Err(ConfigError::Invalid(format!(
                        "`{key}` is set both at the top level and in `[{SECTION}]`"
                    )));
                }
                section
            }
            Some(other) => {
                return Err(ConfigError::Invalid(format!(
                    "`{SECTION}` must be a table, found {}",
                    other.type_str()
                )))
            }
            None => table
                .into_iter()
                .filter(|(key, _)| SETTINGS.contains(&key.as_str()))
                .collect(),
        };
        let config = Value::Table(section).try_into::<ContainerConfig>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Tables merge key by key; any other value from `b` replaces the one in `a`.
fn merge_values(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Table(a_map), Value::Table(b_map)) => {
            let mut result = a_map.clone();
            for (k, v) in b_map {
                let merged = match result.get(k) {
                    Some(existing) => merge_values(existing, v),
                    None => v.clone(),
                };
                result.insert(k.clone(), merged);
            }
            Value::Table(result)
        }
        _ => b.clone(),
    }
}
