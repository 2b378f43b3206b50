use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Workspace configuration.
///
/// Stored as TOML in `.tenders/config.toml` and read once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// JSON file holding the tender list, relative to the workspace root.
    ///
    /// When unset, the built-in fixture is used.
    pub source: Option<PathBuf>,

    /// Whether a failing source falls back to the built-in fixture instead
    /// of failing the load.
    pub fallback_to_fixture: bool,

    /// Page size for a fresh search session.
    items_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            fallback_to_fixture: true,
            items_per_page: default_items_per_page(),
        }
    }
}

/// Failure to read or write the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// The config file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// The configuration could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A page size of zero.
    #[error("items_per_page must be at least 1")]
    ZeroPageSize,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Page size for a fresh search session.
    #[must_use]
    pub const fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Sets the page size for fresh search sessions.
    ///
    /// # Errors
    ///
    /// Rejects a page size of zero.
    pub fn set_items_per_page(&mut self, value: usize) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.items_per_page = value;
        Ok(())
    }
}

const fn default_items_per_page() -> usize {
    10
}

const fn default_fallback() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<PathBuf>,

        #[serde(default = "default_fallback")]
        fallback_to_fixture: bool,

        #[serde(default = "default_items_per_page")]
        items_per_page: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                source,
                fallback_to_fixture,
                items_per_page,
            } => Self {
                source,
                fallback_to_fixture,
                // a hand-edited zero would make every page empty
                items_per_page: items_per_page.max(1),
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            source: config.source,
            fallback_to_fixture: config.fallback_to_fixture,
            items_per_page: config.items_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nsource = \"data/tenders.json\"\nfallback_to_fixture = false\nitems_per_page = 20\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.source, Some(PathBuf::from("data/tenders.json")));
        assert!(!config.fallback_to_fixture);
        assert_eq!(config.items_per_page(), 20);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert_eq!(Config::load_or_default(&missing), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nitems_per_page = \"ten\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("failed to parse config file"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config {
            source: Some(PathBuf::from("tenders.json")),
            ..Config::default()
        };
        config.set_items_per_page(5).unwrap();

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_items_per_page(0),
            Err(ConfigError::ZeroPageSize)
        ));
        assert_eq!(config.items_per_page(), 10);
    }
}
