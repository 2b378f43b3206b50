//! The on-disk home of a user's tender search state.
//!
//! ```text
//! <root>/.tenders/
//!     config.toml
//!     preferences/<key>.json
//! ```

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use super::{from_config, PreferenceStore, SearchStateKey, SourceError, StoreError};
use crate::{
    domain::{Config, ConfigError, Tender},
    session::SearchSession,
};

/// Name of the state directory under the workspace root.
pub const STATE_DIR: &str = ".tenders";

/// A workspace root with its configuration and preference store.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
    preferences: PreferenceStore,
}

impl Workspace {
    /// Opens the workspace at `root`.
    ///
    /// A missing configuration file means defaults. Legacy preference
    /// documents are migrated to the current format.
    #[must_use]
    pub fn open(root: PathBuf) -> Self {
        let config = Config::load_or_default(&config_path(&root));
        let preferences = PreferenceStore::new(root.join(STATE_DIR).join("preferences"));
        let migrated = preferences.migrate();
        if !migrated.is_empty() {
            tracing::info!("migrated preferences: {}", migrated.join(", "));
        }
        Self {
            root,
            config,
            preferences,
        }
    }

    /// Creates the state directory and a default configuration file.
    ///
    /// An existing configuration is left untouched. Returns whether a new
    /// configuration file was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn init(root: &Path) -> Result<bool, ConfigError> {
        let dir = root.join(STATE_DIR);
        std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
        let path = config_path(root);
        if path.exists() {
            return Ok(false);
        }
        Config::default().save(&path)?;
        tracing::debug!("wrote default config to {}", path.display());
        Ok(true)
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Location of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        config_path(&self.root)
    }

    /// The preference store.
    #[must_use]
    pub const fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Loads the tender list from the configured source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails and no fallback is configured.
    pub fn load_tenders(&self) -> Result<Vec<Tender>, SourceError> {
        let source = from_config(&self.root, &self.config);
        tracing::debug!("loading tenders from {}", source.describe());
        source.fetch()
    }

    /// The stored search session, or a fresh one sized by the configuration.
    ///
    /// An unreadable session document is logged and replaced by a fresh
    /// session in memory. Use [`Self::load_session`] before writing back.
    #[must_use]
    pub fn session(&self) -> SearchSession {
        self.load_session().unwrap_or_else(|e| {
            tracing::warn!("{e}; starting a fresh search session");
            SearchSession::new(self.default_page_size())
        })
    }

    /// The stored search session, or a fresh one when none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored session cannot be read or parsed.
    pub fn load_session(&self) -> Result<SearchSession, StoreError> {
        Ok(self
            .preferences
            .load::<SearchStateKey>()?
            .unwrap_or_else(|| SearchSession::new(self.default_page_size())))
    }

    fn default_page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.config.items_per_page()).unwrap_or(NonZeroUsize::MIN)
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ThemeKey;

    #[test]
    fn init_writes_config_once() {
        let tmp = tempfile::tempdir().unwrap();

        assert!(Workspace::init(tmp.path()).unwrap());
        assert!(!Workspace::init(tmp.path()).unwrap());

        let workspace = Workspace::open(tmp.path().to_path_buf());
        assert_eq!(workspace.config(), &Config::default());
        assert!(workspace.config_path().exists());
    }

    #[test]
    fn fresh_session_uses_configured_page_size() {
        let tmp = tempfile::tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();
        let path = tmp.path().join(STATE_DIR).join("config.toml");
        let mut config = Config::load(&path).unwrap();
        config.set_items_per_page(3).unwrap();
        config.save(&path).unwrap();

        let session = Workspace::open(tmp.path().to_path_buf()).session();

        assert_eq!(session.page().items_per_page().get(), 3);
    }

    #[test]
    fn open_migrates_legacy_preferences() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(STATE_DIR).join("preferences");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("theme.json"), "\"dark\"").unwrap();

        let workspace = Workspace::open(tmp.path().to_path_buf());

        let raw = std::fs::read_to_string(dir.join("theme.json")).unwrap();
        assert!(raw.contains("_version"));
        assert_eq!(
            workspace.preferences().get::<ThemeKey>(),
            crate::domain::Theme::Dark
        );
    }

    #[test]
    fn unreadable_session_is_reported_by_load_session() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(STATE_DIR).join("preferences");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("searchPageState.json"), "42").unwrap();

        let workspace = Workspace::open(tmp.path().to_path_buf());

        assert!(workspace.load_session().is_err());
        assert_eq!(workspace.session(), SearchSession::new(NonZeroUsize::new(10).unwrap()));
    }

    #[test]
    fn load_tenders_without_source_uses_the_fixture() {
        let tmp = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());
        assert_eq!(workspace.load_tenders().unwrap().len(), 8);
    }
}
