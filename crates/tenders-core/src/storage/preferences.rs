//! A typed key-value store for user state.
//!
//! Each key is one JSON document under `.tenders/preferences/`, wrapped in a
//! `_version`-tagged envelope. Documents without the tag are read as the
//! legacy shape of that key and rewritten by [`PreferenceStore::migrate`].

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::legacy;
use crate::{
    domain::{Profile, SavedSearches, SavedTenders, Theme},
    session::SearchSession,
};

/// A named slot in the [`PreferenceStore`].
pub trait PreferenceKey {
    /// File stem of the document.
    const NAME: &'static str;

    /// The stored value. Its default stands in for an absent document.
    type Value: Serialize + DeserializeOwned + Default;

    /// The unversioned shape this key had before the envelope existed.
    type Legacy: DeserializeOwned + Into<Self::Value>;
}

/// Ids of saved tenders.
#[derive(Debug)]
pub struct SavedTendersKey;

impl PreferenceKey for SavedTendersKey {
    const NAME: &'static str = "savedTenders";
    type Value = SavedTenders;
    type Legacy = legacy::SavedTenderIds;
}

/// Saved searches.
#[derive(Debug)]
pub struct SavedSearchesKey;

impl PreferenceKey for SavedSearchesKey {
    const NAME: &'static str = "savedSearches";
    type Value = SavedSearches;
    type Legacy = legacy::LegacySavedSearches;
}

/// The company profile.
#[derive(Debug)]
pub struct ProfileKey;

impl PreferenceKey for ProfileKey {
    const NAME: &'static str = "userProfile";
    type Value = Profile;
    type Legacy = legacy::LegacyProfile;
}

/// Filters, sort order, paging and selection of the search view.
#[derive(Debug)]
pub struct SearchStateKey;

impl PreferenceKey for SearchStateKey {
    const NAME: &'static str = "searchPageState";
    type Value = SearchSession;
    type Legacy = legacy::SearchPageState;
}

/// Colour scheme.
#[derive(Debug)]
pub struct ThemeKey;

impl PreferenceKey for ThemeKey {
    const NAME: &'static str = "theme";
    type Value = Theme;
    type Legacy = Theme;
}

/// Failure to read or write a preference document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document could not be read or written.
    #[error("failed to access preference file {}: {source}", path.display())]
    Io {
        /// The document.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is neither a current nor a legacy value for its key.
    #[error("failed to parse preference '{key}': {source}")]
    Parse {
        /// Key name.
        key: &'static str,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The value could not be rendered as JSON.
    #[error("failed to serialize preference '{key}': {source}")]
    Serialize {
        /// Key name.
        key: &'static str,
        /// Underlying error.
        source: serde_json::Error,
    },
}

const VERSION_TAG: &str = "_version";

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions<T> {
    #[serde(rename = "1")]
    V1 { value: T },
}

enum Decoded<T> {
    Current(T),
    Legacy(T),
}

fn decode<K: PreferenceKey>(content: &str) -> Result<Decoded<K::Value>, serde_json::Error> {
    let document: serde_json::Value = serde_json::from_str(content)?;
    if document.get(VERSION_TAG).is_some() {
        match serde_json::from_value(document)? {
            Versions::V1 { value } => Ok(Decoded::Current(value)),
        }
    } else {
        let legacy: K::Legacy = serde_json::from_value(document)?;
        Ok(Decoded::Legacy(legacy.into()))
    }
}

/// JSON documents in a single directory, one per [`PreferenceKey`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    /// A store keeping its documents in `dir`. Nothing is touched until the
    /// first write.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path<K: PreferenceKey>(&self) -> PathBuf {
        self.dir.join(format!("{}.json", K::NAME))
    }

    fn read<K: PreferenceKey>(&self) -> Result<Option<Decoded<K::Value>>, StoreError> {
        let path = self.path::<K>();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        decode::<K>(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                key: K::NAME,
                source,
            })
    }

    /// Reads a value, or `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub fn load<K: PreferenceKey>(&self) -> Result<Option<K::Value>, StoreError> {
        Ok(self.read::<K>()?.map(|decoded| match decoded {
            Decoded::Current(value) | Decoded::Legacy(value) => value,
        }))
    }

    /// Reads a value, falling back to its default when absent or unreadable.
    #[must_use]
    pub fn get<K: PreferenceKey>(&self) -> K::Value {
        self.load::<K>()
            .unwrap_or_else(|e| {
                tracing::warn!("{e}; using the default");
                None
            })
            .unwrap_or_default()
    }

    /// Replaces the stored value.
    ///
    /// The document is written next to its final location and renamed into
    /// place, so readers never see a partial write.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized or the document
    /// cannot be written.
    pub fn set<K: PreferenceKey>(&self, value: &K::Value) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&Versions::V1 { value }).map_err(|source| {
            StoreError::Serialize {
                key: K::NAME,
                source,
            }
        })?;
        let io = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };

        std::fs::create_dir_all(&self.dir).map_err(io(&self.dir))?;
        let path = self.path::<K>();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io(&path))?;
        tracing::debug!("wrote preference '{}'", K::NAME);
        Ok(())
    }

    /// Reads a value, lets `f` modify it and writes it back.
    ///
    /// An unreadable document is left untouched and `f` is not called.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored document cannot be read or parsed, or
    /// if the modified value cannot be written.
    pub fn update<K, R>(&self, f: impl FnOnce(&mut K::Value) -> R) -> Result<R, StoreError>
    where
        K: PreferenceKey,
    {
        let mut value = self.load::<K>()?.unwrap_or_default();
        let result = f(&mut value);
        self.set::<K>(&value)?;
        Ok(result)
    }

    fn migrate_key<K: PreferenceKey>(&self) -> Result<bool, StoreError> {
        match self.read::<K>()? {
            Some(Decoded::Legacy(value)) => {
                self.set::<K>(&value)?;
                tracing::info!("migrated preference '{}' to the current format", K::NAME);
                Ok(true)
            }
            Some(Decoded::Current(_)) | None => Ok(false),
        }
    }

    /// Rewrites every legacy document in the current format.
    ///
    /// Documents that cannot be read are left alone and reported as a
    /// warning. Returns the names of the keys that were rewritten.
    pub fn migrate(&self) -> Vec<&'static str> {
        [
            (SavedTendersKey::NAME, self.migrate_key::<SavedTendersKey>()),
            (SavedSearchesKey::NAME, self.migrate_key::<SavedSearchesKey>()),
            (ProfileKey::NAME, self.migrate_key::<ProfileKey>()),
            (SearchStateKey::NAME, self.migrate_key::<SearchStateKey>()),
            (ThemeKey::NAME, self.migrate_key::<ThemeKey>()),
        ]
        .into_iter()
        .filter_map(|(name, outcome)| match outcome {
            Ok(migrated) => migrated.then_some(name),
            Err(e) => {
                tracing::warn!("not migrating '{name}': {e}");
                None
            }
        })
        .collect()
    }
}
