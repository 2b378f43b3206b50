//! Where the tender list comes from.
//!
//! A source either yields a complete, validated list or fails; callers never
//! see a partial list.

use std::path::{Path, PathBuf};

use crate::domain::{tender, Config, InvalidTender, Tender};

/// Supplies the full tender list.
pub trait TenderSource {
    /// Loads every tender.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read, parsed, or fails
    /// validation.
    fn fetch(&self) -> Result<Vec<Tender>, SourceError>;

    /// Short description used in log messages.
    fn describe(&self) -> String;
}

/// Failure to load a tender list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("failed to read tender list {}: {source}", path.display())]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The content is not a tender list.
    #[error("failed to parse tender list {origin}: {source}")]
    Parse {
        /// Where the content came from.
        origin: String,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The list parsed but breaks an invariant.
    #[error("invalid tender list: {0}")]
    Invalid(#[from] InvalidTender),
}

fn parse(origin: &str, json: &str) -> Result<Vec<Tender>, SourceError> {
    let tenders: Vec<Tender> =
        serde_json::from_str(json).map_err(|source| SourceError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    tender::validate(&tenders)?;
    tracing::debug!("loaded {} tenders from {origin}", tenders.len());
    Ok(tenders)
}

/// A JSON array of tenders on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// A source reading the given file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TenderSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Tender>, SourceError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse(&self.describe(), &json)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// The built-in demonstration list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFixture;

impl TenderSource for StaticFixture {
    fn fetch(&self) -> Result<Vec<Tender>, SourceError> {
        parse(&self.describe(), include_str!("fixture.json"))
    }

    fn describe(&self) -> String {
        "built-in fixture".to_string()
    }
}

/// Tries `primary` and falls back to the [`StaticFixture`] if it fails.
#[derive(Debug, Clone)]
pub struct WithFallback<S> {
    primary: S,
}

impl<S> WithFallback<S> {
    /// Wraps `primary` with the fixture fallback.
    pub const fn new(primary: S) -> Self {
        Self { primary }
    }
}

impl<S: TenderSource> TenderSource for WithFallback<S> {
    fn fetch(&self) -> Result<Vec<Tender>, SourceError> {
        self.primary.fetch().or_else(|e| {
            tracing::warn!("{e}; falling back to the built-in fixture");
            StaticFixture.fetch()
        })
    }

    fn describe(&self) -> String {
        format!("{} (with fixture fallback)", self.primary.describe())
    }
}

/// Builds the source described by the configuration.
///
/// Relative source paths are resolved against `root`.
#[must_use]
pub fn from_config(root: &Path, config: &Config) -> Box<dyn TenderSource> {
    match &config.source {
        None => Box::new(StaticFixture),
        Some(path) => {
            let file = JsonFileSource::new(root.join(path));
            if config.fallback_to_fixture {
                Box::new(WithFallback::new(file))
            } else {
                Box::new(file)
            }
        }
    }
}
