mod legacy;
/// Versioned, per-key JSON documents for user state.
pub mod preferences;
mod source;
mod workspace;

pub use preferences::{
    PreferenceKey, PreferenceStore, ProfileKey, SavedSearchesKey, SavedTendersKey,
    SearchStateKey, StoreError, ThemeKey,
};
pub use source::{from_config, JsonFileSource, SourceError, StaticFixture, TenderSource, WithFallback};
pub use workspace::{Workspace, STATE_DIR};
