//! Public tender discovery
//!
//! Tenders are loaded from a [`TenderSource`], narrowed by
//! [`FilterCriteria`], ordered, paged and summarised. User state (saved
//! tenders, saved searches, the company profile and the search session) lives
//! in a versioned [`PreferenceStore`].

pub mod chat;
pub mod deep_link;
pub mod domain;
pub mod engine;
/// Tender sources, the preference store and the workspace that ties them
/// together.
pub mod storage;

mod session;

pub use deep_link::DeepLink;
pub use domain::{
    Category, Config, FilterCriteria, FundingType, Profile, SavedSearch, SavedSearches,
    SavedTenders, Tender, Theme,
};
pub use session::{SearchResults, SearchSession};
pub use storage::{PreferenceStore, TenderSource, Workspace};
