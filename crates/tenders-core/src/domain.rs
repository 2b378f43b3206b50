//! Domain models for tender discovery.
//!
//! Tenders themselves, the criteria used to filter them, and the user state
//! that outlives a session: saved searches, saved tenders, the company
//! profile and configuration.

mod config;
pub use config::{Config, ConfigError};

/// Filter criteria and boundary parsing.
pub mod criteria;
pub use criteria::{CriteriaError, FilterCriteria};

mod profile;
pub use profile::{Profile, Theme};

pub mod saved_search;
pub use saved_search::{Frequency, NotificationSettings, SavedSearch, SavedSearches};

mod saved_tenders;
pub use saved_tenders::SavedTenders;

/// Tender records and their classification enums.
pub mod tender;
pub use tender::{Category, FundingType, InvalidTender, Tender};
