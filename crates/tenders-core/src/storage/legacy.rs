//! Unversioned preference documents written by the browser client.
//!
//! That client kept each key as a bare camelCase JSON value, used the string
//! `"all"` for an unconstrained choice and `""` for an unset date. These
//! shapes are only ever read; everything written back is current.

use std::{fmt, num::NonZeroUsize};

use serde::Deserialize;

use crate::{
    domain::{
        criteria::parse_date_bound, FilterCriteria, Frequency, NotificationSettings, Profile,
        SavedSearch, SavedSearches, SavedTenders,
    },
    engine::{PageState, SortConfig},
    session::SearchSession,
};

/// Saved tender ids, as a plain array.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct SavedTenderIds(Vec<u32>);

impl From<SavedTenderIds> for SavedTenders {
    fn from(legacy: SavedTenderIds) -> Self {
        legacy.0.into_iter().collect()
    }
}

/// A filter state with sentinel strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FilterState {
    keyword: String,
    funding_type: String,
    category: String,
    institution: String,
    eligible_entity: String,
    deadline_start: String,
    deadline_end: String,
    min_funding: u64,
    max_funding: u64,
}

/// A legacy value that has no current equivalent.
#[derive(Debug)]
pub struct LegacyError(String);

impl fmt::Display for LegacyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `"all"` and blank both mean "no constraint".
fn choice(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "all" {
        None
    } else {
        Some(value)
    }
}

fn parse_choice<T>(value: String) -> Result<Option<T>, LegacyError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    choice(value)
        .map(|v| v.parse().map_err(|e: T::Err| LegacyError(e.to_string())))
        .transpose()
}

impl TryFrom<FilterState> for FilterCriteria {
    type Error = LegacyError;

    fn try_from(state: FilterState) -> Result<Self, Self::Error> {
        let date = |s: &str| parse_date_bound(s).map_err(|e| LegacyError(e.to_string()));
        Ok(Self {
            keyword: state.keyword,
            funding_type: parse_choice(state.funding_type)?,
            category: parse_choice(state.category)?,
            institution: choice(state.institution),
            eligible_entity: choice(state.eligible_entity),
            deadline_start: date(&state.deadline_start)?,
            deadline_end: date(&state.deadline_end)?,
            min_funding: Some(state.min_funding).filter(|&v| v > 0),
            max_funding: Some(state.max_funding).filter(|&v| v > 0),
        })
    }
}

/// Filter criteria decoded from a legacy filter state.
#[derive(Debug, Default, Deserialize)]
#[serde(try_from = "FilterState")]
struct Filters(FilterCriteria);

impl TryFrom<FilterState> for Filters {
    type Error = LegacyError;

    fn try_from(state: FilterState) -> Result<Self, Self::Error> {
        FilterCriteria::try_from(state).map(Self)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Notifications {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default = "yes")]
    include_tips: bool,
}

const fn yes() -> bool {
    true
}

impl From<Notifications> for NotificationSettings {
    fn from(legacy: Notifications) -> Self {
        Self {
            enabled: legacy.enabled,
            frequency: legacy.frequency,
            include_tips: legacy.include_tips,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySavedSearch {
    id: String,
    name: String,
    #[serde(default)]
    filters: Filters,
    notification_settings: Option<Notifications>,
}

/// Saved searches in the browser client's shape.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct LegacySavedSearches(Vec<LegacySavedSearch>);

impl From<LegacySavedSearches> for SavedSearches {
    fn from(legacy: LegacySavedSearches) -> Self {
        legacy
            .0
            .into_iter()
            .map(|search| SavedSearch {
                id: search.id,
                name: search.name,
                filters: search.filters.0,
                notification_settings: search
                    .notification_settings
                    .map(Into::into)
                    .unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

/// The company profile with camelCase field names.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyProfile {
    company_name: String,
    industry: String,
    company_size: String,
    main_goals: String,
    project_description: String,
}

impl From<LegacyProfile> for Profile {
    fn from(legacy: LegacyProfile) -> Self {
        Self {
            company_name: legacy.company_name,
            industry: legacy.industry,
            company_size: legacy.company_size,
            main_goals: legacy.main_goals,
            project_description: legacy.project_description,
        }
    }
}

/// The search page state.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchPageState {
    selected_tender_id: Option<u32>,
    filters: Filters,
    active_filters: Filters,
    sort_config: SortConfig,
    current_page: usize,
    items_per_page: usize,
}

impl Default for SearchPageState {
    fn default() -> Self {
        Self {
            selected_tender_id: None,
            filters: Filters::default(),
            active_filters: Filters::default(),
            sort_config: SortConfig::default(),
            current_page: 1,
            items_per_page: 10,
        }
    }
}

impl From<SearchPageState> for SearchSession {
    fn from(legacy: SearchPageState) -> Self {
        let nz = |n: usize| NonZeroUsize::new(n).unwrap_or(NonZeroUsize::MIN);
        let mut page = PageState::new(nz(legacy.items_per_page));
        page.go_to(nz(legacy.current_page));
        Self {
            selected_tender: legacy.selected_tender_id,
            draft: legacy.filters.0,
            active: legacy.active_filters.0,
            sort: legacy.sort_config,
            page,
        }
    }
}
