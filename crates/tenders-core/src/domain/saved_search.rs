//! Named, persisted snapshots of filter criteria.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::criteria::FilterCriteria;

/// How often notifications for a saved search are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Once a week.
    #[default]
    Weekly,
    /// Once a month.
    Monthly,
}

/// Notification preferences attached to a saved search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Whether notifications are sent at all.
    pub enabled: bool,
    /// Delivery cadence.
    pub frequency: Frequency,
    /// Whether application tips are appended to each notification.
    pub include_tips: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: Frequency::Weekly,
            include_tips: true,
        }
    }
}

/// A named snapshot of filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    /// Opaque, unique identifier. Also used in deep links.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The criteria captured when the search was saved or last edited.
    pub filters: FilterCriteria,
    /// Notification preferences.
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

/// The collection of saved searches, in creation order.
///
/// Updates addressed to an id that is not present are no-ops; each returns
/// whether anything changed so callers can report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedSearches(Vec<SavedSearch>);

impl SavedSearches {
    /// Saves a snapshot under a fresh id with default notification settings.
    ///
    /// The name is stored as given; rejecting blank names is the caller's
    /// job.
    pub fn create(&mut self, name: impl Into<String>, filters: FilterCriteria) -> &SavedSearch {
        let search = SavedSearch {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            filters,
            notification_settings: NotificationSettings::default(),
        };
        tracing::debug!(id = %search.id, name = %search.name, "created saved search");
        self.0.push(search);
        let last = self.0.len() - 1;
        &self.0[last]
    }

    /// Renames a saved search.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.get_mut(id).map(|search| search.name = name.into()).is_some()
    }

    /// Replaces the filter snapshot of a saved search.
    pub fn update_filters(&mut self, id: &str, filters: FilterCriteria) -> bool {
        self.get_mut(id).map(|search| search.filters = filters).is_some()
    }

    /// Replaces the notification settings of a saved search.
    pub fn update_notifications(&mut self, id: &str, settings: NotificationSettings) -> bool {
        self.get_mut(id)
            .map(|search| search.notification_settings = settings)
            .is_some()
    }

    /// Removes a saved search. Deleting an unknown id does nothing.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|search| search.id != id);
        before != self.0.len()
    }

    /// Returns the stored snapshot so it can be re-applied as the active
    /// filters.
    #[must_use]
    pub fn load_as_active_filters(&self, id: &str) -> Option<FilterCriteria> {
        self.get(id).map(|search| search.filters.clone())
    }

    /// Looks up a saved search by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SavedSearch> {
        self.0.iter().find(|search| search.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut SavedSearch> {
        self.0.iter_mut().find(|search| search.id == id)
    }

    /// Iterates in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SavedSearch> {
        self.0.iter()
    }

    /// Number of saved searches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no saved searches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SavedSearch>> for SavedSearches {
    fn from(searches: Vec<SavedSearch>) -> Self {
        Self(searches)
    }
}

impl<'a> IntoIterator for &'a SavedSearches {
    type Item = &'a SavedSearch;
    type IntoIter = std::slice::Iter<'a, SavedSearch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
