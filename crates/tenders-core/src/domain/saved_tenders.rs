use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tender::Tender;

/// Ids of tenders the user marked for later.
///
/// Ids are not checked against the current tender list; a saved id whose
/// tender is gone is simply never shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedTenders(BTreeSet<u32>);

impl SavedTenders {
    /// Adds the id if absent, removes it if present.
    ///
    /// Returns whether the id is saved afterwards.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id)
        }
    }

    /// Whether the id is saved.
    #[must_use]
    pub fn is_saved(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    /// The saved ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Number of saved ids, including ones with no matching tender.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The saved tenders present in `tenders`, in the order of `tenders`.
    #[must_use]
    pub fn resolve<'a>(&self, tenders: &'a [Tender]) -> Vec<&'a Tender> {
        tenders.iter().filter(|t| self.is_saved(t.id)).collect()
    }
}

impl FromIterator<u32> for SavedTenders {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
