use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::domain::Tender;

/// The field results are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Application deadline.
    #[default]
    Deadline,
    /// Upper funding bound.
    FundingMax,
}

/// Ascending or descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Sort field and direction. Defaults to deadline, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Field to order by.
    pub key: SortKey,
    /// Order direction.
    pub direction: SortDirection,
}

impl SortConfig {
    /// Compares two tenders under this configuration.
    ///
    /// Equal keys compare equal so that a stable sort keeps their relative
    /// order. Undated tenders sort after every dated one when ascending.
    #[must_use]
    pub fn compare(self, a: &Tender, b: &Tender) -> Ordering {
        let ordering = match self.key {
            SortKey::Deadline => match (a.deadline, b.deadline) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::FundingMax => a.funding_max.cmp(&b.funding_max),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Returns the tenders ordered by `config`.
///
/// The sort is stable: tenders with equal keys keep their input order, in
/// either direction.
#[must_use]
pub fn sort<'a>(tenders: &[&'a Tender], config: SortConfig) -> Vec<&'a Tender> {
    let mut sorted = tenders.to_vec();
    sorted.sort_by(|a, b| config.compare(a, b));
    sorted
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Deadline => "deadline",
            Self::FundingMax => "funding-max",
        })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}
