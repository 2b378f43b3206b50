use std::collections::BTreeSet;

use crate::domain::{FilterCriteria, Tender};

/// The tenders that satisfy every constrained dimension of `criteria`, in
/// input order.
#[must_use]
pub fn filter<'a>(tenders: &'a [Tender], criteria: &FilterCriteria) -> Vec<&'a Tender> {
    tenders.iter().filter(|t| criteria.matches(t)).collect()
}

/// Distinct, non-empty institution names, sorted.
///
/// These are the values offered for the institution filter.
#[must_use]
pub fn institutions(tenders: &[Tender]) -> Vec<&str> {
    distinct_sorted(tenders.iter().map(|t| t.institution.as_str()))
}

/// Distinct, non-empty eligible applicant types across all tenders, sorted.
#[must_use]
pub fn eligible_entities(tenders: &[Tender]) -> Vec<&str> {
    distinct_sorted(
        tenders
            .iter()
            .flat_map(|t| t.eligible_entities.iter().map(String::as_str)),
    )
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    values
        .filter(|value| !value.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
