use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tender::{parse_date, Category, FundingType, Tender};

/// Filter criteria for a tender search.
///
/// Every dimension is optional; `None` leaves it unconstrained. A tender
/// matches when it satisfies every constrained dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against title and summary.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
    /// Exact funding type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_type: Option<FundingType>,
    /// Exact category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Exact funding body name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    /// Applicant type that must be listed as eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible_entity: Option<String>,
    /// Earliest accepted deadline (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_start: Option<NaiveDate>,
    /// Latest accepted deadline (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_end: Option<NaiveDate>,
    /// Stored with snapshots but not applied when matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_funding: Option<u64>,
    /// Stored with snapshots but not applied when matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_funding: Option<u64>,
}

/// Rejected filter input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CriteriaError {
    /// A non-empty date bound that is not a calendar date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Parses a date bound as typed by a user.
///
/// An empty (or blank) string means "no bound".
///
/// # Errors
///
/// Returns [`CriteriaError::InvalidDate`] for any other string that is not a
/// calendar date.
pub fn parse_date_bound(input: &str) -> Result<Option<NaiveDate>, CriteriaError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input)
        .map(Some)
        .ok_or_else(|| CriteriaError::InvalidDate(input.to_string()))
}

impl FilterCriteria {
    /// Sets the lower deadline bound from user input.
    ///
    /// # Errors
    ///
    /// See [`parse_date_bound`]. The criteria are unchanged on error.
    pub fn set_deadline_start(&mut self, input: &str) -> Result<(), CriteriaError> {
        self.deadline_start = parse_date_bound(input)?;
        Ok(())
    }

    /// Sets the upper deadline bound from user input.
    ///
    /// # Errors
    ///
    /// See [`parse_date_bound`]. The criteria are unchanged on error.
    pub fn set_deadline_end(&mut self, input: &str) -> Result<(), CriteriaError> {
        self.deadline_end = parse_date_bound(input)?;
        Ok(())
    }

    /// Whether no dimension is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.keyword.is_empty()
            && self.funding_type.is_none()
            && self.category.is_none()
            && self.institution.is_none()
            && self.eligible_entity.is_none()
            && self.deadline_start.is_none()
            && self.deadline_end.is_none()
    }

    /// Tests a single tender against every constrained dimension.
    #[must_use]
    pub fn matches(&self, tender: &Tender) -> bool {
        self.matches_keyword(tender)
            && self.funding_type.is_none_or(|t| t == tender.funding_type)
            && self.category.is_none_or(|c| c == tender.category)
            && self
                .institution
                .as_deref()
                .is_none_or(|i| i == tender.institution)
            && self
                .eligible_entity
                .as_deref()
                .is_none_or(|e| tender.is_eligible(e))
            && self
                .deadline_start
                .is_none_or(|start| tender.deadline.is_some_and(|d| d >= start))
            && self
                .deadline_end
                .is_none_or(|end| tender.deadline.is_some_and(|d| d <= end))
    }

    fn matches_keyword(&self, tender: &Tender) -> bool {
        if self.keyword.is_empty() {
            return true;
        }
        let needle = self.keyword.to_lowercase();
        tender.title.to_lowercase().contains(&needle)
            || tender.summary.to_lowercase().contains(&needle)
    }

    /// Short human-readable chips describing the constrained dimensions.
    ///
    /// Empty when nothing is constrained.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut chips = Vec::new();
        if !self.keyword.is_empty() {
            chips.push(format!("\"{}\"", self.keyword));
        }
        if let Some(funding_type) = self.funding_type {
            chips.push(funding_type.to_string());
        }
        if let Some(category) = self.category {
            chips.push(category.to_string());
        }
        if let Some(institution) = &self.institution {
            chips.push(institution.clone());
        }
        if let Some(entity) = &self.eligible_entity {
            chips.push(entity.clone());
        }
        if self.deadline_start.is_some() || self.deadline_end.is_some() {
            let start = self
                .deadline_start
                .map_or_else(|| "...".to_string(), |d| d.to_string());
            let end = self
                .deadline_end
                .map_or_else(|| "...".to_string(), |d| d.to_string());
            chips.push(format!("deadline: {start} - {end}"));
        }
        chips
    }
}
