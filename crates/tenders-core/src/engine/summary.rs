use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Tender;

/// Aggregate figures over a complete result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of tenders.
    pub count: usize,
    /// Sum of every tender's minimum funding.
    pub total_min: u64,
    /// Sum of every tender's maximum funding.
    pub total_max: u64,
    /// Earliest parsable deadline, if any.
    pub earliest_deadline: Option<NaiveDate>,
    /// Latest parsable deadline, if any.
    pub latest_deadline: Option<NaiveDate>,
}

/// Summarizes a result list.
///
/// Pass the whole filtered list, not a page: the figures describe every
/// match regardless of how the results are paged.
#[must_use]
pub fn summarize(tenders: &[&Tender]) -> Summary {
    tenders.iter().fold(Summary::default(), |mut summary, tender| {
        summary.count += 1;
        summary.total_min = summary.total_min.saturating_add(tender.funding_min);
        summary.total_max = summary.total_max.saturating_add(tender.funding_max);
        if let Some(deadline) = tender.deadline {
            summary.earliest_deadline =
                Some(summary.earliest_deadline.map_or(deadline, |d| d.min(deadline)));
            summary.latest_deadline =
                Some(summary.latest_deadline.map_or(deadline, |d| d.max(deadline)));
        }
        summary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{tender::tests::tender, Category};

    #[test]
    fn sums_bounds_and_spans_deadlines() {
        let tenders = [
            tender(1, "2024-10-31", 100_000, Category::Digitalization),
            tender(2, "2024-11-30", 150_000, Category::Tourism),
        ];
        let refs: Vec<&Tender> = tenders.iter().collect();

        let summary = summarize(&refs);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_min, tenders[0].funding_min + tenders[1].funding_min);
        assert_eq!(summary.total_max, 250_000);
        assert_eq!(summary.earliest_deadline, NaiveDate::from_ymd_opt(2024, 10, 31));
        assert_eq!(summary.latest_deadline, NaiveDate::from_ymd_opt(2024, 11, 30));
    }

    #[test]
    fn empty_list_has_no_deadlines() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn undated_tenders_count_but_add_no_deadline() {
        let mut undated = tender(1, "2024-10-31", 100, Category::Tourism);
        undated.deadline = None;
        let refs = [&undated];

        let summary = summarize(&refs);

        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_max, 100);
        assert_eq!(summary.earliest_deadline, None);
        assert_eq!(summary.latest_deadline, None);
    }

    #[test]
    fn serializes_with_null_deadlines() {
        let json = serde_json::to_string(&Summary::default()).unwrap();
        assert_eq!(
            json,
            r#"{"count":0,"totalMin":0,"totalMax":0,"earliestDeadline":null,"latestDeadline":null}"#
        );
    }
}
