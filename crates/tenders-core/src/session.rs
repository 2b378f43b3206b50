//! The state of one user's search view.
//!
//! A session holds two sets of criteria: the *draft* being edited and the
//! *active* set the results are computed from. Only [`SearchSession::commit`]
//! moves the draft into effect.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{
    deep_link::DeepLink,
    domain::{FilterCriteria, SavedSearches, Tender},
    engine::{filter, sort, summarize, PageState, SortConfig, Summary},
};

/// Filters, sort order, paging and the selected tender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSession {
    pub(crate) selected_tender: Option<u32>,
    pub(crate) draft: FilterCriteria,
    pub(crate) active: FilterCriteria,
    pub(crate) sort: SortConfig,
    pub(crate) page: PageState,
}

/// One page of results plus the summary of every match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults<'a> {
    /// Tenders on the current page, in sort order.
    pub items: Vec<&'a Tender>,
    /// The current page.
    pub page: NonZeroUsize,
    /// Number of pages of matches.
    pub total_pages: NonZeroUsize,
    /// Totals over all matches, not just this page.
    pub summary: Summary,
}

impl SearchSession {
    /// A session with no criteria, default sort and the given page size.
    #[must_use]
    pub fn new(items_per_page: NonZeroUsize) -> Self {
        Self {
            page: PageState::new(items_per_page),
            ..Self::default()
        }
    }

    /// Criteria being edited.
    #[must_use]
    pub const fn draft(&self) -> &FilterCriteria {
        &self.draft
    }

    /// Mutable access to the draft. Has no effect on results until
    /// [`commit`](Self::commit).
    pub const fn draft_mut(&mut self) -> &mut FilterCriteria {
        &mut self.draft
    }

    /// Criteria the results are computed from.
    #[must_use]
    pub const fn active(&self) -> &FilterCriteria {
        &self.active
    }

    /// Current sort order.
    #[must_use]
    pub const fn sort(&self) -> SortConfig {
        self.sort
    }

    /// Paging position.
    #[must_use]
    pub const fn page(&self) -> PageState {
        self.page
    }

    /// The tender whose details were last shown.
    #[must_use]
    pub const fn selected_tender(&self) -> Option<u32> {
        self.selected_tender
    }

    /// Whether the draft differs from the active criteria.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.draft != self.active
    }

    /// Makes the draft the active criteria and returns to page one.
    pub fn commit(&mut self) {
        self.active = self.draft.clone();
        self.page.reset();
    }

    /// Clears the draft. The active criteria stay until the next commit.
    pub fn reset_draft(&mut self) {
        self.draft = FilterCriteria::default();
    }

    /// Changes the sort order. The current page is kept.
    pub const fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    /// Moves to the given page.
    pub const fn go_to_page(&mut self, page: NonZeroUsize) {
        self.page.go_to(page);
    }

    /// Changes the page size and returns to page one.
    pub const fn set_items_per_page(&mut self, items_per_page: NonZeroUsize) {
        self.page.set_items_per_page(items_per_page);
    }

    /// Records the tender whose details are shown, or clears it.
    pub const fn select(&mut self, id: Option<u32>) {
        self.selected_tender = id;
    }

    /// Replaces both draft and active criteria with a saved snapshot and
    /// returns to page one.
    pub fn apply_criteria(&mut self, criteria: FilterCriteria) {
        self.draft = criteria.clone();
        self.active = criteria;
        self.page.reset();
    }

    /// Applies the saved search with the given id.
    ///
    /// Returns `false`, leaving the session unchanged, if there is no such
    /// search.
    pub fn apply_saved_search(&mut self, searches: &SavedSearches, id: &str) -> bool {
        let Some(criteria) = searches.load_as_active_filters(id) else {
            return false;
        };
        self.apply_criteria(criteria);
        true
    }

    /// Applies the saved search named by a deep link.
    ///
    /// The link's search id is consumed whether or not it names an existing
    /// search, so applying the same link twice does nothing the second time.
    pub fn apply_deep_link(&mut self, link: &mut DeepLink, searches: &SavedSearches) -> bool {
        let Some(id) = link.take() else {
            return false;
        };
        let applied = self.apply_saved_search(searches, &id);
        if !applied {
            tracing::warn!("deep link names unknown saved search '{id}'");
        }
        applied
    }

    /// Runs the pipeline over `tenders` with the active criteria.
    ///
    /// A current page past the end yields an empty page.
    #[must_use]
    pub fn results<'a>(&self, tenders: &'a [Tender]) -> SearchResults<'a> {
        let matches = filter(tenders, &self.active);
        let summary = summarize(&matches);
        let sorted = sort(&matches, self.sort);
        let page = self.page.page_of(&sorted);
        SearchResults {
            items: page.items.to_vec(),
            page: page.page,
            total_pages: page.total_pages,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        domain::{
            tender::{tests::tender, Category},
            FundingType,
        },
        engine::{SortDirection, SortKey},
    };

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn two_tenders() -> Vec<Tender> {
        let mut a = tender(1, "2024-12-31", 200_000, Category::TechnologyInnovation);
        a.funding_min = 50_000;
        a.funding_type = FundingType::Grant;
        let mut b = tender(2, "2024-10-31", 5_000_000, Category::GreenTransition);
        b.funding_min = 500_000;
        b.funding_type = FundingType::RepayableAid;
        vec![a, b]
    }

    #[test]
    fn draft_edits_take_effect_only_on_commit() {
        let tenders = two_tenders();
        let mut session = SearchSession::new(nz(10));
        session.draft_mut().category = Some(Category::GreenTransition);

        assert!(session.has_pending_changes());
        assert_eq!(session.results(&tenders).summary.count, 2);

        session.commit();

        let results = session.results(&tenders);
        assert_eq!(results.summary.count, 1);
        assert_eq!(results.items[0].id, 2);
        assert!(!session.has_pending_changes());
    }

    #[test]
    fn commit_returns_to_page_one() {
        let mut session = SearchSession::new(nz(1));
        session.go_to_page(nz(2));

        session.commit();

        assert_eq!(session.page().current_page(), nz(1));
    }

    #[test]
    fn sort_change_keeps_the_page() {
        let mut session = SearchSession::new(nz(1));
        session.go_to_page(nz(2));

        session.set_sort(SortConfig {
            key: SortKey::FundingMax,
            direction: SortDirection::Desc,
        });

        assert_eq!(session.page().current_page(), nz(2));
    }

    #[test]
    fn worked_example() {
        let tenders = two_tenders();
        let mut session = SearchSession::new(nz(1));
        session.go_to_page(nz(2));

        let results = session.results(&tenders);

        assert_eq!(results.items.len(), 1);
        assert_eq!(results.items[0].id, 1);
        assert_eq!(results.total_pages, nz(2));
        assert_eq!(results.summary.count, 2);
        assert_eq!(results.summary.total_min, 550_000);
        assert_eq!(results.summary.total_max, 5_200_000);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let tenders = two_tenders();
        let mut session = SearchSession::new(nz(10));
        session.go_to_page(nz(3));

        let results = session.results(&tenders);

        assert!(results.items.is_empty());
        assert_eq!(results.total_pages, nz(1));
    }

    #[test]
    fn saved_search_replaces_both_criteria() {
        let mut searches = SavedSearches::default();
        let criteria = FilterCriteria {
            keyword: "zeleni".to_string(),
            ..FilterCriteria::default()
        };
        let id = searches.create("Green", criteria.clone()).id.clone();
        let mut session = SearchSession::new(nz(5));
        session.draft_mut().category = Some(Category::Tourism);
        session.go_to_page(nz(4));

        assert!(session.apply_saved_search(&searches, &id));

        assert_eq!(session.draft(), &criteria);
        assert_eq!(session.active(), &criteria);
        assert_eq!(session.page().current_page(), nz(1));
        assert!(!session.apply_saved_search(&searches, "missing"));
    }

    #[test]
    fn deep_link_is_consumed_once() {
        let mut searches = SavedSearches::default();
        let criteria = FilterCriteria {
            category: Some(Category::Agriculture),
            ..FilterCriteria::default()
        };
        let id = searches.create("Farms", criteria.clone()).id.clone();
        let mut link = DeepLink::from_url(&format!("https://app.example/?searchId={id}"));
        let mut session = SearchSession::default();

        assert!(session.apply_deep_link(&mut link, &searches));
        assert_eq!(session.active(), &criteria);

        session.reset_draft();
        session.commit();
        assert!(!session.apply_deep_link(&mut link, &searches));
        assert!(session.active().is_unconstrained());
    }

    #[test]
    fn unknown_deep_link_leaves_session_unchanged() {
        let mut link = DeepLink::from_url("https://app.example/?searchId=gone");
        let mut session = SearchSession::default();
        let before = session.clone();

        assert!(!session.apply_deep_link(&mut link, &SavedSearches::default()));
        assert_eq!(session, before);
        assert_eq!(link.search_id(), None);
    }

    proptest! {
        #[test]
        fn summary_does_not_depend_on_page_size(
            maxima in prop::collection::vec(1u64..1_000_000, 0..40),
            size in 1usize..15,
            page in 1usize..6,
        ) {
            let tenders: Vec<Tender> = maxima
                .iter()
                .zip(1u32..)
                .map(|(&max, id)| tender(id, "2025-01-15", max, Category::Tourism))
                .collect();
            let reference = SearchSession::new(nz(10)).results(&tenders).summary;

            let mut session = SearchSession::new(nz(size));
            session.go_to_page(nz(page));

            prop_assert_eq!(session.results(&tenders).summary, reference);
        }
    }
}
