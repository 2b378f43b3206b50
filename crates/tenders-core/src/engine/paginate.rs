use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// One page of an ordered result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// The items on this page. Empty when the page is past the end.
    pub items: &'a [T],
    /// The requested page number.
    pub page: NonZeroUsize,
    /// Number of pages; at least one, even for an empty list.
    pub total_pages: NonZeroUsize,
}

/// Slices page `page` (1-based) of `page_size` items out of `items`.
///
/// Pages past the end are empty rather than an error.
#[must_use]
pub fn paginate<T>(items: &[T], page: NonZeroUsize, page_size: NonZeroUsize) -> Page<'_, T> {
    let total_pages =
        NonZeroUsize::new(items.len().div_ceil(page_size.get())).unwrap_or(NonZeroUsize::MIN);
    let start = (page.get() - 1).saturating_mul(page_size.get()).min(items.len());
    let end = start.saturating_add(page_size.get()).min(items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}

/// Current position in a paged result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    current_page: NonZeroUsize,
    items_per_page: NonZeroUsize,
}

const DEFAULT_ITEMS_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PageState {
    /// Starts on page one with the given page size.
    #[must_use]
    pub const fn new(items_per_page: NonZeroUsize) -> Self {
        Self {
            current_page: NonZeroUsize::MIN,
            items_per_page,
        }
    }

    /// The 1-based current page.
    #[must_use]
    pub const fn current_page(&self) -> NonZeroUsize {
        self.current_page
    }

    /// Items shown per page.
    #[must_use]
    pub const fn items_per_page(&self) -> NonZeroUsize {
        self.items_per_page
    }

    /// Moves to the given page. Not clamped; see [`PageState::clamp`].
    pub const fn go_to(&mut self, page: NonZeroUsize) {
        self.current_page = page;
    }

    /// Back to page one.
    pub const fn reset(&mut self) {
        self.current_page = NonZeroUsize::MIN;
    }

    /// Changes the page size and returns to page one.
    pub const fn set_items_per_page(&mut self, items_per_page: NonZeroUsize) {
        self.items_per_page = items_per_page;
        self.current_page = NonZeroUsize::MIN;
    }

    /// Pulls the current page back into `1..=total_pages`.
    pub fn clamp(&mut self, total_pages: NonZeroUsize) {
        self.current_page = self.current_page.min(total_pages);
    }

    /// The current page of `items`.
    #[must_use]
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.current_page, self.items_per_page)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn second_page_of_two() {
        let items = [2, 1];
        let page = paginate(&items, nz(2), nz(1));

        assert_eq!(page.items, &[1]);
        assert_eq!(page.total_pages, nz(2));
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let items: [u32; 0] = [];
        let page = paginate(&items, nz(1), nz(10));

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, nz(1));
    }

    #[test]
    fn last_page_is_clipped() {
        let items: Vec<u32> = (1..=7).collect();
        let page = paginate(&items, nz(3), nz(3));

        assert_eq!(page.items, &[7]);
        assert_eq!(page.total_pages, nz(3));
    }

    #[test]
    fn changing_page_size_returns_to_page_one() {
        let mut state = PageState::default();
        state.go_to(nz(4));

        state.set_items_per_page(nz(50));

        assert_eq!(state.current_page(), nz(1));
        assert_eq!(state.items_per_page(), nz(50));
    }

    #[test]
    fn clamp_pulls_back_past_the_end() {
        let mut state = PageState::new(nz(5));
        state.go_to(nz(9));

        state.clamp(nz(3));
        assert_eq!(state.current_page(), nz(3));

        state.clamp(nz(8));
        assert_eq!(state.current_page(), nz(3));
    }

    proptest! {
        #[test]
        fn pages_partition_the_list(len in 0usize..200, size in 1usize..30) {
            let items: Vec<usize> = (0..len).collect();
            let total = paginate(&items, nz(1), nz(size)).total_pages.get();

            prop_assert_eq!(total, len.div_ceil(size).max(1));

            let mut seen = Vec::new();
            for page in 1..=total {
                seen.extend_from_slice(paginate(&items, nz(page), nz(size)).items);
            }
            prop_assert_eq!(seen, items);
        }

        #[test]
        fn page_past_the_end_is_empty(len in 0usize..200, size in 1usize..30) {
            let items: Vec<usize> = (0..len).collect();
            let total = paginate(&items, nz(1), nz(size)).total_pages.get();

            prop_assert!(paginate(&items, nz(total + 1), nz(size)).items.is_empty());
        }
    }
}
