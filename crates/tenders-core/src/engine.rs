//! The search pipeline.
//!
//! Every stage is a pure function over an in-memory tender list:
//! [`filter`] → [`sort`] → [`paginate`], with [`summarize`] computed over the
//! full filtered list rather than a single page.

mod filter;
pub use filter::{eligible_entities, filter, institutions};

mod paginate;
pub use paginate::{paginate, Page, PageState};

mod sort;
pub use sort::{sort, SortConfig, SortDirection, SortKey};

mod summary;
pub use summary::{summarize, Summary};
