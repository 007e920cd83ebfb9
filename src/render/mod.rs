//! Output representations of a [`FeedDocument`](crate::domain::FeedDocument).
//!
//! Both adapters borrow the feed and build new values; the document handed
//! out by the cache is never modified.

pub mod page;
pub mod republish;

pub use page::{page_entries, render_page, PageEntry};
pub use republish::republish;
