pub mod caption;
pub mod entry;
pub mod feed;

pub use caption::extract_caption;
pub use entry::{Entry, RawMarkup, Summary};
pub use feed::{FeedDocument, Link};
