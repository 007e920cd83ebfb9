pub mod links;

use crate::app::Result;
use crate::atom;
use crate::domain::FeedDocument;

pub use links::LinkRewriter;

/// Turns raw upstream bytes into a [`FeedDocument`]: links are rewritten
/// first, then the document is parsed.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rewriter: LinkRewriter,
}

impl Normalizer {
    pub fn new(rewriter: LinkRewriter) -> Self {
        Self { rewriter }
    }

    pub fn normalize(&self, body: &[u8]) -> Result<FeedDocument> {
        let body = self.rewriter.rewrite(body);
        atom::parse(&body)
    }
}
