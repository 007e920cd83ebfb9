use crate::domain::Entry;

/// An Atom `<link>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: None,
        }
    }

    pub fn with_rel(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: Some(rel.into()),
        }
    }
}

/// The structured form of the upstream Atom document.
///
/// `id` and `updated` are guaranteed to have been present in the source
/// document when the value came out of [`atom::parse`](crate::atom::parse).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    /// `xml:lang` on the root element
    pub lang: Option<String>,
    pub title: String,
    pub links: Vec<Link>,
    pub id: String,
    pub updated: String,
    pub entries: Vec<Entry>,
}

impl FeedDocument {
    /// Build a new document whose summaries carry their caption on a
    /// trailing line. `self` is left untouched.
    pub fn with_captions(&self) -> FeedDocument {
        FeedDocument {
            entries: self.entries.iter().map(Entry::with_caption).collect(),
            ..self.clone()
        }
    }
}
