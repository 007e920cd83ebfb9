use crate::domain::caption::extract_caption;
use crate::domain::Link;

/// Raw, still-escaped inner XML of a `<summary>` element.
///
/// The contents are opaque: nothing in the crate parses them as markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMarkup(String);

impl RawMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawMarkup {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for RawMarkup {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// The `type` attribute, e.g. `html`
    pub content_type: Option<String>,
    pub body: RawMarkup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub links: Vec<Link>,
    pub updated: String,
    pub id: String,
    pub summary: Summary,
}

impl Entry {
    /// Alt text of the first image in the summary, or `""`.
    pub fn caption(&self) -> &str {
        extract_caption(self.summary.body.as_str())
    }

    /// A copy of this entry with `"\n" + caption` appended to the summary body.
    pub fn with_caption(&self) -> Entry {
        let caption = self.caption();
        let mut body = String::with_capacity(self.summary.body.as_str().len() + caption.len() + 1);
        body.push_str(self.summary.body.as_str());
        body.push('\n');
        body.push_str(caption);

        Entry {
            summary: Summary {
                content_type: self.summary.content_type.clone(),
                body: RawMarkup::from(body),
            },
            ..self.clone()
        }
    }
}
