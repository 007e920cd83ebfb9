use html_escape::{decode_html_entities, encode_text};

use crate::domain::FeedDocument;

/// One comic as shown on the HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Plain text; escaped when rendered
    pub title: String,
    /// Unescaped summary markup, embedded as is
    pub image: String,
    /// Unescaped caption markup, embedded as is
    pub caption: String,
}

/// Project each entry of `feed`, in order, into a [`PageEntry`].
pub fn page_entries(feed: &FeedDocument) -> Vec<PageEntry> {
    feed.entries
        .iter()
        .map(|entry| PageEntry {
            title: entry.title.clone(),
            image: decode_html_entities(entry.summary.body.as_str()).into_owned(),
            caption: decode_html_entities(entry.caption()).into_owned(),
        })
        .collect()
}

const PAGE_HEAD: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>xkcd with captions</title>
<link rel="stylesheet" type="text/css" href="static/style.css">
<link type="application/atom+xml" rel="alternate" href="/atom.xml"/>
</head>
<body>
<h1>xkcd with captions</h1>
<p class="desc">
The mouseover text of an xkcd comic is hard to read on a phone. This page
shows the latest comics with that text printed underneath, and the
<a href="/atom.xml">Atom feed</a> does the same for your feed reader.
Every comic links back to <a href="https://xkcd.com">xkcd.com</a>.
</p>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render the HTML page for `entries`.
pub fn render_page(entries: &[PageEntry]) -> String {
    let mut html = String::from(PAGE_HEAD);

    for entry in entries {
        html.push_str(&format!(
            "<div class=\"entry\">\n<h2>{}</h2>\n{}\n<p class=\"caption\">{}</p>\n</div>\n",
            encode_text(&entry.title),
            entry.image,
            entry.caption,
        ));
    }

    html.push_str(PAGE_TAIL);
    html
}
