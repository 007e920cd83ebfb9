use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::app::{CaptionFeedError, Result};
use crate::atom::ATOM_NAMESPACE;
use crate::domain::{Entry, FeedDocument, Link};

type XmlWriter = Writer<Vec<u8>>;

fn serialize_error(e: impl std::fmt::Display) -> CaptionFeedError {
    CaptionFeedError::Serialize(e.to_string())
}

/// Serialize a [`FeedDocument`] as an Atom `<feed>` element.
///
/// No XML declaration is written. Optional attributes are left out when
/// they are empty, and summary bodies are written verbatim.
pub fn serialize(feed: &FeedDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    let mut root = BytesStart::new("feed");
    root.push_attribute(("xmlns", ATOM_NAMESPACE));
    if let Some(lang) = non_empty(&feed.lang) {
        root.push_attribute(("xml:lang", lang));
    }
    write(&mut writer, Event::Start(root))?;

    write_text_element(&mut writer, "title", &feed.title)?;
    for link in &feed.links {
        write_link(&mut writer, link)?;
    }
    write_text_element(&mut writer, "id", &feed.id)?;
    write_text_element(&mut writer, "updated", &feed.updated)?;
    for entry in &feed.entries {
        write_entry(&mut writer, entry)?;
    }

    write(&mut writer, Event::End(BytesEnd::new("feed")))?;
    Ok(writer.into_inner())
}

fn write_entry(writer: &mut XmlWriter, entry: &Entry) -> Result<()> {
    write(writer, Event::Start(BytesStart::new("entry")))?;

    write_text_element(writer, "title", &entry.title)?;
    for link in &entry.links {
        write_link(writer, link)?;
    }
    write_text_element(writer, "updated", &entry.updated)?;
    write_text_element(writer, "id", &entry.id)?;

    let mut summary = BytesStart::new("summary");
    if let Some(content_type) = non_empty(&entry.summary.content_type) {
        summary.push_attribute(("type", content_type));
    }
    write(writer, Event::Start(summary))?;
    write(
        writer,
        Event::Text(BytesText::from_escaped(entry.summary.body.as_str())),
    )?;
    write(writer, Event::End(BytesEnd::new("summary")))?;

    write(writer, Event::End(BytesEnd::new("entry")))
}

fn write_link(writer: &mut XmlWriter, link: &Link) -> Result<()> {
    let mut element = BytesStart::new("link");
    element.push_attribute(("href", link.href.as_str()));
    if let Some(rel) = non_empty(&link.rel) {
        element.push_attribute(("rel", rel));
    }
    write(writer, Event::Empty(element))
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(serialize_error)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
