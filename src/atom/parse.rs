use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::app::{CaptionFeedError, Result};
use crate::domain::{Entry, FeedDocument, Link, RawMarkup, Summary};

fn parse_error(e: impl std::fmt::Display) -> CaptionFeedError {
    CaptionFeedError::Parse(e.to_string())
}

/// Parse an Atom document into a [`FeedDocument`].
///
/// Unknown elements are skipped. The document must be UTF-8 and must carry
/// both `<id>` and `<updated>` on the feed.
pub fn parse(bytes: &[u8]) -> Result<FeedDocument> {
    let text = std::str::from_utf8(bytes).map_err(parse_error)?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => {
                if e.local_name().as_ref() != b"feed" {
                    return Err(CaptionFeedError::Parse(format!(
                        "expected <feed> root element, found <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                return read_feed(&mut reader, &e);
            }
            Event::Empty(e) => {
                return Err(CaptionFeedError::Parse(format!(
                    "root element <{}> has no content",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Event::Eof => {
                return Err(CaptionFeedError::Parse("document has no root element".into()));
            }
            _ => {}
        }
    }
}

fn read_feed(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<FeedDocument> {
    let mut feed = FeedDocument {
        lang: attribute(start, b"xml:lang")?,
        ..Default::default()
    };
    let mut seen_id = false;
    let mut seen_updated = false;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"title" => feed.title = read_text(reader, &e)?,
                b"id" => {
                    feed.id = read_text(reader, &e)?;
                    seen_id = true;
                }
                b"updated" => {
                    feed.updated = read_text(reader, &e)?;
                    seen_updated = true;
                }
                b"link" => {
                    feed.links.push(read_link(&e)?);
                    reader.read_to_end(e.name()).map_err(parse_error)?;
                }
                b"entry" => feed.entries.push(read_entry(reader)?),
                _ => {
                    reader.read_to_end(e.name()).map_err(parse_error)?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"title" => feed.title.clear(),
                b"id" => {
                    feed.id.clear();
                    seen_id = true;
                }
                b"updated" => {
                    feed.updated.clear();
                    seen_updated = true;
                }
                b"link" => feed.links.push(read_link(&e)?),
                b"entry" => feed.entries.push(Entry::default()),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => return Err(CaptionFeedError::Parse("unexpected end of document".into())),
            _ => {}
        }
    }

    if !seen_id {
        return Err(CaptionFeedError::Parse("feed has no <id> element".into()));
    }
    if !seen_updated {
        return Err(CaptionFeedError::Parse("feed has no <updated> element".into()));
    }

    Ok(feed)
}

fn read_entry(reader: &mut Reader<&[u8]>) -> Result<Entry> {
    let mut entry = Entry::default();

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"title" => entry.title = read_text(reader, &e)?,
                b"id" => entry.id = read_text(reader, &e)?,
                b"updated" => entry.updated = read_text(reader, &e)?,
                b"link" => {
                    entry.links.push(read_link(&e)?);
                    reader.read_to_end(e.name()).map_err(parse_error)?;
                }
                b"summary" => {
                    let content_type = attribute(&e, b"type")?;
                    // The body is kept exactly as it appears between the tags.
                    let raw = reader.read_text(e.name()).map_err(parse_error)?;
                    entry.summary = Summary {
                        content_type,
                        body: RawMarkup::from(raw.into_owned()),
                    };
                }
                _ => {
                    reader.read_to_end(e.name()).map_err(parse_error)?;
                }
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"title" => entry.title.clear(),
                b"id" => entry.id.clear(),
                b"updated" => entry.updated.clear(),
                b"link" => entry.links.push(read_link(&e)?),
                b"summary" => {
                    entry.summary = Summary {
                        content_type: attribute(&e, b"type")?,
                        body: RawMarkup::default(),
                    };
                }
                _ => {}
            },
            Event::End(_) => return Ok(entry),
            Event::Eof => return Err(CaptionFeedError::Parse("unexpected end of document".into())),
            _ => {}
        }
    }
}

fn read_link(e: &BytesStart<'_>) -> Result<Link> {
    Ok(Link {
        href: attribute(e, b"href")?.unwrap_or_default(),
        rel: attribute(e, b"rel")?,
    })
}

/// Character content of a simple element.
///
/// Text is unescaped and CDATA sections are taken verbatim. Comments,
/// processing instructions and nested elements contribute nothing.
fn read_text(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<String> {
    reader.config_mut().trim_text(false);
    let text = collect_text(reader, e);
    reader.config_mut().trim_text(true);
    text
}

fn collect_text(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<String> {
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(parse_error)?),
            Event::CData(c) => text.push_str(&c.decode().map_err(parse_error)?),
            Event::Start(child) => {
                reader.read_to_end(child.name()).map_err(parse_error)?;
            }
            Event::End(end) if end.name() == e.name() => return Ok(text),
            Event::Eof => return Err(CaptionFeedError::Parse("unexpected end of document".into())),
            _ => {}
        }
    }
}

/// Unescaped value of attribute `key`. Empty values are treated as absent.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(parse_error)?;
        if attr.key.as_ref() == key {
            let value: Cow<'_, str> = attr.unescape_value().map_err(parse_error)?;
            if value.is_empty() {
                return Ok(None);
            }
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
