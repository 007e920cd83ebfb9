use crate::app::Result;
use crate::atom;
use crate::domain::FeedDocument;

/// Serialize `feed` with each entry's caption appended to its summary,
/// preceded by the XML declaration.
pub fn republish(feed: &FeedDocument) -> Result<Vec<u8>> {
    let captioned = feed.with_captions();
    let body = atom::serialize(&captioned)?;

    let mut out = Vec::with_capacity(atom::XML_HEADER.len() + body.len());
    out.extend_from_slice(atom::XML_HEADER.as_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}
