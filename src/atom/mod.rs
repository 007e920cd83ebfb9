//! Atom 1.0 reading and writing.
//!
//! Only the subset of the format the upstream feed uses is modelled. Summary
//! bodies pass through as raw inner XML in both directions.

mod parse;
mod write;

pub use parse::parse;
pub use write::serialize;

pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Preamble written before a served document.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

pub const CONTENT_TYPE: &str = "application/atom+xml";
