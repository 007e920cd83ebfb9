use std::borrow::Cow;

use regex::bytes::Regex;

use crate::app::{CaptionFeedError, Result};

pub const DEFAULT_HOST: &str = "xkcd.com";
pub const DEFAULT_SUBDOMAIN: &str = "imgs";

/// Rewrites `http://` references to the upstream host as `https://`.
///
/// The optional subdomain (`imgs.` by default) is carried over unchanged.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    pattern: Regex,
    replacement: String,
}

impl LinkRewriter {
    pub fn new(host: &str, subdomain: Option<&str>) -> Result<Self> {
        if host.is_empty() {
            return Err(CaptionFeedError::Config("rewrite host is empty".into()));
        }

        let prefix = subdomain
            .filter(|s| !s.is_empty())
            .map(|s| format!("({}\\.)?", regex::escape(s)))
            .unwrap_or_else(|| "()".to_string());
        let pattern = Regex::new(&format!("http://{}{}", prefix, regex::escape(host)))
            .map_err(|e| CaptionFeedError::Config(format!("invalid rewrite pattern: {}", e)))?;

        Ok(Self {
            pattern,
            replacement: format!("https://${{1}}{}", host),
        })
    }

    /// Rewrite every match in `body`. Borrows when nothing matched.
    pub fn rewrite<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        self.pattern
            .replace_all(body, self.replacement.as_bytes())
    }
}

#[cfg(test)]
impl LinkRewriter {
    pub(crate) fn xkcd() -> Self {
        Self::new(DEFAULT_HOST, Some(DEFAULT_SUBDOMAIN)).unwrap()
    }
}
