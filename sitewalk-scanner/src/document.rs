//! Sitemap documents as read off the wire.
//!
//! A sitemap is one of two shapes defined by the sitemaps.org protocol:
//!
//! ```xml
//! <sitemapindex>
//!   <sitemap><loc>https://example.com/sitemap-blog.xml</loc></sitemap>
//! </sitemapindex>
//! ```
//!
//! ```xml
//! <urlset>
//!   <url><loc>https://example.com/page</loc></url>
//! </urlset>
//! ```
//!
//! The shape is resolved once, from the root element, into [`SitemapDocument`].
//! Anything else becomes [`SitemapDocument::Unrecognized`] and yields no entries.

use crate::error::{Result, SitemapError};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which shape a fetched document turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Index,
    Urlset,
    Unrecognized,
}

/// A parsed sitemap. Every variant holds its `<loc>` values in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of child sitemaps.
    Index(Vec<String>),
    /// `<urlset>`: locations of pages.
    Urlset(Vec<String>),
    Unrecognized,
}

impl SitemapDocument {
    pub fn kind(&self) -> DocumentKind {
        match self {
            SitemapDocument::Index(_) => DocumentKind::Index,
            SitemapDocument::Urlset(_) => DocumentKind::Urlset,
            SitemapDocument::Unrecognized => DocumentKind::Unrecognized,
        }
    }

    /// Parse sitemap XML.
    ///
    /// Element names are compared by local name, so prefixed documents
    /// (`<sm:urlset>`) are read the same as unprefixed ones. Entries with a
    /// missing or blank `<loc>` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SitemapError::ParseError`] for ill-formed XML: mismatched or
    /// unclosed tags, bad escapes, or text outside the root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut kind: Option<DocumentKind> = None;
        let mut depth = 0usize;
        let mut in_entry = false;
        let mut in_loc = false;
        let mut loc = String::new();
        let mut entry_loc: Option<String> = None;
        let mut locs = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if depth == 0 && kind.is_some() {
                        return Err(second_root());
                    }
                    depth += 1;
                    let name = e.local_name();
                    match depth {
                        1 => kind = Some(root_kind(name.as_ref())),
                        2 if is_entry(kind, name.as_ref()) => {
                            in_entry = true;
                            entry_loc = None;
                        }
                        3 if in_entry && name.as_ref() == b"loc" => {
                            in_loc = true;
                            loc.clear();
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    // <urlset/> is a valid, empty document
                    if depth == 0 {
                        if kind.is_some() {
                            return Err(second_root());
                        }
                        kind = Some(root_kind(e.local_name().as_ref()));
                    }
                }
                Event::Text(e) => {
                    if depth == 0 {
                        return Err(SitemapError::ParseError(
                            "text outside of the root element".to_string(),
                        ));
                    }
                    if in_loc {
                        loc.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) => {
                    if in_loc {
                        loc.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    if in_loc && depth == 3 {
                        in_loc = false;
                        let trimmed = loc.trim();
                        if !trimmed.is_empty() && entry_loc.is_none() {
                            entry_loc = Some(trimmed.to_string());
                        }
                    } else if in_entry && depth == 2 {
                        in_entry = false;
                        if let Some(found) = entry_loc.take() {
                            locs.push(found);
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth != 0 {
            return Err(SitemapError::ParseError(format!(
                "unexpected end of document with {} unclosed element(s)",
                depth
            )));
        }

        Ok(match kind {
            Some(DocumentKind::Index) => SitemapDocument::Index(locs),
            Some(DocumentKind::Urlset) => SitemapDocument::Urlset(locs),
            _ => SitemapDocument::Unrecognized,
        })
    }
}

impl FromStr for SitemapDocument {
    type Err = SitemapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn second_root() -> SitemapError {
    SitemapError::ParseError("more than one root element".to_string())
}

fn root_kind(name: &[u8]) -> DocumentKind {
    match name {
        b"sitemapindex" => DocumentKind::Index,
        b"urlset" => DocumentKind::Urlset,
        _ => DocumentKind::Unrecognized,
    }
}

fn is_entry(kind: Option<DocumentKind>, name: &[u8]) -> bool {
    matches!(
        (kind, name),
        (Some(DocumentKind::Index), b"sitemap") | (Some(DocumentKind::Urlset), b"url")
    )
}

/// Child sitemap locations of an index. Empty when `doc` is not an index,
/// which callers treat as "not an index" rather than as a failure.
pub fn extract_child_sitemaps(doc: &SitemapDocument) -> Vec<String> {
    match doc {
        SitemapDocument::Index(locs) => locs.clone(),
        _ => Vec::new(),
    }
}

/// Page locations of a urlset. Empty for any other shape.
pub fn extract_page_urls(doc: &SitemapDocument) -> Vec<String> {
    match doc {
        SitemapDocument::Urlset(locs) => locs.clone(),
        _ => Vec::new(),
    }
}
