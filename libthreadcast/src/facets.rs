//! Facet scanning
//!
//! Platforms that render rich text from plain text plus out-of-band spans
//! address those spans by UTF-8 byte offsets into the exact post text.
//! This module runs three independent entity scans (mentions, links,
//! hashtags) over an immutable snapshot of the final chunk text and emits
//! a sorted, non-overlapping facet list. Any transformation of the text
//! after scanning invalidates every offset, so callers must scan last.
//!
//! Mention facets require resolving the handle to a stable identifier via
//! the injected [`HandleResolver`]. Resolution is best-effort at the
//! single-entity granularity: a resolver failure or a handle that does not
//! resolve produces no facet and never fails the scan.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;

/// A byte-addressed annotation over a span of chunk text
///
/// Offsets are half-open UTF-8 byte positions into the exact text the
/// facet list accompanies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub byte_start: usize,
    pub byte_end: usize,
    #[serde(flatten)]
    pub kind: FacetKind,
}

/// What the span is, plus its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FacetKind {
    /// Resolved mention; the payload is the stable platform identifier
    Mention { did: String },
    /// Literal URI
    Link { uri: String },
    /// Literal tag text, without the leading `#`
    Hashtag { tag: String },
}

/// External service mapping a handle to a stable platform identifier
#[async_trait]
pub trait HandleResolver: Send + Sync {
    /// Resolve a handle-shaped token
    ///
    /// Returns `Ok(None)` when the handle does not exist. An `Err` is
    /// treated by the scanner exactly like `Ok(None)`, at the granularity
    /// of the single mention being resolved.
    async fn resolve_handle(&self, handle: &str) -> Result<Option<String>>;
}

fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Whether `prev` can precede an entity start (`@` or `#`)
fn is_boundary(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || c.is_ascii_punctuation(),
    }
}

/// A mention candidate awaiting resolution
#[derive(Debug)]
struct MentionCandidate {
    byte_start: usize,
    byte_end: usize,
    handle: String,
}

/// Collect `@handle` tokens worth resolving
///
/// A resolvable handle is dot-separated (at least one `.`); a bare token
/// without a dot is display-name-shaped and is intentionally skipped, since
/// it cannot map to a stable identifier.
fn scan_mentions(text: &str) -> Vec<MentionCandidate> {
    let mut candidates = Vec::new();
    let mut prev: Option<char> = None;

    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if c != '@' || !is_boundary(prev) {
            prev = Some(c);
            continue;
        }

        let token_start = i + c.len_utf8();
        let mut token_end = token_start;
        while let Some(&(j, h)) = iter.peek() {
            if is_handle_char(h) {
                token_end = j + h.len_utf8();
                iter.next();
            } else {
                break;
            }
        }

        // Trailing dots and dashes are sentence punctuation, not handle
        let trimmed = text[token_start..token_end].trim_end_matches(['.', '-']);
        let handle = trimmed.to_string();
        if handle.contains('.') {
            candidates.push(MentionCandidate {
                byte_start: i,
                byte_end: token_start + handle.len(),
                handle,
            });
        }
        prev = Some(c);
    }

    candidates
}

/// Collect `http(s)://` links, trimmed of trailing sentence punctuation
fn scan_links(text: &str) -> Vec<Facet> {
    let mut facets = Vec::new();

    for (start, _) in text.match_indices("http") {
        let rest = &text[start..];
        let scheme_len = if rest.starts_with("https://") {
            8
        } else if rest.starts_with("http://") {
            7
        } else {
            continue;
        };
        // Avoid matching the tail of a longer word, e.g. "shttp://"
        if !is_boundary(text[..start].chars().next_back()) {
            continue;
        }

        let body = &text[start + scheme_len..];
        let body_len = body
            .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\''))
            .unwrap_or(body.len());
        let uri = text[start..start + scheme_len + body_len]
            .trim_end_matches(['.', ',', ';', ':', '!', '?']);

        if uri.len() > scheme_len {
            facets.push(Facet {
                byte_start: start,
                byte_end: start + uri.len(),
                kind: FacetKind::Link {
                    uri: uri.to_string(),
                },
            });
        }
    }

    facets
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Collect `#hashtag` tokens
///
/// A tag continuing with a dash, or with a dot followed by a word
/// character, is rejected outright so that domain-like text such as
/// `example#anchor.html` or `#foo-bar` is not half-swallowed.
fn scan_hashtags(text: &str) -> Vec<Facet> {
    let mut facets = Vec::new();
    let mut prev: Option<char> = None;

    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if c != '#' || !is_boundary(prev) {
            prev = Some(c);
            continue;
        }

        let tag_start = i + c.len_utf8();
        let mut tag_end = tag_start;
        while let Some(&(j, t)) = iter.peek() {
            if is_tag_char(t) {
                tag_end = j + t.len_utf8();
                iter.next();
            } else {
                break;
            }
        }
        prev = Some(c);

        if tag_end == tag_start {
            continue;
        }
        let mut after = text[tag_end..].chars();
        match after.next() {
            Some('-') => continue,
            Some('.') if after.next().is_some_and(|c| c.is_alphanumeric()) => continue,
            _ => {}
        }

        facets.push(Facet {
            byte_start: i,
            byte_end: tag_end,
            kind: FacetKind::Hashtag {
                tag: text[tag_start..tag_end].to_string(),
            },
        });
    }

    facets
}

/// Scan final chunk text for mentions, links, and hashtags
///
/// The three scans are independent and order-free; mention resolutions
/// are issued concurrently and the scan waits for all of them before
/// emitting. The returned list is sorted ascending by `byte_start` with
/// overlapping spans suppressed (the earlier span wins), so the output is
/// deterministic regardless of resolver latency.
pub async fn scan(text: &str, resolver: &dyn HandleResolver) -> Vec<Facet> {
    let candidates = scan_mentions(text);
    let resolutions = join_all(
        candidates
            .iter()
            .map(|c| resolver.resolve_handle(&c.handle)),
    )
    .await;

    let mut facets = Vec::new();
    for (candidate, resolution) in candidates.into_iter().zip(resolutions) {
        match resolution {
            Ok(Some(did)) => facets.push(Facet {
                byte_start: candidate.byte_start,
                byte_end: candidate.byte_end,
                kind: FacetKind::Mention { did },
            }),
            Ok(None) => {}
            Err(e) => {
                warn!("handle resolution failed for '{}': {}", candidate.handle, e);
            }
        }
    }

    facets.extend(scan_links(text));
    facets.extend(scan_hashtags(text));
    facets.sort_by_key(|f| (f.byte_start, f.byte_end));

    // Suppress overlaps; first span wins
    let mut merged: Vec<Facet> = Vec::with_capacity(facets.len());
    for facet in facets {
        if merged.last().map_or(true, |prev| facet.byte_start >= prev.byte_end) {
            merged.push(facet);
        }
    }
    merged
}
