//! Platform capability table
//!
//! Every supported platform is a variant of a closed enum, and every
//! per-platform behavior (limit, counting mode, mention handling, facet
//! support, threading mode) is answered by an exhaustive match. Adding a
//! platform means adding a variant and letting the compiler point at every
//! table that needs a row.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a platform counts the length of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountMode {
    /// Unicode code points (`str::chars`)
    CodePoints,
    /// Extended grapheme clusters (what the Bluesky backend counts)
    Graphemes,
}

/// How successive chunks of one logical post are chained together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadingMode {
    /// Replies address the previous post by its opaque id
    IdReply,
    /// Replies address parent and root by (uri, cid) pairs
    GraphReply,
}

/// The closed set of supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Twitter,
    Bluesky,
    Mastodon,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Bluesky,
        Platform::Mastodon,
    ];

    /// Lowercase identifier used on the wire and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Bluesky => "bluesky",
            Platform::Mastodon => "mastodon",
        }
    }

    /// Default maximum post length, in this platform's counting units
    ///
    /// The Twitter premium limit and the Mastodon instance limit are applied
    /// by [`crate::length::LengthPolicy`]; this is the base table.
    pub fn default_limit(&self) -> usize {
        match self {
            Platform::LinkedIn => 3000,
            Platform::Twitter => 280,
            Platform::Bluesky => 300,
            Platform::Mastodon => 500,
        }
    }

    /// The unit in which this platform's backend counts length
    pub fn count_mode(&self) -> CountMode {
        match self {
            Platform::Bluesky => CountMode::Graphemes,
            Platform::LinkedIn | Platform::Twitter | Platform::Mastodon => CountMode::CodePoints,
        }
    }

    /// Whether the platform turns `@name` tokens into links on its own
    ///
    /// On auto-linking platforms an unresolvable `@name` renders as a broken
    /// mention, so the tag resolver drops the `@` there. LinkedIn mentions
    /// require manual action in the UI, so the `@` is kept as a cue.
    pub fn auto_links_mentions(&self) -> bool {
        match self {
            Platform::LinkedIn => false,
            Platform::Twitter | Platform::Bluesky | Platform::Mastodon => true,
        }
    }

    /// Whether posts carry out-of-band byte-addressed facets
    pub fn needs_facets(&self) -> bool {
        matches!(self, Platform::Bluesky)
    }

    /// How reply chains address their targets
    pub fn threading_mode(&self) -> ThreadingMode {
        match self {
            Platform::Bluesky => ThreadingMode::GraphReply,
            Platform::LinkedIn | Platform::Twitter | Platform::Mastodon => ThreadingMode::IdReply,
        }
    }

    /// Parse a platform name, falling back to a conservative default
    ///
    /// Unknown names do not fail the operation; they warn and fall back to
    /// the tightest short-form policy (280 code points) so that content
    /// prepared under the fallback is legal everywhere.
    pub fn parse_lenient(s: &str) -> Platform {
        match s.parse() {
            Ok(platform) => platform,
            Err(_) => {
                tracing::warn!(
                    "Unknown platform '{}', falling back to conservative 280-unit policy",
                    s
                );
                Platform::Twitter
            }
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linkedin" => Ok(Platform::LinkedIn),
            "twitter" | "x" => Ok(Platform::Twitter),
            "bluesky" | "bsky" => Ok(Platform::Bluesky),
            "mastodon" => Ok(Platform::Mastodon),
            _ => Err(format!(
                "Unknown platform: '{}'. Valid options: linkedin, twitter, bluesky, mastodon",
                s
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
