//! Pipeline orchestration
//!
//! One logical post goes in; an ordered sequence of platform-legal chunks
//! comes out, each with optional facets and the thread-link context the
//! caller needs to publish it as a reply to the previous one.
//!
//! The caller owns publishing. Because a reply target is only known after
//! the previous chunk has actually been published, preparation is a
//! single-step operation: the caller publishes chunk *i*, feeds the
//! resulting [`PublishReceipt`] back in, and only then is chunk *i + 1*
//! prepared. The core never loops over the network itself, so pacing,
//! retries, and cancellation stay entirely in the caller's hands.

use std::sync::Arc;

use serde::Serialize;

use crate::chunker;
use crate::directory::PersonDirectory;
use crate::error::{Result, ThreadcastError};
use crate::facets::{self, Facet, HandleResolver};
use crate::length::LengthPolicy;
use crate::platform::{Platform, ThreadingMode};
use crate::style;
use crate::tags;

/// What the previous chunk's publish call returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishReceipt {
    /// Opaque post id (LinkedIn, Twitter, Mastodon)
    Id(String),
    /// Graph address (Bluesky): record uri plus content cid
    Graph { uri: String, cid: String },
}

/// Reply target for one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReplyRef {
    Id {
        previous_id: String,
    },
    Graph {
        parent_uri: String,
        parent_cid: String,
        root_uri: String,
        root_cid: String,
    },
}

/// Thread-link context handed to the caller with each chunk
///
/// Not persisted by the core; it is rebuilt from the receipts the caller
/// feeds back after each publish.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadLinkState {
    /// `None` for the first chunk of a thread
    pub reply: Option<ReplyRef>,
    pub is_first_chunk: bool,
}

/// One chunk, ready to publish
#[derive(Debug, Clone, Serialize)]
pub struct PreparedChunk {
    pub index: usize,
    pub text: String,
    /// Present only on facet-bearing platforms
    pub facets: Option<Vec<Facet>>,
    pub link: ThreadLinkState,
}

/// The transformation pipeline
///
/// Owns the length policy and the handle resolver; the person directory is
/// passed per call so callers re-resolve names at pipeline time instead of
/// caching identity.
pub struct Pipeline {
    policy: LengthPolicy,
    resolver: Arc<dyn HandleResolver>,
}

impl Pipeline {
    pub fn new(policy: LengthPolicy, resolver: Arc<dyn HandleResolver>) -> Self {
        Self { policy, resolver }
    }

    /// Run tag resolution, style transcoding, and chunking for one post
    ///
    /// Returns a [`Thread`] that yields prepared chunks one at a time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the text is empty or whitespace-only.
    pub fn plan(
        &self,
        text: &str,
        platform: Platform,
        premium: bool,
        directory: &dyn PersonDirectory,
    ) -> Result<Thread> {
        if text.trim().is_empty() {
            return Err(ThreadcastError::InvalidInput(
                "Content cannot be empty".to_string(),
            ));
        }

        let tagged = tags::resolve_tags(text, platform, directory);
        let styled = style::apply_style(&tagged.text);
        let chunks = chunker::chunk(&self.policy, &styled, platform, premium);

        Ok(Thread {
            platform,
            chunks,
            next_index: 0,
            root: None,
            resolver: Arc::clone(&self.resolver),
        })
    }
}

/// An in-flight thread: chunks prepared one at a time as receipts arrive
pub struct Thread {
    platform: Platform,
    chunks: Vec<String>,
    next_index: usize,
    /// First receipt seen; the root target for every later graph reply
    root: Option<PublishReceipt>,
    resolver: Arc<dyn HandleResolver>,
}

impl Thread {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Total number of chunks in this thread
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the content needed splitting at all
    pub fn needs_threading(&self) -> bool {
        self.chunks.len() > 1
    }

    /// How many chunks have not been prepared yet
    pub fn remaining(&self) -> usize {
        self.chunks.len() - self.next_index
    }

    /// Prepare the next chunk, given the previous chunk's publish result
    ///
    /// The first call takes `None`; every later call must supply the
    /// receipt for the chunk prepared before it, since the reply target
    /// cannot exist until the caller has actually published. Returns
    /// `Ok(None)` once every chunk has been handed out.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a receipt is missing when one is required, or if
    /// its variant does not match the platform's threading mode.
    pub async fn prepare_next(
        &mut self,
        prior: Option<PublishReceipt>,
    ) -> Result<Option<PreparedChunk>> {
        if self.next_index >= self.chunks.len() {
            return Ok(None);
        }

        let reply = if self.next_index == 0 {
            None
        } else {
            let receipt = prior.ok_or_else(|| {
                ThreadcastError::InvalidInput(
                    "A publish receipt for the previous chunk is required".to_string(),
                )
            })?;
            Some(self.reply_ref(receipt)?)
        };

        let text = self.chunks[self.next_index].clone();
        let facets = if self.platform.needs_facets() {
            Some(facets::scan(&text, self.resolver.as_ref()).await)
        } else {
            None
        };

        let chunk = PreparedChunk {
            index: self.next_index,
            text,
            facets,
            link: ThreadLinkState {
                is_first_chunk: self.next_index == 0,
                reply,
            },
        };
        self.next_index += 1;
        Ok(Some(chunk))
    }

    /// Build the reply target from the prior receipt, tracking the root
    fn reply_ref(&mut self, receipt: PublishReceipt) -> Result<ReplyRef> {
        match (self.platform.threading_mode(), receipt) {
            (ThreadingMode::IdReply, PublishReceipt::Id(previous_id)) => {
                Ok(ReplyRef::Id { previous_id })
            }
            (ThreadingMode::GraphReply, PublishReceipt::Graph { uri, cid }) => {
                let receipt = PublishReceipt::Graph {
                    uri: uri.clone(),
                    cid: cid.clone(),
                };
                let root = self.root.get_or_insert(receipt);
                let (root_uri, root_cid) = match root {
                    PublishReceipt::Graph { uri, cid } => (uri.clone(), cid.clone()),
                    // The root is only ever set from the arm above
                    PublishReceipt::Id(id) => (id.clone(), String::new()),
                };
                Ok(ReplyRef::Graph {
                    parent_uri: uri,
                    parent_cid: cid,
                    root_uri,
                    root_cid,
                })
            }
            (ThreadingMode::IdReply, PublishReceipt::Graph { .. }) => {
                Err(ThreadcastError::InvalidInput(format!(
                    "{} replies are addressed by id, not by (uri, cid)",
                    self.platform
                )))
            }
            (ThreadingMode::GraphReply, PublishReceipt::Id(_)) => {
                Err(ThreadcastError::InvalidInput(format!(
                    "{} replies are addressed by (uri, cid), not by id",
                    self.platform
                )))
            }
        }
    }
}
