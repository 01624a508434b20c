//! Boundary surface
//!
//! [`TextService`] is the one entry point callers outside the library go
//! through: the CLI, and anything else embedding the pipeline. Each
//! operation validates its input, runs the relevant transformation, and
//! returns a serializable outcome struct so callers can render text or
//! JSON without re-deriving any numbers themselves.

use serde::Serialize;

use crate::chunker;
use crate::directory::PersonDirectory;
use crate::error::{Result, ThreadcastError};
use crate::length::LengthPolicy;
use crate::platform::Platform;
use crate::style;
use crate::tags::{self, TagMatch};

/// Outcome of style transcoding
#[derive(Debug, Clone, Serialize)]
pub struct FormatOutcome {
    pub original: String,
    pub formatted: String,
    /// False when the text carried no well-formed emphasis spans
    pub changes_made: bool,
}

/// Outcome of counting against one platform's limit
#[derive(Debug, Clone, Serialize)]
pub struct CountOutcome {
    pub count: usize,
    pub limit: usize,
    /// Negative once the text is over the limit
    pub remaining: i64,
    pub exceeds_limit: bool,
}

/// Outcome of chunking for one platform
#[derive(Debug, Clone, Serialize)]
pub struct ChunkOutcome {
    pub chunks: Vec<String>,
    pub total_chunks: usize,
    pub needs_threading: bool,
    pub limit: usize,
}

/// Outcome of unified mention resolution
#[derive(Debug, Clone, Serialize)]
pub struct TagOutcome {
    pub processed: String,
    pub tags_found: Vec<TagMatch>,
    pub tags_processed: usize,
}

/// Combined preview: the fully processed text plus its length standing
#[derive(Debug, Clone, Serialize)]
pub struct PreviewOutcome {
    pub processed: String,
    pub count: usize,
    pub limit: usize,
    pub remaining: i64,
    pub exceeds_limit: bool,
    pub needs_chunking: bool,
}

/// Stateless facade over the text transformations
#[derive(Debug, Clone, Default)]
pub struct TextService {
    policy: LengthPolicy,
}

impl TextService {
    pub fn new(policy: LengthPolicy) -> Self {
        Self { policy }
    }

    fn validate(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(ThreadcastError::InvalidInput(
                "Content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Transcode emphasis markup into Unicode styled glyphs
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty or whitespace-only content.
    pub fn format_text(&self, content: &str) -> Result<FormatOutcome> {
        Self::validate(content)?;
        let formatted = style::apply_style(content);
        Ok(FormatOutcome {
            changes_made: formatted != content,
            original: content.to_string(),
            formatted,
        })
    }

    /// Count content against a platform's limit
    pub fn count_for_platform(
        &self,
        content: &str,
        platform: Platform,
        premium: bool,
    ) -> Result<CountOutcome> {
        Self::validate(content)?;
        let count = self.policy.count(content, platform);
        let limit = self.policy.limit(platform, premium);
        Ok(CountOutcome {
            count,
            limit,
            remaining: limit as i64 - count as i64,
            exceeds_limit: count > limit,
        })
    }

    /// Split content into platform-legal chunks
    pub fn chunk_for_platform(
        &self,
        content: &str,
        platform: Platform,
        premium: bool,
    ) -> Result<ChunkOutcome> {
        Self::validate(content)?;
        let chunks = chunker::chunk(&self.policy, content, platform, premium);
        Ok(ChunkOutcome {
            total_chunks: chunks.len(),
            needs_threading: chunks.len() > 1,
            limit: self.policy.limit(platform, premium),
            chunks,
        })
    }

    /// Rewrite `@{Name}` mentions for a platform
    pub fn resolve_tags(
        &self,
        content: &str,
        platform: Platform,
        directory: &dyn PersonDirectory,
    ) -> Result<TagOutcome> {
        Self::validate(content)?;
        let resolved = tags::resolve_tags(content, platform, directory);
        Ok(TagOutcome {
            processed: resolved.text,
            tags_processed: resolved.matches.len(),
            tags_found: resolved.matches,
        })
    }

    /// Full preview: tags, then style, then length standing
    ///
    /// Runs the same transformation order the pipeline uses, so the numbers
    /// here are exactly what publishing would see.
    pub fn preview_for_platform(
        &self,
        content: &str,
        platform: Platform,
        premium: bool,
        directory: &dyn PersonDirectory,
    ) -> Result<PreviewOutcome> {
        Self::validate(content)?;
        let tagged = tags::resolve_tags(content, platform, directory);
        let processed = style::apply_style(&tagged.text);
        let count = self.policy.count(&processed, platform);
        let limit = self.policy.limit(platform, premium);
        Ok(PreviewOutcome {
            processed,
            count,
            limit,
            remaining: limit as i64 - count as i64,
            exceeds_limit: count > limit,
            needs_chunking: count > limit,
        })
    }
}
