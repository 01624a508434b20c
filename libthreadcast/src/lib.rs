//! Threadcast - write once, render for every platform
//!
//! This library provides the rich-text transformation pipeline behind the
//! threadcast tools: style transcoding, unified mention resolution,
//! platform-aware length accounting and chunking, and byte-addressed facet
//! generation for platforms that consume annotated spans.

pub mod chunker;
pub mod config;
pub mod directory;
pub mod error;
pub mod facets;
pub mod length;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod service;
pub mod style;
pub mod tags;

// Re-export commonly used types
pub use config::Config;
pub use directory::{InMemoryDirectory, PersonDirectory, PersonRecord};
pub use error::{Result, ThreadcastError};
pub use facets::{Facet, FacetKind, HandleResolver};
pub use length::LengthPolicy;
pub use pipeline::{Pipeline, PreparedChunk, PublishReceipt, Thread, ThreadLinkState};
pub use platform::{CountMode, Platform};
pub use service::TextService;
