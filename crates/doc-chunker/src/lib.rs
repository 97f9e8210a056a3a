//! # Context Doc Chunker
//!
//! Structure-aware chunking of headed markup documents for indexing.
//!
//! ## Philosophy
//!
//! The chunker cuts documents into bounded pieces that:
//! - Keep headings together with their body text
//! - Carry the heading ancestry they were cut under
//! - Never split fenced code or tables during size-driven windowing
//! - Terminate on adversarial input, failing with a typed error instead of
//!   spinning or exhausting memory
//!
//! ## Architecture
//!
//! ```text
//! Document + Strategy + Options
//!     │
//!     ├──> Guard Layer (size ceiling, option normalization)
//!     │
//!     ├──> Chunk Assembly
//!     │    ├─> HeaderBased / SemanticBoundary: Block Parser → Header Tracker
//!     │    └─> FixedSize: Preserved-Span Extraction → Windowing → Restore
//!     │
//!     └──> Metadata Synthesis
//!          ├─> chunk_index, parent_headers, content_category
//!          └─> Emit DocumentChunk[] (or JSON-flattened MaterializedChunk[])
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_doc_chunker::{Chunker, ChunkingStrategy, Document};
//!
//! let chunker = Chunker::default();
//! let document = Document::new("doc-1", "Guide", "# A\n\nx\n\n## B\n\n### C\n\ny\n");
//!
//! let chunks = chunker
//!     .chunk(&document, ChunkingStrategy::HeaderBased, None)
//!     .unwrap();
//! let last = chunks.last().unwrap();
//! assert_eq!(last.metadata.parent_headers, vec!["A", "B"]);
//! ```

mod block;
mod chunker;
mod config;
mod error;
mod headers;
mod limits;
mod metadata;
mod preserve;
mod strategy;
mod types;
mod window;

pub use block::{parse_blocks, Block, BlockParser, MalformedBlock};
pub use chunker::{Chunker, ChunkingStats};
pub use config::{
    ChunkerConfig, ChunkingOptions, ChunkingStrategy, SemanticBreakConfig,
    DEFAULT_MAX_CHUNK_SIZE, DEFAULT_OVERLAP_PERCENTAGE, FALLBACK_MAX_CHUNK_SIZE,
};
pub use error::{ChunkerError, ErrorKind, Result};
pub use headers::{HeaderFrame, HeaderTracker};
pub use limits::MAX_DOCUMENT_CHARS;
pub use metadata::categorize;
pub use types::{ChunkMetadata, ContentCategory, Document, DocumentChunk, MaterializedChunk};
