use crate::error::{ChunkerError, Result};
use crate::limits::{
    DEFAULT_MAX_HEADER_DEPTH, DEFAULT_MEMORY_GROWTH_WARNING_BYTES, DEFAULT_SLOW_RUN_WARNING_SECS,
    MAX_DOCUMENT_CHARS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Chunk size used when the caller does not say otherwise.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;

/// Chunk size substituted for a non-positive `max_chunk_size`.
pub const FALLBACK_MAX_CHUNK_SIZE: usize = 4000;

/// Default overlap between fixed-size windows, in percent.
pub const DEFAULT_OVERLAP_PERCENTAGE: u8 = 10;

/// Strategy for deciding chunk boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingStrategy {
    /// Cut at every heading; headings are never split from their body
    HeaderBased,

    /// Sliding character window with overlap, ignoring structure
    FixedSize,

    /// Header-aware cutting that also breaks between paragraphs and
    /// only closes a chunk at a heading when the break looks natural
    SemanticBoundary,
}

impl ChunkingStrategy {
    /// Stable snake_case name, recorded in chunk metadata
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeaderBased => "header_based",
            Self::FixedSize => "fixed_size",
            Self::SemanticBoundary => "semantic_boundary",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "header_based" | "header" | "headers" => Ok(Self::HeaderBased),
            "fixed_size" | "fixed" => Ok(Self::FixedSize),
            "semantic_boundary" | "semantic" => Ok(Self::SemanticBoundary),
            _ => Err(ChunkerError::unsupported_strategy(s)),
        }
    }
}

/// Thresholds for the semantic-boundary strategy, as fractions of
/// `max_chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticBreakConfig {
    /// A heading only closes a chunk once the buffer reaches this fill ratio
    pub min_break_ratio: f64,

    /// Past this fill ratio a paragraph starts a new chunk, and a heading
    /// always counts as a natural break
    pub paragraph_cut_ratio: f64,
}

impl Default for SemanticBreakConfig {
    fn default() -> Self {
        Self {
            min_break_ratio: 0.5,
            paragraph_cut_ratio: 0.8,
        }
    }
}

impl SemanticBreakConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("min_break_ratio", self.min_break_ratio),
            ("paragraph_cut_ratio", self.paragraph_cut_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a finite, non-negative ratio"));
            }
        }
        Ok(())
    }
}

/// Per-call chunking options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingOptions {
    /// Target chunk size in characters (0 is coerced to 4000)
    pub max_chunk_size: usize,

    /// Overlap between fixed-size windows, 0-100
    pub overlap_percentage: u8,

    /// Protect fenced code blocks from fixed-size windowing
    pub preserve_code_blocks: bool,

    /// Protect contiguous table rows from fixed-size windowing
    pub preserve_tables: bool,

    /// Render lists verbatim. Lists are never split by the block
    /// strategies, so this does not change output.
    pub preserve_lists: bool,

    /// Semantic-boundary thresholds
    pub semantic: SemanticBreakConfig,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap_percentage: DEFAULT_OVERLAP_PERCENTAGE,
            preserve_code_blocks: true,
            preserve_tables: true,
            preserve_lists: true,
            semantic: SemanticBreakConfig::default(),
        }
    }
}

impl ChunkingOptions {
    /// Options for plain fixed-size windowing
    #[must_use]
    pub fn fixed(max_chunk_size: usize, overlap_percentage: u8) -> Self {
        Self {
            max_chunk_size,
            overlap_percentage,
            ..Default::default()
        }
    }

    /// Copy with out-of-range values corrected. The caller's instance is
    /// left untouched.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut options = self.clone();
        if options.max_chunk_size == 0 {
            options.max_chunk_size = FALLBACK_MAX_CHUNK_SIZE;
        }
        options.overlap_percentage = options.overlap_percentage.min(100);
        options
    }

    /// Overlap between consecutive fixed-size windows, in characters
    #[must_use]
    pub const fn overlap_chars(&self) -> usize {
        self.max_chunk_size.saturating_mul(self.overlap_percentage as usize) / 100
    }

    /// Validate options that cannot be silently corrected
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.semantic.validate()
    }
}

/// Engine-wide limits and defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Hard ceiling on document length, in characters
    pub max_document_chars: usize,

    /// Maximum number of headings tracked as ancestry
    pub max_header_depth: usize,

    /// Runs slower than this are logged as a warning
    pub slow_run_warning_secs: u64,

    /// Resident memory growth above this is logged as a warning
    pub memory_growth_warning_bytes: u64,

    /// Options used when a call does not supply its own
    pub default_options: ChunkingOptions,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_document_chars: MAX_DOCUMENT_CHARS,
            max_header_depth: DEFAULT_MAX_HEADER_DEPTH,
            slow_run_warning_secs: DEFAULT_SLOW_RUN_WARNING_SECS,
            memory_growth_warning_bytes: DEFAULT_MEMORY_GROWTH_WARNING_BYTES,
            default_options: ChunkingOptions::default(),
        }
    }
}

impl ChunkerConfig {
    /// Create config optimized for embeddings (smaller, focused chunks)
    pub fn for_embeddings() -> Self {
        Self {
            default_options: ChunkingOptions {
                max_chunk_size: 512,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create config optimized for LLM context (larger, comprehensive chunks)
    pub fn for_llm_context() -> Self {
        Self {
            default_options: ChunkingOptions {
                max_chunk_size: 4000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_document_chars == 0 {
            return Err("max_document_chars must be > 0".to_string());
        }

        if self.max_header_depth == 0 {
            return Err("max_header_depth must be > 0".to_string());
        }

        self.default_options.validate()
    }
}
