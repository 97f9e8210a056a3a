use crate::config::{ChunkerConfig, ChunkingOptions, ChunkingStrategy};
use crate::error::{ChunkerError, Result};
use crate::limits::{check_document_size, try_vec_with_capacity, RunMonitor};
use crate::metadata::MetadataSynthesizer;
use crate::strategy::StrategyExecutor;
use crate::types::{Document, DocumentChunk, MaterializedChunk};
use std::path::Path;

/// Main chunker interface for processing documents
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    /// Create a chunker from a TOML config file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(ChunkerConfig::from_toml_file(path)?)
    }

    /// Chunk a document.
    ///
    /// `options` falls back to the configured defaults. Empty content
    /// yields no chunks; content over the size ceiling is rejected before
    /// any work is done.
    pub fn chunk(
        &self,
        document: &Document,
        strategy: ChunkingStrategy,
        options: Option<ChunkingOptions>,
    ) -> Result<Vec<DocumentChunk>> {
        let options = options
            .as_ref()
            .unwrap_or(&self.config.default_options)
            .normalized();
        options.validate().map_err(ChunkerError::invalid_config)?;

        if document.content.is_empty() {
            return Ok(Vec::new());
        }
        let chars = check_document_size(&document.content, self.config.max_document_chars)?;

        log::debug!(
            "Chunking document {} ({chars} chars) with {strategy}, max_chunk_size={}",
            document.id,
            options.max_chunk_size
        );
        let monitor = RunMonitor::start(
            self.config.slow_run_warning_secs,
            self.config.memory_growth_warning_bytes,
        );

        let executor = StrategyExecutor::new(options, self.config.max_header_depth);
        let assembled = executor.execute(&document.content, strategy)?;

        let synthesizer = MetadataSynthesizer::new(document, strategy);
        let mut chunks = try_vec_with_capacity(assembled.len())?;
        for (index, piece) in assembled.into_iter().enumerate() {
            let metadata = synthesizer.synthesize(index, &piece.content, piece.parent_headers);
            chunks.push(DocumentChunk::new(piece.content, index, metadata));
        }

        let report = monitor.finish(&document.id);
        log::debug!(
            "Chunked document {} into {} chunks in {:?}",
            document.id,
            chunks.len(),
            report.elapsed
        );
        Ok(chunks)
    }

    /// Chunk a document and flatten each chunk for storage, with metadata
    /// serialized to JSON
    pub fn materialize(
        &self,
        document: &Document,
        strategy: ChunkingStrategy,
        options: Option<ChunkingOptions>,
    ) -> Result<Vec<MaterializedChunk>> {
        self.chunk(document, strategy, options)?
            .iter()
            .map(DocumentChunk::materialize)
            .collect()
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[DocumentChunk]) -> ChunkingStats {
        let sizes: Vec<usize> = chunks.iter().map(DocumentChunk::char_len).collect();
        let total_chars: usize = sizes.iter().sum();

        ChunkingStats {
            total_chunks: chunks.len(),
            total_chars,
            avg_chars_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_chars / chunks.len()
            },
            min_chars: sizes.iter().copied().min().unwrap_or(0),
            max_chars: sizes.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_chars: usize,
    pub avg_chars_per_chunk: usize,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Chars: {} | Avg: {} | Range: {}-{}",
            self.total_chunks,
            self.total_chars,
            self.avg_chars_per_chunk,
            self.min_chars,
            self.max_chars
        )
    }
}
