use crate::block::{parse_blocks, Block};
use crate::config::{ChunkingOptions, ChunkingStrategy};
use crate::error::Result;
use crate::headers::HeaderTracker;
use crate::limits::try_string_with_capacity;
use crate::window::fixed_size_windows;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_THEN_BLANK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?]["')\]]*[ \t]*\n[ \t]*\n"#).expect("sentence break regex")
});

static TRAILING_BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n\s*$").expect("blank line regex"));

/// Chunk text plus the heading ancestry it was cut under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledChunk {
    pub content: String,
    pub parent_headers: Vec<String>,
}

/// Execute chunking strategy on document text
pub struct StrategyExecutor {
    options: ChunkingOptions,
    max_header_depth: usize,
}

impl StrategyExecutor {
    /// `options` are expected to be normalized already
    pub fn new(options: ChunkingOptions, max_header_depth: usize) -> Self {
        Self {
            options,
            max_header_depth,
        }
    }

    /// Execute the given strategy
    pub fn execute(
        &self,
        content: &str,
        strategy: ChunkingStrategy,
    ) -> Result<Vec<AssembledChunk>> {
        match strategy {
            ChunkingStrategy::HeaderBased => self.chunk_by_headers(content),
            ChunkingStrategy::SemanticBoundary => self.chunk_by_semantic_boundaries(content),
            ChunkingStrategy::FixedSize => Ok(fixed_size_windows(content, &self.options)?
                .into_iter()
                .map(|content| AssembledChunk {
                    content,
                    parent_headers: Vec::new(),
                })
                .collect()),
        }
    }

    /// Cut at every heading
    fn chunk_by_headers(&self, content: &str) -> Result<Vec<AssembledChunk>> {
        let mut assembler = Assembler::new(&self.options, self.max_header_depth, content.len())?;

        for block in parse_blocks(content) {
            if let Some((level, text)) = block.as_heading() {
                assembler.flush()?;
                assembler.open_section(level, text, &block.render());
            } else {
                assembler.push_block(&block)?;
            }
        }

        assembler.finish()
    }

    /// Cut at headings that follow a natural break, and between paragraphs
    /// once a chunk is nearly full
    fn chunk_by_semantic_boundaries(&self, content: &str) -> Result<Vec<AssembledChunk>> {
        let max = self.options.max_chunk_size as f64;
        let cut_threshold = max * self.options.semantic.paragraph_cut_ratio;
        let mut assembler = Assembler::new(&self.options, self.max_header_depth, content.len())?;

        for block in parse_blocks(content) {
            if let Some((level, text)) = block.as_heading() {
                if assembler.is_empty() || self.is_natural_break(&assembler) {
                    assembler.flush()?;
                    assembler.open_section(level, text, &block.render());
                } else {
                    assembler.tracker.enter(level, text);
                    assembler.append(&block.render());
                }
                continue;
            }

            if block.is_paragraph() && assembler.buffer_chars as f64 > cut_threshold {
                assembler.flush()?;
            }
            assembler.push_block(&block)?;
        }

        assembler.finish()
    }

    fn is_natural_break(&self, assembler: &Assembler<'_>) -> bool {
        let max = self.options.max_chunk_size as f64;
        let filled = assembler.buffer_chars as f64;
        let thresholds = &self.options.semantic;

        filled >= max * thresholds.min_break_ratio
            && (TRAILING_BLANK_LINE.is_match(&assembler.buffer)
                || SENTENCE_THEN_BLANK.is_match(&assembler.buffer)
                || filled > max * thresholds.paragraph_cut_ratio)
    }
}

/// Accumulating buffer shared by the block-driven strategies
struct Assembler<'o> {
    options: &'o ChunkingOptions,
    tracker: HeaderTracker,
    buffer: String,
    buffer_chars: usize,
    buffer_parents: Vec<String>,
    chunks: Vec<AssembledChunk>,
}

impl<'o> Assembler<'o> {
    fn new(
        options: &'o ChunkingOptions,
        max_header_depth: usize,
        content_len: usize,
    ) -> Result<Self> {
        let capacity = content_len.min(options.max_chunk_size.saturating_mul(2));
        Ok(Self {
            options,
            tracker: HeaderTracker::new(max_header_depth),
            buffer: try_string_with_capacity(capacity)?,
            buffer_chars: 0,
            buffer_parents: Vec::new(),
            chunks: Vec::new(),
        })
    }

    fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Blocks are joined by a blank line. The buffer keeps the blank line
    /// after its last block, so it always ends at a block boundary;
    /// `buffer_chars` does not count that trailing separator.
    fn append(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer_chars += 2;
        }
        self.buffer.push_str(text);
        self.buffer.push_str("\n\n");
        self.buffer_chars += text.chars().count();
    }

    /// Start a new buffer with a heading. Its parents are the scopes
    /// enclosing the heading, not the heading itself.
    fn open_section(&mut self, level: usize, text: &str, rendered: &str) {
        self.buffer_parents = self.tracker.enter(level, text);
        self.append(rendered);
    }

    /// Append a non-heading block, flushing once the buffer outgrows the
    /// size limit. A single oversized block is kept whole.
    fn push_block(&mut self, block: &Block) -> Result<()> {
        self.append(&block.render());
        if self.buffer_chars > self.options.max_chunk_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Emit the buffer as a chunk (if it holds any text) and start a fresh
    /// one under the current ancestry
    fn flush(&mut self) -> Result<()> {
        let content = self.buffer.trim();
        if !content.is_empty() {
            self.chunks.try_reserve(1)?;
            self.chunks.push(AssembledChunk {
                content: content.to_string(),
                parent_headers: std::mem::take(&mut self.buffer_parents),
            });
        }
        self.buffer.clear();
        self.buffer_chars = 0;
        self.buffer_parents = self.tracker.ancestry();
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<AssembledChunk>> {
        self.flush()?;
        Ok(self.chunks)
    }
}
