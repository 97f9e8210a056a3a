use crate::config::ChunkingStrategy;
use crate::types::{ChunkMetadata, ContentCategory, Document};
use chrono::Utc;

const PROBLEM_KEYWORDS: &[&str] = &["problem", "issue", "error"];
const INTERFACE_KEYWORDS: &[&str] = &["api", "interface", "method"];
const TECHNICAL_KEYWORDS: &[&str] = &["```", "code", "function"];

/// Classify chunk text by case-insensitive keyword scan.
///
/// Checked in order: problem, interface, technical. First match wins.
#[must_use]
pub fn categorize(text: &str) -> ContentCategory {
    let lowered = text.to_lowercase();
    let has_any = |keywords: &[&str]| keywords.iter().any(|kw| lowered.contains(kw));

    if has_any(PROBLEM_KEYWORDS) {
        ContentCategory::ProblemResolution
    } else if has_any(INTERFACE_KEYWORDS) {
        ContentCategory::InterfaceUsage
    } else if has_any(TECHNICAL_KEYWORDS) {
        ContentCategory::TechnicalDocs
    } else {
        ContentCategory::General
    }
}

/// Builds metadata for every chunk of one run
#[derive(Debug, Clone)]
pub struct MetadataSynthesizer {
    document_id: String,
    document_title: String,
    strategy: ChunkingStrategy,
    created_at: String,
}

impl MetadataSynthesizer {
    #[must_use]
    pub fn new(document: &Document, strategy: ChunkingStrategy) -> Self {
        Self {
            document_id: document.id.clone(),
            document_title: document.title.clone(),
            strategy,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[must_use]
    pub fn synthesize(
        &self,
        chunk_index: usize,
        content: &str,
        parent_headers: Vec<String>,
    ) -> ChunkMetadata {
        ChunkMetadata::for_document(&self.document_id, &self.document_title)
            .chunk_index(chunk_index)
            .parent_headers(parent_headers)
            .content_category(categorize(content))
            .with_field("chunk_size", content.chars().count().to_string())
            .with_field("created_at", &self.created_at)
            .with_field("strategy", self.strategy.as_str())
    }
}
