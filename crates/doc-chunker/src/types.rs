use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document to be chunked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Opaque identifier, copied into every chunk
    pub id: String,

    /// Document title
    pub title: String,

    /// Raw marked-up source text
    pub content: String,
}

impl Document {
    /// Create a new document
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A chunk of a document with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentChunk {
    /// The chunk text
    pub content: String,

    /// Position within the run, dense from 0
    pub chunk_index: usize,

    /// Provenance and classification
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Create a new document chunk
    #[must_use]
    pub const fn new(content: String, chunk_index: usize, metadata: ChunkMetadata) -> Self {
        Self {
            content,
            chunk_index,
            metadata,
        }
    }

    /// Length of the content in characters
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Flatten into the form handed to storage
    pub fn materialize(&self) -> Result<MaterializedChunk> {
        Ok(MaterializedChunk {
            content: self.content.clone(),
            chunk_index: self.chunk_index,
            metadata: self.metadata.to_json()?,
            document_id: self.metadata.source_document_id.clone(),
        })
    }
}

/// Metadata about a document chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub source_document_id: String,

    pub source_document_title: String,

    pub chunk_index: usize,

    /// Enclosing heading texts, outermost first
    #[serde(default)]
    pub parent_headers: Vec<String>,

    pub content_category: ContentCategory,

    /// Auxiliary fields (chunk_size, created_at, strategy)
    #[serde(default)]
    pub additional_metadata: BTreeMap<String, String>,
}

impl ChunkMetadata {
    /// Create metadata for a chunk of the given document
    pub fn for_document(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_document_id: id.into(),
            source_document_title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: set chunk index
    #[must_use]
    pub const fn chunk_index(mut self, index: usize) -> Self {
        self.chunk_index = index;
        self
    }

    /// Builder: set parent headers
    #[must_use]
    pub fn parent_headers(mut self, headers: Vec<String>) -> Self {
        self.parent_headers = headers;
        self
    }

    /// Builder: set content category
    #[must_use]
    pub const fn content_category(mut self, category: ContentCategory) -> Self {
        self.content_category = category;
        self
    }

    /// Builder: add auxiliary field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_metadata.insert(key.into(), value.into());
        self
    }

    /// Auxiliary field lookup
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.additional_metadata.get(key).map(String::as_str)
    }

    /// Encode as a flat JSON object
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a blob produced by [`ChunkMetadata::to_json`]
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Coarse, keyword-derived classification of a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    /// Troubleshooting: problems, issues, errors
    ProblemResolution,
    /// API and interface usage
    InterfaceUsage,
    /// Code-heavy technical documentation
    TechnicalDocs,
    /// Anything else
    #[default]
    General,
}

/// A chunk flattened for persistence: metadata is a JSON string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterializedChunk {
    pub content: String,
    pub chunk_index: usize,
    pub metadata: String,
    pub document_id: String,
}
