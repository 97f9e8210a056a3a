use context_doc_chunker::{Chunker, ChunkerConfig, ChunkingStrategy, Document, DocumentChunk};
use pretty_assertions::assert_eq;
use std::io::Write;

fn chunk(content: &str, strategy: ChunkingStrategy) -> Vec<DocumentChunk> {
    Chunker::default()
        .chunk(&Document::new("doc", "Doc", content), strategy, None)
        .expect("chunking failed")
}

fn find<'a>(chunks: &'a [DocumentChunk], needle: &str) -> &'a DocumentChunk {
    chunks
        .iter()
        .find(|c| c.content.contains(needle))
        .unwrap_or_else(|| panic!("no chunk contains {needle:?}"))
}

#[test]
fn nested_heading_gets_enclosing_ancestry() {
    let chunks = chunk("# A\n\nx\n\n## B\n\n### C\n\ny\n", ChunkingStrategy::HeaderBased);

    let c = find(&chunks, "### C");
    assert_eq!(c.metadata.parent_headers, vec!["A", "B"]);
    assert!(c.content.contains('y'));
}

#[test]
fn sibling_heading_replaces_previous_scope() {
    let doc = "# Manual\n\n## Install\n\nsteps\n\n## Configure\n\n### Files\n\nconfig files\n\n# Appendix\n\nextra\n";
    let chunks = chunk(doc, ChunkingStrategy::HeaderBased);

    assert_eq!(find(&chunks, "## Install").metadata.parent_headers, vec!["Manual"]);
    assert_eq!(
        find(&chunks, "### Files").metadata.parent_headers,
        vec!["Manual", "Configure"]
    );
    assert!(find(&chunks, "# Appendix").metadata.parent_headers.is_empty());
}

#[test]
fn content_before_first_heading_has_no_ancestry() {
    let chunks = chunk("preamble text\n\n# Title\n\nbody", ChunkingStrategy::HeaderBased);
    assert_eq!(chunks[0].content, "preamble text");
    assert!(chunks[0].metadata.parent_headers.is_empty());
    assert_eq!(chunks[1].content, "# Title\n\nbody");
}

#[test]
fn semantic_chunks_carry_ancestry_too() {
    let filler = "This sentence fills space. ".repeat(30);
    let doc = format!("# Root\n\n{filler}\n\n{filler}\n\n## Leaf\n\n{filler}");
    let chunks = chunk(&doc, ChunkingStrategy::SemanticBoundary);

    let leaf = find(&chunks, "## Leaf");
    assert!(leaf.content.starts_with("## Leaf"));
    assert_eq!(leaf.metadata.parent_headers, vec!["Root"]);
}

#[test]
fn pathological_depth_is_capped() {
    let mut doc = String::new();
    for level in 1..=2_000 {
        doc.push_str(&"#".repeat(level));
        doc.push_str(&format!(" level {level}\n\nbody {level}\n\n"));
    }
    let chunks = chunk(&doc, ChunkingStrategy::HeaderBased);

    assert_eq!(chunks.len(), 2_000);
    let max_depth = chunks
        .iter()
        .map(|c| c.metadata.parent_headers.len())
        .max()
        .unwrap();
    assert_eq!(max_depth, 10);
    let last = chunks.last().unwrap();
    assert_eq!(last.metadata.parent_headers.first().unwrap(), "level 1");
    assert_eq!(last.metadata.parent_headers.last().unwrap(), "level 10");
}

#[test]
fn header_depth_cap_comes_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_header_depth = 2").unwrap();
    let chunker = Chunker::from_config_file(file.path()).unwrap();
    let expected = ChunkerConfig {
        max_header_depth: 2,
        ..Default::default()
    };
    assert_eq!(chunker.config(), &expected);

    let doc = Document::new("d", "t", "# A\n\n## B\n\n### C\n\n#### D\n\ntext");
    let chunks = chunker
        .chunk(&doc, ChunkingStrategy::HeaderBased, None)
        .unwrap();
    assert_eq!(find(&chunks, "#### D").metadata.parent_headers, vec!["A", "B"]);
}
