use context_doc_chunker::{
    categorize, ChunkMetadata, Chunker, ChunkerError, ChunkingOptions, ChunkingStrategy,
    ContentCategory, Document, DocumentChunk, ErrorKind, MAX_DOCUMENT_CHARS,
};
use pretty_assertions::assert_eq;

const STRATEGIES: [ChunkingStrategy; 3] = [
    ChunkingStrategy::HeaderBased,
    ChunkingStrategy::FixedSize,
    ChunkingStrategy::SemanticBoundary,
];

const CODE: &str = "```bash\ncargo build --release\ncargo test --workspace\n```";

fn handbook() -> Document {
    let prose = "The service keeps an index of every document it has seen. ".repeat(8);
    let content = format!(
        "# Handbook\n\n{prose}\n\n## Setup\n\n{prose}\n\n{CODE}\n\n\
         ## Troubleshooting\n\nIf the build reports an error, clean and retry.\n\n\
         | Symptom | Fix |\n| --- | --- |\n| slow | add memory |\n\n\
         ### Network\n\n- check the proxy\n- check DNS\n\n{prose}\n"
    );
    Document::new("handbook", "Operator Handbook", content)
}

fn chunk_with(
    document: &Document,
    strategy: ChunkingStrategy,
    options: Option<ChunkingOptions>,
) -> Vec<DocumentChunk> {
    Chunker::default()
        .chunk(document, strategy, options)
        .expect("chunking failed")
}

fn contents(chunks: &[DocumentChunk]) -> Vec<&str> {
    chunks.iter().map(|c| c.content.as_str()).collect()
}

#[test]
fn indices_are_dense_and_chunks_non_empty() {
    let document = handbook();
    for strategy in STRATEGIES {
        for options in [None, Some(ChunkingOptions::fixed(200, 10))] {
            let chunks = chunk_with(&document, strategy, options);
            assert!(!chunks.is_empty(), "{strategy}");
            for (idx, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.chunk_index, idx, "{strategy}");
                assert_eq!(chunk.metadata.chunk_index, idx, "{strategy}");
                assert!(!chunk.content.trim().is_empty(), "{strategy}");
                assert_eq!(chunk.metadata.source_document_title, "Operator Handbook");
            }
        }
    }
}

#[test]
fn fixed_size_windows_stay_near_the_limit() {
    let text = "Plain words with no structure at all, repeated for length. ".repeat(50);
    assert!(text.chars().count() > 2500);
    let document = Document::new("plain", "Plain", text);

    let chunks = chunk_with(
        &document,
        ChunkingStrategy::FixedSize,
        Some(ChunkingOptions::fixed(500, 10)),
    );

    assert!(chunks.len() > 1);
    for chunk in &chunks[..chunks.len() - 1] {
        assert!(chunk.char_len() <= 550, "{} chars", chunk.char_len());
    }
    assert!(chunks.iter().all(|c| c.metadata.parent_headers.is_empty()));
}

#[test]
fn fenced_code_lands_whole_in_exactly_one_chunk() {
    let document = handbook();
    for strategy in STRATEGIES {
        let chunks = chunk_with(&document, strategy, Some(ChunkingOptions::fixed(120, 10)));
        let holders = chunks.iter().filter(|c| c.content.contains(CODE)).count();
        assert_eq!(holders, 1, "{strategy}: {:#?}", contents(&chunks));
    }
}

#[test]
fn categories_follow_keyword_precedence() {
    assert_eq!(categorize("An error occurred"), ContentCategory::ProblemResolution);
    assert_eq!(categorize("Use the API"), ContentCategory::InterfaceUsage);
    assert_eq!(categorize("Define a function"), ContentCategory::TechnicalDocs);
    assert_eq!(categorize("Hello world"), ContentCategory::General);
    assert_eq!(
        categorize("error when calling the api function"),
        ContentCategory::ProblemResolution
    );

    let chunks = chunk_with(&handbook(), ChunkingStrategy::HeaderBased, None);
    let trouble = chunks
        .iter()
        .find(|c| c.content.starts_with("## Troubleshooting"))
        .unwrap();
    assert_eq!(
        trouble.metadata.content_category,
        ContentCategory::ProblemResolution
    );
}

#[test]
fn chunking_is_deterministic() {
    let document = handbook();
    for strategy in STRATEGIES {
        let first = chunk_with(&document, strategy, None);
        let second = chunk_with(&document, strategy, None);
        assert_eq!(contents(&first), contents(&second));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.metadata.parent_headers, b.metadata.parent_headers);
            assert_eq!(a.metadata.content_category, b.metadata.content_category);
        }
    }
}

#[test]
fn document_at_size_ceiling_is_accepted() {
    let content = "word ".repeat(MAX_DOCUMENT_CHARS / 5);
    assert_eq!(content.chars().count(), MAX_DOCUMENT_CHARS);
    let document = Document::new("huge", "Huge", content);

    let chunks = chunk_with(
        &document,
        ChunkingStrategy::FixedSize,
        Some(ChunkingOptions::fixed(100_000, 10)),
    );
    assert!(chunks.len() > MAX_DOCUMENT_CHARS / 100_000);
}

#[test]
fn document_over_size_ceiling_is_rejected() {
    let mut content = "word ".repeat(MAX_DOCUMENT_CHARS / 5);
    content.push('x');
    let document = Document::new("huge", "Huge", content);

    for strategy in STRATEGIES {
        let err = Chunker::default()
            .chunk(&document, strategy, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ChunkerError::InputTooLarge { chars, .. } if chars == MAX_DOCUMENT_CHARS + 1
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

#[test]
fn full_overlap_reports_resource_exhaustion() {
    let document = Document::new("d", "t", "a b c d ".repeat(250));
    let err = Chunker::default()
        .chunk(
            &document,
            ChunkingStrategy::FixedSize,
            Some(ChunkingOptions::fixed(100, 100)),
        )
        .unwrap_err();

    assert!(err.is_resource_exhausted());
    assert!(err.to_string().contains("exceeded available resources"));
}

#[test]
fn materialized_metadata_round_trips() {
    let chunker = Chunker::default();
    let rows = chunker
        .materialize(&handbook(), ChunkingStrategy::SemanticBoundary, None)
        .unwrap();

    assert!(!rows.is_empty());
    for (idx, row) in rows.iter().enumerate() {
        assert_eq!(row.document_id, "handbook");
        assert_eq!(row.chunk_index, idx);
        let metadata = ChunkMetadata::from_json(&row.metadata).unwrap();
        assert_eq!(metadata.chunk_index, idx);
        assert_eq!(metadata.field("strategy"), Some("semantic_boundary"));
        assert_eq!(
            metadata.field("chunk_size"),
            Some(row.content.chars().count().to_string().as_str())
        );
    }
}

#[test]
fn chunker_is_shareable_across_threads() {
    let chunker = Chunker::default();
    let document = handbook();
    let expected: Vec<Vec<String>> = STRATEGIES
        .iter()
        .map(|&s| {
            chunk_with(&document, s, None)
                .into_iter()
                .map(|c| c.content)
                .collect()
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = STRATEGIES
            .iter()
            .map(|&strategy| {
                let chunker = &chunker;
                let document = &document;
                scope.spawn(move || {
                    chunker
                        .chunk(document, strategy, None)
                        .unwrap()
                        .into_iter()
                        .map(|c| c.content)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}

#[test]
fn strategy_names_parse() {
    assert_eq!(
        "header_based".parse::<ChunkingStrategy>().unwrap(),
        ChunkingStrategy::HeaderBased
    );
    assert_eq!(
        "Fixed-Size".parse::<ChunkingStrategy>().unwrap(),
        ChunkingStrategy::FixedSize
    );
    assert_eq!(
        "semantic".parse::<ChunkingStrategy>().unwrap(),
        ChunkingStrategy::SemanticBoundary
    );

    let err = "by_vibes".parse::<ChunkingStrategy>().unwrap_err();
    assert!(matches!(err, ChunkerError::UnsupportedStrategy(ref name) if name == "by_vibes"));
    assert!(err.is_invalid_input());
}
