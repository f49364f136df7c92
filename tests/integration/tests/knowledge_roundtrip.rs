//! Build the knowledge base, persist it, load it back and search it.

use std::sync::Arc;
use wayfarer_core::paths;
use wayfarer_integration_tests::LetterEmbeddings;
use wayfarer_memory::{builtin_documents, Document, KnowledgeBase, KnowledgeBaseBuilder};

#[tokio::test]
async fn test_build_save_load_search() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    let index_path = paths::kb_index_file(&data_dir);
    let texts_path = paths::kb_texts_file(&data_dir);

    let builder = KnowledgeBaseBuilder::new(Arc::new(LetterEmbeddings));
    let built = builder
        .build(&builtin_documents())
        .await
        .unwrap()
        .expect("built-in corpus produces chunks");
    assert!(!built.is_empty());
    built.save(&index_path, &texts_path).unwrap();

    let loaded = KnowledgeBase::load(&index_path, &texts_path, Arc::new(LetterEmbeddings));
    assert_eq!(loaded.len(), built.len());
    assert_eq!(loaded.texts(), built.texts());

    for k in [1, 3, 5, 100] {
        let response = loaded.search("anime pilgrimage in Tokyo", k).await.unwrap();
        assert!(response.results.len() <= k);
        assert!(response.message.is_none());
        for hit in &response.results {
            assert_eq!(loaded.texts()[hit.index], hit.text);
        }
        let scores: Vec<f32> = response.results.iter().map(|h| h.score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[tokio::test]
async fn test_exact_chunk_is_nearest() {
    let docs = vec![
        Document::new("Ramen shops open late near the station.", "food.txt"),
        Document::new("Book museum tickets a week ahead.", "museums.txt"),
    ];
    let kb = KnowledgeBaseBuilder::new(Arc::new(LetterEmbeddings))
        .build(&docs)
        .await
        .unwrap()
        .unwrap();

    let response = kb.search("Book museum tickets a week ahead.", 1).await.unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].text, "Book museum tickets a week ahead.");
    assert!(response.results[0].score.abs() < 1e-6);
}

#[tokio::test]
async fn test_missing_files_give_empty_knowledge_base() {
    let tmp = tempfile::tempdir().unwrap();
    let kb = KnowledgeBase::load(
        &paths::kb_index_file(tmp.path()),
        &paths::kb_texts_file(tmp.path()),
        Arc::new(LetterEmbeddings),
    );

    let response = kb.search("anything", 5).await.unwrap();
    assert!(response.results.is_empty());
    assert_eq!(response.message.as_deref(), Some("Knowledge base is empty."));
}

#[tokio::test]
async fn test_no_documents_builds_nothing() {
    let kb = KnowledgeBaseBuilder::new(Arc::new(LetterEmbeddings))
        .build(&[Document::new("   ", "blank.txt")])
        .await
        .unwrap();
    assert!(kb.is_none());
}
