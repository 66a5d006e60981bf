//! Build-or-load behaviour of the persisted corpus index.

use domain::SupportBotError;
use infrastructure::corpus_store::{IndexOrigin, SupportCorpusStore};
use tempfile::tempdir;
use tests::{write_corpus, KeywordEmbedder, REFUND_REQUEST, SHIPPING_DELAY};

#[tokio::test]
async fn builds_once_then_loads_without_re_embedding() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    let index = dir.path().join("support_index.db");
    assert!(!index.exists());

    let embedder = KeywordEmbedder::support_topics();
    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.origin(), IndexOrigin::Built);
    assert_eq!(embedder.calls(), 2);
    assert!(index.exists());
    drop(store);

    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.origin(), IndexOrigin::Loaded);
    assert_eq!(embedder.calls(), 2, "second load must not embed the corpus");
}

#[tokio::test]
async fn query_returns_nearest_first_and_at_most_k() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), &[REFUND_REQUEST, SHIPPING_DELAY]);
    let embedder = KeywordEmbedder::support_topics();
    let store = SupportCorpusStore::load(&dir.path().join("idx.db"), &corpus, embedder)
        .await
        .unwrap();

    let hits = store.query("user: My parcel is late\n", 3).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0], format!("response: {SHIPPING_DELAY}"));

    let hits = store.query("I want a refund", 1).await.unwrap();
    assert_eq!(hits, vec![format!("response: {REFUND_REQUEST}")]);
}

#[tokio::test]
async fn k_zero_is_empty_and_skips_the_provider() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY]);
    let embedder = KeywordEmbedder::support_topics();
    let store = SupportCorpusStore::load(&dir.path().join("idx.db"), &corpus, embedder.clone())
        .await
        .unwrap();
    let before = embedder.calls();

    assert!(store.query("anything", 0).await.unwrap().is_empty());
    assert_eq!(embedder.calls(), before);
}

#[tokio::test]
async fn changed_corpus_triggers_a_rebuild() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY]);
    let embedder = KeywordEmbedder::support_topics();
    SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(embedder.calls(), 1);

    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(embedder.calls(), 3);
}

#[tokio::test]
async fn persisted_index_survives_a_missing_corpus() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    let embedder = KeywordEmbedder::support_topics();
    SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    std::fs::remove_file(&corpus).unwrap();

    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(embedder.calls(), 2);
}

#[tokio::test]
async fn missing_corpus_without_index_is_fatal() {
    let dir = tempdir().unwrap();
    let result = SupportCorpusStore::load(
        &dir.path().join("idx.db"),
        &dir.path().join("absent.csv"),
        KeywordEmbedder::support_topics(),
    )
    .await;

    let err = result.err().expect("load should fail");
    assert!(matches!(err, SupportBotError::CorpusLoad(_)));
    assert!(err.is_fatal());
    assert!(err.to_string().contains("absent.csv"));
}

#[tokio::test]
async fn failed_build_persists_nothing() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY]);

    let result =
        SupportCorpusStore::load(&index, &corpus, KeywordEmbedder::support_topics().failing()).await;
    assert!(matches!(result, Err(SupportBotError::CorpusLoad(_))));

    let embedder = KeywordEmbedder::support_topics();
    SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(embedder.calls(), 1, "a half-built index must not be reused");
}

#[tokio::test]
async fn rebuild_re_embeds_an_up_to_date_index() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    let embedder = KeywordEmbedder::support_topics();
    SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();

    let store = SupportCorpusStore::rebuild(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.origin(), IndexOrigin::Built);
    assert_eq!(embedder.calls(), 4);
}

#[tokio::test]
async fn failed_rebuild_keeps_the_previous_index() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    SupportCorpusStore::load(&index, &corpus, KeywordEmbedder::support_topics())
        .await
        .unwrap();

    let result =
        SupportCorpusStore::rebuild(&index, &corpus, KeywordEmbedder::support_topics().failing())
            .await;
    assert!(matches!(result, Err(SupportBotError::CorpusLoad(_))));

    let embedder = KeywordEmbedder::support_topics();
    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.origin(), IndexOrigin::Loaded);
    assert_eq!(embedder.calls(), 0, "the old index must still be served");
}

#[tokio::test]
async fn changed_embedding_model_triggers_a_rebuild() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    SupportCorpusStore::load(&index, &corpus, KeywordEmbedder::support_topics())
        .await
        .unwrap();

    let embedder = KeywordEmbedder::support_topics().with_model_id("keyword-topics-v2");
    let store = SupportCorpusStore::load(&index, &corpus, embedder.clone())
        .await
        .unwrap();
    assert_eq!(store.origin(), IndexOrigin::Built);
    assert_eq!(embedder.calls(), 2);

    let again = KeywordEmbedder::support_topics().with_model_id("keyword-topics-v2");
    let store = SupportCorpusStore::load(&index, &corpus, again.clone())
        .await
        .unwrap();
    assert_eq!(store.origin(), IndexOrigin::Loaded);
    assert_eq!(again.calls(), 0);
}

#[tokio::test]
async fn query_in_another_vector_space_is_an_error() {
    let dir = tempdir().unwrap();
    let index = dir.path().join("idx.db");
    let corpus = write_corpus(dir.path(), &[SHIPPING_DELAY, REFUND_REQUEST]);
    SupportCorpusStore::load(&index, &corpus, KeywordEmbedder::support_topics())
        .await
        .unwrap();

    // Same model id, different vocabulary: vectors come back one dimension short.
    let narrower = KeywordEmbedder::new(&[&["refund"]]);
    let store = SupportCorpusStore::load(&index, &corpus, narrower)
        .await
        .unwrap();
    assert_eq!(store.origin(), IndexOrigin::Loaded);

    let err = store.query("I want a refund", 3).await.unwrap_err();
    assert!(format!("{err:#}").contains("dimensions"));
}
