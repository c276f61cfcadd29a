use std::sync::Arc;

use emblm_protocol::BlogDraft;
use emblm_store::{BlogStore, MemoryBlogStore, SqliteBlogStore, StoreError};

fn draft(title: &str) -> BlogDraft {
    BlogDraft {
        title: title.into(),
        content: "<p>Some words here</p>".into(),
        category: "Brand Strategy".into(),
        read_time: Some("1 min".into()),
        ..Default::default()
    }
}

async fn exercise(store: Arc<dyn BlogStore>) {
    let first = store.create(draft("first")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.create(draft("second")).await.unwrap();
    assert_ne!(first.id, second.id);

    let listed = store.list().await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|p| p.title()).collect();
    assert_eq!(titles, vec!["second", "first"]);

    let mut changed = draft("first, edited");
    changed.ai_enhanced = true;
    changed.ai_badge = Some("Gemini Polished".into());
    let updated = store.update(&first.id, changed).await.unwrap().unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.created_at, first.created_at);
    assert!(updated.updated_at.is_some());
    assert!(updated.draft.ai_enhanced);

    let fetched = store.get(&first.id).await.unwrap().unwrap();
    assert_eq!(fetched.title(), "first, edited");

    assert!(store.delete(&second.id).await.unwrap());
    assert!(!store.delete(&second.id).await.unwrap());
    assert!(store.get(&second.id).await.unwrap().is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

async fn rejects_blank_title(store: Arc<dyn BlogStore>) {
    let err = store.create(draft("   ")).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_store_contract() {
    exercise(Arc::new(MemoryBlogStore::new())).await;
    rejects_blank_title(Arc::new(MemoryBlogStore::new())).await;
}

#[tokio::test]
async fn sqlite_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    exercise(Arc::new(SqliteBlogStore::open(dir.path()).unwrap())).await;
    let dir = tempfile::tempdir().unwrap();
    rejects_blank_title(Arc::new(SqliteBlogStore::open(dir.path()).unwrap())).await;
}
