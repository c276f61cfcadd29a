use async_trait::async_trait;
use chrono::Utc;
use emblm_protocol::{BlogDraft, BlogPost};
use tokio::sync::RwLock;

use crate::{new_post_id, validate_draft, BlogStore, StoreError};

/// In-process store for tests and `store.backend = "memory"`. Nothing is persisted.
#[derive(Default)]
pub struct MemoryBlogStore {
    // Insertion order; newest last.
    posts: RwLock<Vec<BlogPost>>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, draft: BlogDraft) -> Result<BlogPost, StoreError> {
        validate_draft(&draft)?;
        let post = BlogPost {
            id: new_post_id(),
            draft,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        let guard = self.posts.read().await;
        let mut out: Vec<BlogPost> = guard.iter().rev().cloned().collect();
        // Stable sort keeps newer inserts first on equal timestamps.
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: &str, draft: BlogDraft) -> Result<Option<BlogPost>, StoreError> {
        validate_draft(&draft)?;
        let mut guard = self.posts.write().await;
        let Some(post) = guard.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        post.draft = draft;
        post.updated_at = Some(Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut guard = self.posts.write().await;
        let before = guard.len();
        guard.retain(|p| p.id != id);
        Ok(guard.len() != before)
    }
}
