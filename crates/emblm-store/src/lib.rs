//! Blog post persistence behind the [`BlogStore`] trait.

use async_trait::async_trait;
use emblm_protocol::{BlogDraft, BlogPost};

pub mod content;
mod memory;
mod sqlite;

pub use memory::MemoryBlogStore;
pub use sqlite::SqliteBlogStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid post: {0}")]
    Invalid(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("join error: {0}")]
    Join(String),
}

/// Create/read/update/delete over the `blogs` collection.
///
/// `list` returns posts newest first by creation time. Ids and timestamps are
/// assigned by the store.
#[async_trait]
pub trait BlogStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn create(&self, draft: BlogDraft) -> Result<BlogPost, StoreError>;

    async fn list(&self) -> Result<Vec<BlogPost>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;

    /// Replace the author fields of an existing post; `None` when `id` is unknown.
    async fn update(&self, id: &str, draft: BlogDraft) -> Result<Option<BlogPost>, StoreError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

pub(crate) fn validate_draft(draft: &BlogDraft) -> Result<(), StoreError> {
    if draft.title.trim().is_empty() {
        return Err(StoreError::Invalid("title is required".into()));
    }
    if draft.content.trim().is_empty() {
        return Err(StoreError::Invalid("content is required".into()));
    }
    if draft.category.trim().is_empty() {
        return Err(StoreError::Invalid("category is required".into()));
    }
    Ok(())
}

pub(crate) fn new_post_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
