use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use emblm_protocol::{BlogDraft, BlogPost};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::{new_post_id, validate_draft, BlogStore, StoreError};

const COLUMNS: &str = "id,title,content,category,image_url,author,excerpt,tags,read_time,ai_enhanced,ai_badge,created_at,updated_at";

/// SQLite-backed store. Each call opens its own connection; blocking work runs on
/// the tokio blocking pool.
#[derive(Clone)]
pub struct SqliteBlogStore {
    db_path: PathBuf,
    busy_ms: u64,
}

impl SqliteBlogStore {
    /// Open (or create) `blogs.sqlite` under `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let db_path = dir.join("blogs.sqlite");
        // Busy timeout (default 5000ms; override with EMBLM_SQLITE_BUSY_MS)
        let busy_ms: u64 = std::env::var("EMBLM_SQLITE_BUSY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        let store = Self { db_path, busy_ms };
        let conn = store.conn()?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init_schema(&conn)?;
        tracing::debug!(target: "emblm::store", path = %store.db_path.display(), "blog store opened");
        Ok(store)
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS blogs (
              id TEXT PRIMARY KEY,
              title TEXT NOT NULL,
              content TEXT NOT NULL,
              category TEXT NOT NULL,
              image_url TEXT,
              author TEXT,
              excerpt TEXT,
              tags TEXT NOT NULL DEFAULT '[]',
              read_time TEXT,
              ai_enhanced INTEGER NOT NULL DEFAULT 0,
              ai_badge TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_blogs_created ON blogs(created_at);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(std::time::Duration::from_millis(self.busy_ms))?;
        Ok(conn)
    }

    fn row_to_post(row: &Row<'_>) -> rusqlite::Result<(BlogPost, String)> {
        let tags_json: String = row.get(7)?;
        let post = BlogPost {
            id: row.get(0)?,
            draft: BlogDraft {
                title: row.get(1)?,
                content: row.get(2)?,
                category: row.get(3)?,
                image_url: row.get(4)?,
                author: row.get(5)?,
                excerpt: row.get(6)?,
                tags: Vec::new(),
                read_time: row.get(8)?,
                ai_enhanced: row.get::<_, i64>(9)? != 0,
                ai_badge: row.get(10)?,
            },
            created_at: row.get::<_, DateTime<Utc>>(11)?,
            updated_at: row.get::<_, Option<DateTime<Utc>>>(12)?,
        };
        Ok((post, tags_json))
    }

    fn decode(pair: (BlogPost, String)) -> Result<BlogPost, StoreError> {
        let (mut post, tags_json) = pair;
        post.draft.tags = serde_json::from_str(&tags_json)?;
        Ok(post)
    }

    pub fn insert_post(&self, draft: BlogDraft) -> Result<BlogPost, StoreError> {
        validate_draft(&draft)?;
        let post = BlogPost {
            id: new_post_id(),
            draft,
            created_at: Utc::now(),
            updated_at: None,
        };
        let d = &post.draft;
        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT INTO blogs({COLUMNS}) VALUES(?,?,?,?,?,?,?,?,?,?,?,?,?)"),
            params![
                post.id,
                d.title,
                d.content,
                d.category,
                d.image_url,
                d.author,
                d.excerpt,
                serde_json::to_string(&d.tags)?,
                d.read_time,
                d.ai_enhanced as i64,
                d.ai_badge,
                post.created_at,
                post.updated_at,
            ],
        )?;
        Ok(post)
    }

    pub fn list_posts(&self) -> Result<Vec<BlogPost>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], Self::row_to_post)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(Self::decode(r?)?);
        }
        Ok(out)
    }

    pub fn get_post(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM blogs WHERE id=? LIMIT 1"))?;
        match stmt.query_row([id], Self::row_to_post).optional()? {
            Some(pair) => Ok(Some(Self::decode(pair)?)),
            None => Ok(None),
        }
    }

    pub fn update_post(&self, id: &str, draft: BlogDraft) -> Result<Option<BlogPost>, StoreError> {
        validate_draft(&draft)?;
        let now = Utc::now();
        let conn = self.conn()?;
        let n = conn.execute(
            "UPDATE blogs SET title=?, content=?, category=?, image_url=?, author=?, excerpt=?, tags=?, read_time=?, ai_enhanced=?, ai_badge=?, updated_at=? WHERE id=?",
            params![
                draft.title,
                draft.content,
                draft.category,
                draft.image_url,
                draft.author,
                draft.excerpt,
                serde_json::to_string(&draft.tags)?,
                draft.read_time,
                draft.ai_enhanced as i64,
                draft.ai_badge,
                now,
                id,
            ],
        )?;
        if n == 0 {
            return Ok(None);
        }
        drop(conn);
        self.get_post(id)
    }

    pub fn delete_post(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let n = conn.execute("DELETE FROM blogs WHERE id=?", [id])?;
        Ok(n > 0)
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(SqliteBlogStore) -> Result<T, StoreError> + Send + 'static,
    {
        let k = self.clone();
        tokio::task::spawn_blocking(move || f(k))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

#[async_trait]
impl BlogStore for SqliteBlogStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, draft: BlogDraft) -> Result<BlogPost, StoreError> {
        self.blocking(move |k| k.insert_post(draft)).await
    }

    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        self.blocking(|k| k.list_posts()).await
    }

    async fn get(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let s = id.to_string();
        self.blocking(move |k| k.get_post(&s)).await
    }

    async fn update(&self, id: &str, draft: BlogDraft) -> Result<Option<BlogPost>, StoreError> {
        let s = id.to_string();
        self.blocking(move |k| k.update_post(&s, draft)).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let s = id.to_string();
        self.blocking(move |k| k.delete_post(&s)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> BlogDraft {
        BlogDraft {
            title: title.into(),
            content: "<p>body</p>".into(),
            category: "Design".into(),
            tags: vec!["a".into(), "b".into()],
            ..Default::default()
        }
    }

    #[test]
    fn tags_survive_storage() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteBlogStore::open(dir.path()).unwrap();
        let post = store.insert_post(draft("one")).unwrap();
        let back = store.get_post(&post.id).unwrap().unwrap();
        assert_eq!(back.draft.tags, vec!["a", "b"]);
        assert_eq!(back.created_at, post.created_at);
    }

    #[test]
    fn reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = SqliteBlogStore::open(dir.path()).unwrap();
            store.insert_post(draft("kept")).unwrap().id
        };
        let store = SqliteBlogStore::open(dir.path()).unwrap();
        assert_eq!(store.get_post(&id).unwrap().unwrap().title(), "kept");
    }

    #[test]
    fn unknown_ids_are_none_or_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteBlogStore::open(dir.path()).unwrap();
        assert!(store.get_post("missing").unwrap().is_none());
        assert!(store.update_post("missing", draft("x")).unwrap().is_none());
        assert!(!store.delete_post("missing").unwrap());
    }
}
