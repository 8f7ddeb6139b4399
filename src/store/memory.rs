use crate::error::StoreError;
use crate::store::types::{Comment, Link, NewComment, NewLink};
use crate::store::{Store, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::RwLock;

/// In-memory store for development and tests.
///
/// Rows live in insertion-ordered maps, so iteration is already in id order.
/// Referential integrity is checked on comment creation just like a
/// database with foreign keys enabled.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    links: IndexMap<i64, Link>,
    comments: IndexMap<i64, Comment>,
    last_link_id: i64,
    last_comment_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_links(&self, filter: Option<&str>) -> StoreResult<Vec<Link>> {
        let tables = self.read()?;
        Ok(tables
            .links
            .values()
            .filter(|link| filter.is_none_or(|needle| link.matches(needle)))
            .cloned()
            .collect())
    }

    async fn find_link(&self, id: i64) -> StoreResult<Option<Link>> {
        Ok(self.read()?.links.get(&id).cloned())
    }

    async fn find_links_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Link>> {
        let tables = self.read()?;
        Ok(tables
            .links
            .values()
            .filter(|link| ids.contains(&link.id))
            .cloned()
            .collect())
    }

    async fn create_link(&self, new_link: NewLink) -> StoreResult<Link> {
        let mut tables = self.write()?;
        tables.last_link_id += 1;

        let link = Link {
            id: tables.last_link_id,
            url: new_link.url,
            description: new_link.description,
            created_at: Utc::now(),
        };
        tables.links.insert(link.id, link.clone());

        tracing::debug!("Created link {}", link.id);
        Ok(link)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn find_comments_by_link(&self, link_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.read()?;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.link_id == Some(link_id))
            .cloned()
            .collect())
    }

    async fn find_comments_by_links(&self, link_ids: &[i64]) -> StoreResult<Vec<Comment>> {
        let tables = self.read()?;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.link_id.is_some_and(|id| link_ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment> {
        let mut tables = self.write()?;

        if let Some(link_id) = new_comment.link_id {
            if !tables.links.contains_key(&link_id) {
                return Err(StoreError::ForeignKeyViolation(format!(
                    "comments.link_id {} references no link",
                    link_id
                )));
            }
        }

        tables.last_comment_id += 1;
        let comment = Comment {
            id: tables.last_comment_id,
            body: new_comment.body,
            link_id: new_comment.link_id,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());

        tracing::debug!("Created comment {} on link {:?}", comment.id, comment.link_id);
        Ok(comment)
    }
}
