/// Request-scoped batch loaders for relation fields
///
/// Every `Link.comments` / `Comment.link` lookup issued while one response is
/// being built is coalesced into a single store call per relation.

use crate::error::StoreError;
use crate::store::{Comment, Link, Store};
use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;

/// Loads the comments of many links at once, keyed by link id
pub struct CommentsByLinkLoader {
    store: Arc<dyn Store>,
}

impl CommentsByLinkLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<i64> for CommentsByLinkLoader {
    type Value = Vec<Comment>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Self::Value>, Self::Error> {
        tracing::debug!("Batch loading comments for {} links", keys.len());

        let comments = self.store.find_comments_by_links(keys).await.map_err(Arc::new)?;

        let mut grouped: HashMap<i64, Vec<Comment>> = HashMap::with_capacity(keys.len());
        for comment in comments {
            if let Some(link_id) = comment.link_id {
                grouped.entry(link_id).or_default().push(comment);
            }
        }
        Ok(grouped)
    }
}

/// Loads links by id
pub struct LinkLoader {
    store: Arc<dyn Store>,
}

impl LinkLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<i64> for LinkLoader {
    type Value = Link;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Self::Value>, Self::Error> {
        tracing::debug!("Batch loading {} links", keys.len());

        let links = self.store.find_links_by_ids(keys).await.map_err(Arc::new)?;
        Ok(links.into_iter().map(|link| (link.id, link)).collect())
    }
}
