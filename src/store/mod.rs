/// Data access for links and comments
///
/// The [`Store`] trait is the only way resolvers reach persisted data. Two
/// backends implement it: [`SqliteStore`] for a real database and
/// [`MemoryStore`] for development and tests.

mod memory;
mod sqlite;
mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{Comment, Link, NewComment, NewLink};

use crate::config::{DatabaseConfig, StoreBackend};
use crate::error::{Result, StoreError};
use async_trait::async_trait;
use std::sync::Arc;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Typed CRUD over links and comments.
///
/// Implementations return rows in ascending id order and report a comment
/// pointing at a missing link as [`StoreError::ForeignKeyViolation`].
#[async_trait]
pub trait Store: Send + Sync {
    /// All links, or only those whose url or description contains `filter`.
    async fn find_links(&self, filter: Option<&str>) -> StoreResult<Vec<Link>>;

    async fn find_link(&self, id: i64) -> StoreResult<Option<Link>>;

    async fn find_links_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Link>>;

    async fn create_link(&self, new_link: NewLink) -> StoreResult<Link>;

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>>;

    async fn find_comments_by_link(&self, link_id: i64) -> StoreResult<Vec<Comment>>;

    async fn find_comments_by_links(&self, link_ids: &[i64]) -> StoreResult<Vec<Comment>>;

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment>;
}

/// Open the store described by `config`.
///
/// Called once at startup; the returned handle is shared by every request.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::Sqlite => {
            tracing::info!("Connecting to {}", config.url);
            Arc::new(SqliteStore::connect(&config.url, config.max_connections).await?)
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_example_links {
        seed_example_links(store.as_ref()).await?;
    }

    Ok(store)
}

/// Insert the two tutorial links when the store holds no links yet.
///
/// Returns the number of links inserted.
pub async fn seed_example_links(store: &dyn Store) -> StoreResult<usize> {
    if !store.find_links(None).await?.is_empty() {
        tracing::debug!("Store already has links, skipping seed");
        return Ok(0);
    }

    let seed = [
        NewLink {
            url: "https://graphql-yoga.com".to_string(),
            description: "The easiest way of setting up a GraphQL server".to_string(),
        },
        NewLink {
            url: "https://www.prisma.io".to_string(),
            description: "Next-generation Node.js and TypeScript ORM".to_string(),
        },
    ];

    let count = seed.len();
    for link in seed {
        store.create_link(link).await?;
    }

    tracing::info!("Seeded {} example links", count);
    Ok(count)
}
