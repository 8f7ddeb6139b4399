/// Per-request execution context
///
/// [`AppContext`] is built once at startup and holds the process-wide store.
/// [`create_context`] turns it into the [`GraphQLContext`] attached to each
/// request, which is what resolvers read through `ctx.data()`.

use crate::schema::loader::{CommentsByLinkLoader, LinkLoader};
use crate::store::Store;
use async_graphql::dataloader::DataLoader;
use std::sync::Arc;

/// Process-wide dependencies shared by every request
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub batch_relations: bool,
}

impl AppContext {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            batch_relations: false,
        }
    }

    pub fn with_batch_relations(mut self, batch_relations: bool) -> Self {
        self.batch_relations = batch_relations;
        self
    }
}

/// Request-scoped loaders, present only in batched mode
pub struct Loaders {
    pub comments_by_link: DataLoader<CommentsByLinkLoader>,
    pub links: DataLoader<LinkLoader>,
}

/// Context handed to every resolver of one request
pub struct GraphQLContext {
    pub store: Arc<dyn Store>,
    pub loaders: Option<Loaders>,
}

/// Build the context for a single request.
///
/// Loaders are created fresh each time so their caches never outlive the
/// request that filled them.
pub fn create_context(app: &AppContext) -> GraphQLContext {
    let loaders = app.batch_relations.then(|| Loaders {
        comments_by_link: DataLoader::new(
            CommentsByLinkLoader::new(app.store.clone()),
            tokio::spawn,
        ),
        links: DataLoader::new(LinkLoader::new(app.store.clone()), tokio::spawn),
    });

    GraphQLContext {
        store: app.store.clone(),
        loaders,
    }
}
