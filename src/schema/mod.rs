/// GraphQL schema for the Hackernews API
///
/// This module declares the type system with async-graphql's dynamic schema
/// and maps every field to its resolver.

mod builder;
mod context;
mod ids;
mod loader;
mod resolver;
mod scalars;
mod types;

pub use builder::SchemaBuilder;
pub use context::{create_context, AppContext, GraphQLContext, Loaders};
pub use ids::{format_id, parse_id};
pub use loader::{CommentsByLinkLoader, LinkLoader};
pub use resolver::INFO;
pub use scalars::{register_custom_scalars, DATE_TIME};
pub use types::{COMMENT, LINK};

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response};

/// Execute `request` with a fresh context built from `app`
pub async fn execute(schema: &Schema, app: &AppContext, request: impl Into<Request>) -> Response {
    let request = request.into().data(create_context(app));
    schema.execute(request).await
}
