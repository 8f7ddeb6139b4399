pub mod config;
pub mod error;
pub mod schema;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use config::{Config, DatabaseConfig, GraphqlConfig, ServerConfig, StoreBackend};
pub use error::{ApiError, HackernewsError, Result, StoreError};
pub use schema::{create_context, AppContext, GraphQLContext, SchemaBuilder};
pub use store::{MemoryStore, SqliteStore, Store};
