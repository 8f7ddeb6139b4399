use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub graphql: GraphqlConfig,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind the server to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bind.trim().is_empty() {
            return Err("Server bind address must not be empty".to_string());
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    4000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

/// Which [`Store`](crate::store::Store) implementation to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection URL (e.g., "sqlite://hackernews.db"), ignored by the memory backend
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Insert the two tutorial links when the store is empty
    #[serde(default)]
    pub seed_example_links: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
            seed_example_links: false,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Sqlite && !self.url.starts_with("sqlite:") {
            return Err(format!(
                "Database url '{}' must start with 'sqlite:' for the sqlite backend",
                self.url
            ));
        }

        if self.max_connections == 0 {
            return Err("Database max_connections must be at least 1".to_string());
        }

        Ok(())
    }
}

fn default_database_url() -> String {
    "sqlite://hackernews.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// GraphQL endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlConfig {
    /// Resolve `Link.comments` and `Comment.link` through request-scoped
    /// data loaders instead of one query per parent
    #[serde(default)]
    pub batch_relations: bool,

    /// Serve GraphQL Playground at `/playground`
    #[serde(default = "default_playground")]
    pub playground: bool,

    /// Reject queries nested deeper than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            batch_relations: false,
            playground: default_playground(),
            max_depth: None,
        }
    }
}

fn default_playground() -> bool {
    true
}
