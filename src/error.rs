use async_graphql::ErrorExtensions;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HackernewsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HackernewsError {
    fn from(err: toml::de::Error) -> Self {
        HackernewsError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for HackernewsError {
    fn from(err: toml::ser::Error) -> Self {
        HackernewsError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<config::ConfigError> for HackernewsError {
    fn from(err: config::ConfigError) -> Self {
        HackernewsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HackernewsError>;

/// Failures reported by a [`Store`](crate::store::Store) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A row referenced a parent that does not exist.
    #[error("Foreign key constraint failed: {0}")]
    ForeignKeyViolation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Errors raised at the resolver boundary and shown to API clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid ID '{0}'")]
    InvalidId(String),

    #[error("Cannot post comment on non-existing link with id '{0}'.")]
    LinkNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Store failure shared by every field waiting on one batched load.
    #[error(transparent)]
    Batch(Arc<StoreError>),
}

impl ApiError {
    /// Value of `extensions.code` in the GraphQL error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidId(_) | ApiError::LinkNotFound(_) => "BAD_USER_INPUT",
            ApiError::Store(_) | ApiError::Batch(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code.to_string()))
    }
}
