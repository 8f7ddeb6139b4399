use crate::error::StoreError;
use crate::store::types::{Comment, Link, NewComment, NewLink};
use crate::store::{Store, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;

const LINK_COLUMNS: &str = "id, url, description, created_at";
const COMMENT_COLUMNS: &str = "id, body, link_id, created_at";

/// Relational store backed by SQLite through `sqlx`.
///
/// Foreign keys are switched on for every pooled connection, so the database
/// itself rejects comments on links that do not exist.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://hackernews.db`) and create the tables.
    ///
    /// In-memory URLs get a single connection that never expires, since every
    /// SQLite connection to `:memory:` opens its own private database.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Fresh private in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Wrap an existing pool, creating the tables if needed.
    pub async fn from_pool(pool: SqlitePool) -> StoreResult<Self> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Create the `links` and `comments` tables (idempotent).
///
/// `AUTOINCREMENT` keeps ids from being reused after the highest row is gone.
pub async fn ensure_schema(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS links (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            body TEXT NOT NULL,
            link_id INTEGER NULL REFERENCES links(id),
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_link_id ON comments(link_id)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Escape `LIKE` wildcards so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn translate_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.kind() == ErrorKind::ForeignKeyViolation => {
            StoreError::ForeignKeyViolation(db_err.message().to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_links(&self, filter: Option<&str>) -> StoreResult<Vec<Link>> {
        let links = match filter {
            Some(needle) => {
                let sql = format!(
                    "SELECT {} FROM links \
                     WHERE url LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\' \
                     ORDER BY id",
                    LINK_COLUMNS
                );
                tracing::debug!("Executing query: {} [needle={:?}]", sql, needle);

                let pattern = like_pattern(needle);
                sqlx::query_as::<_, Link>(&sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {} FROM links ORDER BY id", LINK_COLUMNS);
                tracing::debug!("Executing query: {}", sql);

                sqlx::query_as::<_, Link>(&sql).fetch_all(&self.pool).await?
            }
        };

        Ok(links)
    }

    async fn find_link(&self, id: i64) -> StoreResult<Option<Link>> {
        let sql = format!("SELECT {} FROM links WHERE id = ?", LINK_COLUMNS);
        tracing::debug!("Executing query: {} [id={}]", sql, id);

        Ok(sqlx::query_as::<_, Link>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_links_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Link>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM links WHERE id IN (", LINK_COLUMNS));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        tracing::debug!("Executing query: {}", builder.sql());
        Ok(builder.build_query_as::<Link>().fetch_all(&self.pool).await?)
    }

    async fn create_link(&self, new_link: NewLink) -> StoreResult<Link> {
        let sql = format!(
            "INSERT INTO links (url, description, created_at) VALUES (?, ?, ?) RETURNING {}",
            LINK_COLUMNS
        );

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(&new_link.url)
            .bind(&new_link.description)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created link {}", link.id);
        Ok(link)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Option<Comment>> {
        let sql = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS);
        tracing::debug!("Executing query: {} [id={}]", sql, id);

        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_comments_by_link(&self, link_id: i64) -> StoreResult<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE link_id = ? ORDER BY id",
            COMMENT_COLUMNS
        );
        tracing::debug!("Executing query: {} [link_id={}]", sql, link_id);

        Ok(sqlx::query_as::<_, Comment>(&sql)
            .bind(link_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_comments_by_links(&self, link_ids: &[i64]) -> StoreResult<Vec<Comment>> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM comments WHERE link_id IN (",
            COMMENT_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in link_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        tracing::debug!("Executing query: {}", builder.sql());
        Ok(builder.build_query_as::<Comment>().fetch_all(&self.pool).await?)
    }

    async fn create_comment(&self, new_comment: NewComment) -> StoreResult<Comment> {
        let sql = format!(
            "INSERT INTO comments (body, link_id, created_at) VALUES (?, ?, ?) RETURNING {}",
            COMMENT_COLUMNS
        );

        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(&new_comment.body)
            .bind(new_comment.link_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(translate_insert_error)?;

        tracing::debug!("Created comment {} on link {:?}", comment.id, comment.link_id);
        Ok(comment)
    }
}
