//! SQLite connection handling and schema setup.
//!
//! The schema is derived from each crew kind's field table and created on
//! startup if missing; there is no separate migration history.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use fleetroster_core::{DomainError, FieldKind, ID_FIELD};
use fleetroster_crew::{CrewResource, Deceased, Doctor, Fighter, Shipwright};

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A record failed its field rules before reaching the database.
    #[error("invalid record: {0}")]
    Invalid(#[from] DomainError),

    /// A record could not be turned into column values.
    #[error("failed to encode record: {0}")]
    Encode(String),

    /// A stored row could not be turned back into a record.
    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Database handle with connection pool.
///
/// Cheap to clone; constructed once in `main` and handed to whoever needs
/// store access.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connect to `url` (e.g. `sqlite://fleet.db`, `sqlite::memory:`) and
    /// create any missing tables.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = if is_memory_url(url) {
            Self::memory_pool().await?
        } else {
            let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.ensure_schema().await?;
        info!(url = %url, "database connected");
        Ok(db)
    }

    /// Private in-memory database (tests/dev).
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    // Each call gets its own uniquely named shared-cache database so parallel
    // tests never see each other's rows. One connection keeps every query on
    // the same memory database; it is never recycled, since closing the last
    // connection drops the data.
    async fn memory_pool() -> Result<SqlitePool, StoreError> {
        let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:fleetroster-memdb-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            id
        );
        let options = SqliteConnectOptions::new()
            .filename(&uri)
            .shared_cache(true)
            .create_if_missing(true);

        Ok(SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for ddl in [
            create_table_sql::<Fighter>(),
            create_table_sql::<Doctor>(),
            create_table_sql::<Shipwright>(),
            create_table_sql::<Deceased>(),
            crate::users::CREATE_USERS_TABLE.to_string(),
        ] {
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn is_memory_url(url: &str) -> bool {
    matches!(url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

fn column_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Date => "TEXT",
        FieldKind::Integer => "INTEGER",
    }
}

pub(crate) fn create_table_sql<R: CrewResource>() -> String {
    let mut columns = vec![format!("\"{ID_FIELD}\" TEXT PRIMARY KEY NOT NULL")];
    columns.extend(
        R::FIELDS
            .iter()
            .map(|f| format!("\"{}\" {} NOT NULL", f.name, column_type(f.kind))),
    );
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        R::TABLE,
        columns.join(", ")
    )
}
