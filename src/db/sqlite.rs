use crate::db::credentials::CredentialStore;
use crate::db::history::HistoryStore;
use crate::db::schema::SQLITE_INIT;
use crate::error::SentimindError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Process-wide storage handle. Each store operation checks a connection out
/// of the pool for its own duration and returns it when the query completes.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and ensure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, SentimindError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let db = Self { pool };
        db.init_schema().await?;
        info!(database_url = %database_url, "database ready");
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SentimindError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.pool.clone())
    }

    pub fn history(&self) -> HistoryStore {
        HistoryStore::new(self.pool.clone())
    }
}
