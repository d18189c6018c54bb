use crate::db::models::HistoryRecord;
use crate::db::sqlite::SqlitePool;
use crate::error::SentimindError;
use crate::types::Label;
use chrono::Local;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only log of every classification. Performs no authorization;
/// callers gate `read_all` on the admin allow-list.
#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one row stamped with the current local time and return it.
    pub async fn append(
        &self,
        username: &str,
        text: &str,
        label: Label,
        confidence: f64,
    ) -> Result<HistoryRecord, SentimindError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let result = sqlx::query(
            r#"INSERT INTO sentiment_data (username, text, prediction, confidence, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(username)
        .bind(text)
        .bind(label.as_str())
        .bind(confidence)
        .bind(&timestamp)
        .execute(&self.pool)
        .await?;

        Ok(HistoryRecord {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            text: text.to_string(),
            prediction: label,
            confidence,
            timestamp,
        })
    }

    /// Every row, oldest first.
    pub async fn read_all(&self) -> Result<Vec<HistoryRecord>, SentimindError> {
        let rows = sqlx::query(
            r#"SELECT id, username, text, prediction, confidence, timestamp
               FROM sentiment_data ORDER BY id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn count(&self) -> Result<i64, SentimindError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sentiment_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    // Columns are nullable in the legacy schema; absent values read as empty.
    fn row_to_model(row: SqliteRow) -> Result<HistoryRecord, SentimindError> {
        let id: i64 = row.try_get("id")?;
        let username: Option<String> = row.try_get("username")?;
        let text: Option<String> = row.try_get("text")?;
        let prediction: Option<String> = row.try_get("prediction")?;
        let confidence: Option<f64> = row.try_get("confidence")?;
        let timestamp: Option<String> = row.try_get("timestamp")?;

        Ok(HistoryRecord {
            id,
            username: username.unwrap_or_default(),
            text: text.unwrap_or_default(),
            prediction: Label::from_stored(prediction.as_deref().unwrap_or_default()),
            confidence: confidence.unwrap_or_default(),
            timestamp: timestamp.unwrap_or_default(),
        })
    }
}
