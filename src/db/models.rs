use crate::types::Label;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub username: String,
    pub password: String,
}

/// One row of the analysis log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: i64,
    pub username: String,
    pub text: String,
    pub prediction: Label,
    pub confidence: f64,
    pub timestamp: String,
}
