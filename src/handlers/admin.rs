use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::info;

use crate::error::SentimindError;
use crate::middleware::RequireAdmin;
use crate::server::SentimindState;
use crate::service::{EXPORT_FILENAME, HistoryOverview, history_to_csv};

/// GET /api/admin/records -> the full log plus chart aggregates.
pub async fn records(
    State(app): State<SentimindState>,
    admin: RequireAdmin,
) -> Result<impl IntoResponse, SentimindError> {
    let records = app.history.read_all().await?;
    info!(username = %admin.username, count = records.len(), "history log viewed");
    Ok((
        admin.session.jar,
        Json(HistoryOverview::from_records(records)),
    ))
}

/// GET /api/admin/export -> the full log as a CSV download.
pub async fn export_csv(
    State(app): State<SentimindState>,
    admin: RequireAdmin,
) -> Result<impl IntoResponse, SentimindError> {
    let records = app.history.read_all().await?;
    info!(username = %admin.username, count = records.len(), "history log exported");
    Ok((
        admin.session.jar,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        history_to_csv(&records),
    ))
}
