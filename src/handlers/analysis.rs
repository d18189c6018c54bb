use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::error::SentimindError;
use crate::middleware::CurrentSession;
use crate::server::SentimindState;
use crate::service::{FeedAnalysis, TextAnalysis};

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Text,
    Feed,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub source: InputSource,
    #[serde(default)]
    pub input: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AnalyzeResponse {
    Text(TextAnalysis),
    Feed(FeedAnalysis),
}

/// POST /api/analyze -> classify free text, or an identity's recent posts.
pub async fn analyze(
    State(app): State<SentimindState>,
    session: CurrentSession,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, SentimindError> {
    let response = match req.source {
        InputSource::Text => {
            AnalyzeResponse::Text(app.analysis.analyze_text(session.id, &req.input).await?)
        }
        InputSource::Feed => AnalyzeResponse::Feed(
            app.analysis
                .analyze_feed(session.id, &req.input, req.limit)
                .await?,
        ),
    };
    Ok((session.jar, Json(response)))
}
