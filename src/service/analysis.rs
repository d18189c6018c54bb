use crate::classifier::Classifier;
use crate::db::{HistoryRecord, HistoryStore};
use crate::error::{SentimindError, ValidationError};
use crate::feed::FeedAdapter;
use crate::service::summary::SentimentCounts;
use crate::session::{SessionId, SessionRegistry};
use crate::types::Label;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Result of classifying one piece of free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub record: HistoryRecord,
    pub session: SentimentCounts,
}

/// Result of classifying an identity's recent posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedAnalysis {
    pub identity: String,
    pub records: Vec<HistoryRecord>,
    /// Word-cloud inputs, split by label.
    pub positive_texts: Vec<String>,
    pub negative_texts: Vec<String>,
    pub warning: Option<String>,
    pub session: SentimentCounts,
}

/// Runs one analysis interaction: classify, append to the log, record in the session.
#[derive(Clone)]
pub struct AnalysisService {
    classifier: Classifier,
    history: HistoryStore,
    feed: FeedAdapter,
    sessions: SessionRegistry,
}

impl AnalysisService {
    pub fn new(
        classifier: Classifier,
        history: HistoryStore,
        feed: FeedAdapter,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            classifier,
            history,
            feed,
            sessions,
        }
    }

    pub async fn analyze_text(
        &self,
        session: SessionId,
        text: &str,
    ) -> Result<TextAnalysis, SentimindError> {
        let user = self.analyst(session)?;
        let prediction = self.classifier.predict(text)?;
        let record = self
            .history
            .append(&user, text, prediction.label, prediction.confidence)
            .await?;
        info!(username = %user, id = record.id, label = %record.prediction, "text analysed");
        self.record(session, record.prediction);

        Ok(TextAnalysis {
            record,
            session: self.session_summary(session),
        })
    }

    /// A failed fetch appends nothing and surfaces the adapter's warning.
    pub async fn analyze_feed(
        &self,
        session: SessionId,
        identity: &str,
        limit: Option<usize>,
    ) -> Result<FeedAnalysis, SentimindError> {
        let user = self.analyst(session)?;
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(ValidationError::EmptyInput.into());
        }

        let fetch = self.feed.fetch_recent(identity, limit).await;
        let mut records = Vec::with_capacity(fetch.posts.len());
        let mut positive_texts = Vec::new();
        let mut negative_texts = Vec::new();

        for post in fetch.posts {
            let Ok(prediction) = self.classifier.predict(&post) else {
                debug!(identity = %identity, "skipping blank post");
                continue;
            };
            let record = self
                .history
                .append(&user, &post, prediction.label, prediction.confidence)
                .await?;
            self.record(session, record.prediction);
            match record.prediction {
                Label::Positive => positive_texts.push(post),
                Label::Negative => negative_texts.push(post),
            }
            records.push(record);
        }
        info!(
            username = %user,
            identity = %identity,
            count = records.len(),
            "feed analysed"
        );

        Ok(FeedAnalysis {
            identity: identity.to_string(),
            records,
            positive_texts,
            negative_texts,
            warning: fetch.warning,
            session: self.session_summary(session),
        })
    }

    pub fn session_summary(&self, session: SessionId) -> SentimentCounts {
        self.sessions.snapshot(session).history().iter().copied().collect()
    }

    fn analyst(&self, session: SessionId) -> Result<String, SentimindError> {
        let state = self.sessions.snapshot(session);
        if !state.logged_in() {
            return Err(SentimindError::NotLoggedIn);
        }
        Ok(state.analyst()?.to_string())
    }

    // The row is already stored; a session that moved on meanwhile only loses the tally.
    fn record(&self, session: SessionId, label: Label) {
        if let Err(e) = self.sessions.update(session, |s| s.record(label)) {
            warn!(error = %e, "session changed page during analysis");
        }
    }
}
