use crate::classifier::Classifier;
use crate::config::{AdminConfig, Config};
use crate::db::{CredentialStore, Database, HistoryStore};
use crate::error::SentimindError;
use crate::feed::FeedAdapter;
use crate::handlers::{admin, analysis, session};
use crate::service::AnalysisService;
use crate::session::SessionRegistry;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Request bodies carry a username, a password or one piece of text.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct SentimindState {
    pub credentials: CredentialStore,
    pub history: HistoryStore,
    pub sessions: SessionRegistry,
    pub analysis: AnalysisService,
    pub admins: Arc<AdminConfig>,
    pub insecure_cookie: bool,
    cookie_key: Key,
}

impl SentimindState {
    pub fn new(
        db: &Database,
        classifier: Classifier,
        feed: FeedAdapter,
        cfg: &Config,
    ) -> Result<Self, SentimindError> {
        let cookie_key = match cfg.basic.cookie_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| {
                SentimindError::CookieKey(format!("cookie_secret must be at least 64 bytes: {e}"))
            })?,
            None => {
                warn!("no cookie_secret configured; sessions will not survive a restart");
                Key::generate()
            }
        };
        let sessions = SessionRegistry::new(Duration::from_secs(cfg.basic.session_idle_secs));
        let analysis = AnalysisService::new(classifier, db.history(), feed, sessions.clone());

        Ok(Self {
            credentials: db.credentials(),
            history: db.history(),
            sessions,
            analysis,
            admins: Arc::new(cfg.admin.clone()),
            insecure_cookie: cfg.basic.insecure_cookie,
            cookie_key,
        })
    }
}

impl FromRef<SentimindState> for Key {
    fn from_ref(state: &SentimindState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn sentimind_router(state: SentimindState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/session", get(session::current_session))
        .route("/api/signup", post(session::signup))
        .route("/api/login", post(session::login))
        .route("/api/start", post(session::start))
        .route("/api/logout", post(session::logout))
        .route("/api/analyze", post(analysis::analyze))
        .route("/api/admin/records", get(admin::records))
        .route("/api/admin/export", get(admin::export_csv))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
