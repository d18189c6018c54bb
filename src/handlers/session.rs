use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SentimindError;
use crate::middleware::CurrentSession;
use crate::server::SentimindState;
use crate::service::SentimentCounts;
use crate::session::{Page, SessionState};

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// What the client needs to decide which screen to render.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub page: Page,
    pub logged_in: bool,
    pub current_user: Option<String>,
    pub is_admin: bool,
    pub history: SentimentCounts,
}

impl SessionView {
    fn new(app: &SentimindState, state: &SessionState) -> Self {
        let current_user = state.current_user().map(str::to_string);
        Self {
            page: state.page(),
            logged_in: state.logged_in(),
            is_admin: current_user
                .as_deref()
                .is_some_and(|u| app.admins.is_admin(u)),
            current_user,
            history: state.history().iter().copied().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// GET /api/session
pub async fn current_session(
    State(app): State<SentimindState>,
    session: CurrentSession,
) -> impl IntoResponse {
    let view = SessionView::new(&app, &session.state(&app));
    (session.jar, Json(view))
}

/// POST /api/signup -> registers an account; the session stays where it is.
pub async fn signup(
    State(app): State<SentimindState>,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, SentimindError> {
    app.credentials.register(&body.username, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: "Account created!".to_string(),
        }),
    ))
}

/// POST /api/login -> Login to Landing when the credentials match.
pub async fn login(
    State(app): State<SentimindState>,
    session: CurrentSession,
    Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, SentimindError> {
    if !app
        .credentials
        .authenticate(&body.username, &body.password)
        .await?
    {
        info!(username = %body.username, "login rejected");
        return Err(SentimindError::InvalidCredentials);
    }
    app.sessions
        .update(session.id, |s| s.authenticated(body.username.clone()))?;
    info!(username = %body.username, "logged in");

    let view = SessionView::new(&app, &session.state(&app));
    Ok((session.jar, Json(view)))
}

/// POST /api/start -> Landing to Analysis.
pub async fn start(
    State(app): State<SentimindState>,
    session: CurrentSession,
) -> Result<impl IntoResponse, SentimindError> {
    app.sessions.update(session.id, SessionState::start)?;
    let view = SessionView::new(&app, &session.state(&app));
    Ok((session.jar, Json(view)))
}

/// POST /api/logout -> back to Login; the session's transient history is dropped.
pub async fn logout(
    State(app): State<SentimindState>,
    session: CurrentSession,
) -> impl IntoResponse {
    if let Some(user) = app.sessions.logout(session.id) {
        info!(username = %user, "logged out");
    }
    let view = SessionView::new(&app, &session.state(&app));
    (session.jar, Json(view))
}
