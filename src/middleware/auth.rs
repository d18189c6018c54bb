use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::error::SentimindError;
use crate::middleware::session::CurrentSession;
use crate::server::SentimindState;

/// Admits only a logged-in user named in the admin allow-list.
///
/// The history store performs no authorization of its own; every route that
/// reads or exports the full log goes through this extractor.
pub struct RequireAdmin {
    pub session: CurrentSession,
    pub username: String,
}

pub fn ensure_admin(state: &SentimindState, username: Option<&str>) -> Result<String, SentimindError> {
    let username = username.ok_or(SentimindError::NotLoggedIn)?;
    if !state.admins.is_admin(username) {
        warn!(username = %username, "non-admin requested the history log");
        return Err(SentimindError::NotAdmin(username.to_string()));
    }
    Ok(username.to_string())
}

impl FromRequestParts<SentimindState> for RequireAdmin {
    type Rejection = SentimindError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SentimindState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(session) = CurrentSession::from_request_parts(parts, state).await;
        let username = ensure_admin(state, session.state(state).current_user())?;
        Ok(Self { session, username })
    }
}
