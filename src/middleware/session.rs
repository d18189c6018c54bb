use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use std::convert::Infallible;
use time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::server::SentimindState;
use crate::session::{SessionId, SessionState};

pub const SESSION_COOKIE: &str = "sentimind_session";

/// The caller's session id, read from the encrypted session cookie or newly issued.
///
/// The cookie is re-issued on every request so its max-age slides with the
/// session's idle timeout. Handlers return `jar` with their response.
pub struct CurrentSession {
    pub id: SessionId,
    pub jar: PrivateCookieJar,
}

impl CurrentSession {
    pub fn state(&self, app: &SentimindState) -> SessionState {
        app.sessions.snapshot(self.id)
    }
}

impl FromRequestParts<SentimindState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SentimindState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<axum_extra::extract::cookie::Key>::from_request_parts(
            parts, state,
        )
        .await?;

        let id = match jar
            .get(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok())
        {
            Some(id) => id,
            None => {
                let id = state.sessions.issue_id();
                debug!(session = %id, "issuing session cookie");
                id
            }
        };
        let max_age = i64::try_from(state.sessions.idle_timeout().as_secs()).unwrap_or(i64::MAX);
        let jar = jar.add(build_cookie(id, state.insecure_cookie, max_age));
        Ok(Self { id, jar })
    }
}

fn build_cookie(id: SessionId, insecure: bool, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!insecure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}
