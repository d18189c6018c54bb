#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use sentimind::classifier::{Classifier, SentimentModel};
use sentimind::config::Config;
use sentimind::db::Database;
use sentimind::feed::{FeedAdapter, FeedError, FeedSource};
use sentimind::SentimindState;
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

/// Positive exactly when the text mentions "love" or "great".
pub struct KeywordModel;

impl SentimentModel for KeywordModel {
    fn predict(&self, text: &str) -> u8 {
        let lower = text.to_lowercase();
        u8::from(lower.contains("love") || lower.contains("great"))
    }
}

/// Serves two posts for `happyuser`; every other identity fails upstream.
pub struct FakeFeed;

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch_recent(&self, identity: &str, limit: usize) -> Result<Vec<String>, FeedError> {
        match identity {
            "happyuser" => Ok(vec![
                "I love rust so much".to_string(),
                "Stuck in traffic again today".to_string(),
            ]
            .into_iter()
            .take(limit)
            .collect()),
            other => Err(FeedError::UnknownIdentity(other.to_string())),
        }
    }
}

pub struct TempDb {
    pub path: PathBuf,
    pub db: Database,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub async fn temp_db(tag: &str) -> TempDb {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "sentimind-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let database_url = format!("sqlite:{}", path.display());
    let db = Database::connect(&database_url)
        .await
        .expect("failed to open temp database");
    TempDb { path, db }
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.admin.usernames.insert("tena".to_string());
    cfg.basic.insecure_cookie = true;
    cfg
}

pub fn test_state(db: &Database) -> SentimindState {
    let cfg = test_config();
    let classifier = Classifier::new(Arc::new(KeywordModel), cfg.classifier.confidence);
    let feed = FeedAdapter::new(Arc::new(FakeFeed), cfg.feed.default_limit);
    SentimindState::new(db, classifier, feed, &cfg).expect("failed to build state")
}

pub fn test_app(db: &Database) -> Router {
    sentimind::sentimind_router(test_state(db))
}

/// A client that carries the session cookie between requests.
pub struct Client {
    app: Router,
    cookie: Option<String>,
}

impl Client {
    pub fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.send("GET", uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> Response<Body> {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn send(&mut self, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");

        if let Some(set_cookie) = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default();
            self.cookie = Some(pair.to_string());
        }
        resp
    }

    pub async fn login(&mut self, username: &str, password: &str) {
        let resp = self
            .post(
                "/api/signup",
                serde_json::json!({"username": username, "password": password}),
            )
            .await;
        assert!(resp.status().is_success(), "signup failed: {}", resp.status());
        let resp = self
            .post(
                "/api/login",
                serde_json::json!({"username": username, "password": password}),
            )
            .await;
        assert!(resp.status().is_success(), "login failed: {}", resp.status());
    }
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not JSON")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}
