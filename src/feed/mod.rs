//! Social Feed Adapter: read-only access to a user's recent posts.
//!
//! Upstream failures never reach the caller as errors. [`FeedAdapter`] turns
//! them into an empty result plus a warning the page can show inline.

pub mod reddit;

pub use reddit::RedditFeed;

use crate::config::FeedConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tracing::{info, warn};

#[derive(Debug, ThisError)]
pub enum FeedError {
    #[error("feed service credentials are not configured")]
    NotConfigured,

    #[error("feed authentication failed: {0}")]
    Auth(String),

    #[error("unknown identity: {0}")]
    UnknownIdentity(String),

    #[error("upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A source of recent posts for an identity, newest first.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_recent(&self, identity: &str, limit: usize) -> Result<Vec<String>, FeedError>;
}

/// Stand-in used when no application credentials are configured.
pub struct DisabledFeed;

#[async_trait]
impl FeedSource for DisabledFeed {
    async fn fetch_recent(&self, _identity: &str, _limit: usize) -> Result<Vec<String>, FeedError> {
        Err(FeedError::NotConfigured)
    }
}

/// Outcome of a fetch. `warning` is set exactly when the fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedFetch {
    pub posts: Vec<String>,
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct FeedAdapter {
    source: Arc<dyn FeedSource>,
    default_limit: usize,
}

impl FeedAdapter {
    pub fn new(source: Arc<dyn FeedSource>, default_limit: usize) -> Self {
        Self {
            source,
            default_limit,
        }
    }

    /// Build the Reddit-backed adapter, or a disabled one when credentials are absent.
    pub fn from_config(cfg: &FeedConfig) -> Result<Self, FeedError> {
        let source: Arc<dyn FeedSource> = match RedditFeed::from_config(cfg)? {
            Some(reddit) => Arc::new(reddit),
            None => {
                info!("feed credentials not configured; feed analysis disabled");
                Arc::new(DisabledFeed)
            }
        };
        Ok(Self::new(source, cfg.default_limit))
    }

    /// Each call queries the upstream service afresh. A missing or zero limit
    /// falls back to the configured default.
    pub async fn fetch_recent(&self, identity: &str, limit: Option<usize>) -> FeedFetch {
        let limit = limit.filter(|&n| n > 0).unwrap_or(self.default_limit);
        match self.source.fetch_recent(identity, limit).await {
            Ok(posts) => {
                info!(identity = %identity, count = posts.len(), "fetched recent posts");
                FeedFetch {
                    posts,
                    warning: None,
                }
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "feed fetch failed");
                FeedFetch {
                    posts: Vec::new(),
                    warning: Some(format!("Error fetching posts: {e}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<&'static str>);

    #[async_trait]
    impl FeedSource for Fixed {
        async fn fetch_recent(&self, _identity: &str, limit: usize) -> Result<Vec<String>, FeedError> {
            Ok(self.0.iter().take(limit).map(|s| s.to_string()).collect())
        }
    }

    #[tokio::test]
    async fn failures_degrade_to_an_empty_result_with_a_warning() {
        let adapter = FeedAdapter::new(Arc::new(DisabledFeed), 5);
        let fetch = adapter.fetch_recent("someone", None).await;
        assert!(fetch.posts.is_empty());
        assert!(fetch.warning.unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn default_limit_applies_when_none_is_given() {
        let adapter = FeedAdapter::new(Arc::new(Fixed(vec!["a", "b", "c"])), 2);
        assert_eq!(
            adapter.fetch_recent("x", None).await,
            FeedFetch {
                posts: vec!["a".to_string(), "b".to_string()],
                warning: None
            }
        );
        assert_eq!(adapter.fetch_recent("x", Some(3)).await.posts.len(), 3);
    }

    #[tokio::test]
    async fn zero_limit_falls_back_to_the_default() {
        let adapter = FeedAdapter::new(Arc::new(Fixed(vec!["a", "b", "c"])), 2);
        let fetch = adapter.fetch_recent("x", Some(0)).await;
        assert_eq!(fetch.posts, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(fetch.warning, None);
    }
}
