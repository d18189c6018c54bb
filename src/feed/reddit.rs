use super::{FeedError, FeedSource};
use crate::config::FeedConfig;
use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{ClientId, ClientSecret, EndpointNotSet, EndpointSet, TokenResponse, TokenUrl};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
/// Upper bound the listing endpoint accepts for `limit`.
const MAX_LIMIT: usize = 100;

type RedditOauthClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Application-only (client credentials) access to Reddit's read API.
pub struct RedditFeed {
    http: reqwest::Client,
    oauth: RedditOauthClient,
    api_base: Url,
}

impl RedditFeed {
    /// `None` when the configuration carries no application credentials.
    pub fn from_config(cfg: &FeedConfig) -> Result<Option<Self>, FeedError> {
        let Some((client_id, client_secret)) = cfg.credentials() else {
            return Ok(None);
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            // The token endpoint must not be followed through redirects.
            .redirect(reqwest::redirect::Policy::none());
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let http = builder.build()?;

        let oauth = BasicClient::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_token_uri(TokenUrl::new(REDDIT_TOKEN_URL.to_string())?);

        Ok(Some(Self {
            http,
            oauth,
            api_base: Url::parse(REDDIT_API_BASE)?,
        }))
    }

    async fn access_token(&self) -> Result<String, FeedError> {
        let token = self
            .oauth
            .exchange_client_credentials()
            .request_async(&self.http)
            .await
            .map_err(|e| FeedError::Auth(e.to_string()))?;
        Ok(token.access_token().secret().clone())
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    async fn fetch_recent(&self, identity: &str, limit: usize) -> Result<Vec<String>, FeedError> {
        let token = self.access_token().await?;
        let url = submissions_url(&self.api_base, identity, limit)?;
        debug!(url = %url, "requesting submissions");

        let resp = self.http.get(url).bearer_auth(token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status, identity));
        }
        let listing: Listing = resp.json().await?;
        Ok(listing.into_posts())
    }
}

/// `{base}/user/{identity}/submitted?sort=new&limit={limit}&raw_json=1`
pub fn submissions_url(base: &Url, identity: &str, limit: usize) -> Result<Url, FeedError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FeedError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(["user", identity, "submitted"]);
    url.query_pairs_mut()
        .append_pair("sort", "new")
        .append_pair("limit", &limit.clamp(1, MAX_LIMIT).to_string())
        .append_pair("raw_json", "1");
    Ok(url)
}

fn status_error(status: StatusCode, identity: &str) -> FeedError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FeedError::Auth(format!("upstream refused access ({status})"))
        }
        StatusCode::NOT_FOUND => FeedError::UnknownIdentity(identity.to_string()),
        other => FeedError::UpstreamStatus(other),
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: Submission,
}

#[derive(Debug, Deserialize)]
struct Submission {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
}

impl Listing {
    fn into_posts(self) -> Vec<String> {
        self.data
            .children
            .into_iter()
            .map(|thing| thing.data.into_text())
            .collect()
    }
}

impl Submission {
    /// Title, followed by the body when there is one.
    fn into_text(self) -> String {
        if self.selftext.is_empty() {
            self.title
        } else {
            format!("{} {}", self.title, self.selftext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_concatenates_title_and_body_in_order() {
        let listing: Listing = serde_json::from_str(
            r#"{"kind": "Listing", "data": {"after": null, "children": [
                {"kind": "t3", "data": {"title": "Newest", "selftext": "with a body"}},
                {"kind": "t3", "data": {"title": "Link post", "selftext": ""}},
                {"kind": "t3", "data": {"title": "No body field"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(
            listing.into_posts(),
            vec!["Newest with a body", "Link post", "No body field"]
        );
    }

    #[test]
    fn submissions_url_escapes_the_identity_and_clamps_the_limit() {
        let base = Url::parse(REDDIT_API_BASE).unwrap();
        let url = submissions_url(&base, "spez", 5).unwrap();
        assert_eq!(
            url.as_str(),
            "https://oauth.reddit.com/user/spez/submitted?sort=new&limit=5&raw_json=1"
        );

        let url = submissions_url(&base, "a/b", 1000).unwrap();
        assert!(url.path().starts_with("/user/a%2Fb/"));
        assert!(url.query().unwrap().contains("limit=100"));
    }

    #[test]
    fn upstream_statuses_map_to_feed_errors() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "x"),
            FeedError::Auth(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "ghost"),
            FeedError::UnknownIdentity(id) if id == "ghost"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "x"),
            FeedError::UpstreamStatus(StatusCode::BAD_GATEWAY)
        ));
    }

    #[test]
    fn no_credentials_means_no_client() {
        assert!(RedditFeed::from_config(&FeedConfig::default()).unwrap().is_none());
    }
}
