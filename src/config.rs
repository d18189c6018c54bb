use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use url::Url;

/// File consulted for configuration overrides, relative to the working directory.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `SENTIMIND_BASIC__DATABASE_URL`.
pub const ENV_PREFIX: &str = "SENTIMIND_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub admin: AdminConfig,
    pub classifier: ClassifierConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Master key for the private session cookie. Must be at least 64 bytes.
    pub cookie_secret: Option<String>,
    pub insecure_cookie: bool,
    /// A session untouched for this long is logged out and forgotten.
    pub session_idle_secs: u64,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:senti.db".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
            session_idle_secs: 1800,
        }
    }
}

/// Usernames allowed to read and export the full history log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub usernames: BTreeSet<String>,
}

impl AdminConfig {
    pub fn is_admin(&self, username: &str) -> bool {
        self.usernames.contains(username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// Reported with every prediction; the model exposes no calibrated score.
    pub confidence: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.json"),
            confidence: 0.9,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    pub default_limit: usize,
    pub timeout_secs: u64,
    pub proxy: Option<Url>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: "SentimentAnalysisApp".to_string(),
            default_limit: 5,
            timeout_secs: 15,
            proxy: None,
        }
    }
}

impl FeedConfig {
    /// Both halves of the application credential, when configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }
}

// Hand-written so the client secret never reaches a log line.
impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("default_limit", &self.default_limit)
            .field("timeout_secs", &self.timeout_secs)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl Config {
    /// Defaults, then `config.toml` if present, then `SENTIMIND_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
