use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

/// Where the recommendation collection comes from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Built-in mock collection served after `fetch_delay_ms`
    Static,
    /// `recommendations` table of the hosted database
    Remote,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Hosted auth/database service URL
    #[serde(default = "default_supabase_url")]
    pub supabase_url: String,

    /// Public (anon) API key for the hosted service
    #[serde(default = "default_supabase_anon_key")]
    pub supabase_anon_key: String,

    #[serde(default = "default_source")]
    pub recommendation_source: SourceKind,

    /// Simulated latency of the static source
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_supabase_url() -> String {
    "https://default-supabase-url.supabase.co".to_string()
}

fn default_supabase_anon_key() -> String {
    "default-anon-key".to_string()
}

fn default_source() -> SourceKind {
    SourceKind::Static
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: default_supabase_url(),
            supabase_anon_key: default_supabase_anon_key(),
            recommendation_source: default_source(),
            fetch_delay_ms: default_fetch_delay_ms(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        Ok(config.with_blank_defaults())
    }

    /// Blank service settings fall back to their defaults, like unset ones
    fn with_blank_defaults(mut self) -> Self {
        if self.supabase_url.trim().is_empty() {
            tracing::warn!("SUPABASE_URL is blank, using the default");
            self.supabase_url = default_supabase_url();
        }
        if self.supabase_anon_key.trim().is_empty() {
            tracing::warn!("SUPABASE_ANON_KEY is blank, using the default");
            self.supabase_anon_key = default_supabase_anon_key();
        }
        self
    }

    /// Validated hosted service settings, as the client libraries require them
    pub fn service(&self) -> Result<ServiceSettings, ConfigError> {
        ServiceSettings::new(&self.supabase_url, &self.supabase_anon_key)
    }
}

/// Base URL and public key shared by every hosted service client
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub anon_key: String,
}

impl ServiceSettings {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if anon_key.trim().is_empty() {
            return Err(ConfigError::MissingKey);
        }

        let base_url = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", base_url.scheme()),
            });
        }

        Ok(Self {
            base_url,
            anon_key: anon_key.to_string(),
        })
    }

    /// Joins a service path onto the base URL, keeping any base path prefix
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
