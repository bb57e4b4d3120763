use dotenv::dotenv;
use std::env;
use std::time::Duration;

pub const BASE_URL_ENV_VAR: &str = "MENU_API_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "MENU_API_TIMEOUT_SECS";
pub const DEFAULT_BASE_URL: &str = "https://menu-mvp-api.onrender.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the remote menu API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv().ok();

        let base_url = env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = env::var(TIMEOUT_ENV_VAR)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::default()
            .with_base_url(&base_url)
            .with_timeout(Duration::from_secs(timeout_secs))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
