//! Base URL resolution.
//!
//! The API origin is deployment configuration: it is resolved once, before a
//! `Dispatcher` is constructed, and the dispatcher only ever sees the final
//! `ApiConfig`.
//!
//! `ApiConfig::from_env` looks, in order, at:
//! - `API_BASE_URL` in the process environment
//! - `API_BASE_URL` captured at compile time
//! - the default of the active [`Environment`] (`API_ENV`, else the build
//!   profile)

use std::{env, fmt, str::FromStr};

use url::Url;

use crate::error::ConfigError;

/// Path prefix shared by every backend route.
pub const API_PREFIX: &str = "/api";

pub const BASE_URL_ENV: &str = "API_BASE_URL";

pub const ENVIRONMENT_ENV: &str = "API_ENV";

/// Port the local development backend listens on.
pub const DEV_BACKEND_PORT: u16 = 3000;

/// Deployment environment the client is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `API_ENV` if set, otherwise `Development` for debug builds and
    /// `Production` for release builds.
    pub fn current() -> Result<Self, ConfigError> {
        match env::var(ENVIRONMENT_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ if cfg!(debug_assertions) => Ok(Environment::Development),
            _ => Ok(Environment::Production),
        }
    }

    /// Base URL used when nothing is configured explicitly. Production has
    /// no implicit origin.
    pub fn default_base_url(self) -> Option<String> {
        match self {
            Environment::Development => Some(format!("http://127.0.0.1:{DEV_BACKEND_PORT}")),
            Environment::Production => None,
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Resolved location of the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    prefix: String,
}

impl ApiConfig {
    /// Use `base_url` as-is, minus any trailing `/`. An empty base URL yields
    /// same-origin relative URLs.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: API_PREFIX.to_string(),
        }
    }

    /// Like [`new`](Self::new), but rejects non-empty base URLs that do not
    /// parse as absolute URLs.
    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        if !trimmed.is_empty() {
            Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
                url: trimmed.to_string(),
                source,
            })?;
        }
        Ok(Self::new(trimmed))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(feature = "env")]
        let _ = dotenvy::dotenv();

        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            return Self::parse(&base_url);
        }
        if let Some(base_url) = option_env!("API_BASE_URL") {
            return Self::parse(base_url);
        }

        let environment = Environment::current()?;
        let base_url = environment
            .default_base_url()
            .ok_or(ConfigError::MissingBaseUrl(environment))?;
        tracing::debug!(%environment, %base_url, "using default base URL");
        Self::parse(&base_url)
    }

    /// Replace the `/api` prefix. Pass `""` to address the origin directly.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `base + prefix + path`, with no normalization of `path`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.prefix, path)
    }
}
