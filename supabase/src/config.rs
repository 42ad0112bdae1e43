//! Provider configuration
//!
//! The provider needs the management API server and an access token. Both can
//! come from the environment; explicitly configured values win. The bindings
//! only check the configuration; the provider plugin makes the API calls.

use resplug::CheckFailure;
use std::fmt;
use thiserror::Error;
use url::Url;

pub const SERVER_ENV: &str = "SUPABASE_SERVER";
pub const TOKEN_ENV: &str = "SUPABASE_TOKEN";
pub const DEFAULT_SERVER: &str = "https://api.supabase.com/v1/";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing supabase token")]
    MissingToken,

    #[error("error parsing supabase url: {0}")]
    InvalidServer(String),
}

impl ConfigError {
    /// Property the error is reported against
    pub fn property(&self) -> &'static str {
        match self {
            ConfigError::MissingToken => "token",
            ConfigError::InvalidServer(_) => "server",
        }
    }
}

impl From<ConfigError> for CheckFailure {
    fn from(err: ConfigError) -> Self {
        CheckFailure::new(err.property(), err.to_string())
    }
}

/// Configuration as supplied by the program, before env fallbacks
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub server: Option<String>,
    pub token: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("server", &self.server)
            .field("token", &self.token.as_ref().map(|_| "[secret]"))
            .finish()
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Every problem with the configuration, not just the first
    pub fn check(&self) -> Vec<CheckFailure> {
        let mut failures = Vec::new();

        let server = self.server.clone().or_else(|| non_empty_env(SERVER_ENV));
        if let Some(server) = server {
            if let Err(e) = Url::parse(&server) {
                failures.push(ConfigError::InvalidServer(e.to_string()).into());
            }
        }

        let has_token = self
            .token
            .clone()
            .or_else(|| non_empty_env(TOKEN_ENV))
            .is_some_and(|t| !t.is_empty());
        if !has_token {
            failures.push(ConfigError::MissingToken.into());
        }

        failures
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
