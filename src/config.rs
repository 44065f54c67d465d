//! Process configuration, resolved once from the environment at startup.

use serde::Serialize;
use std::time::Duration;

use crate::error::{RelayError, Result};

pub const DEFAULT_GOTIFY_URL: &str = "http://localhost:80";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

pub const GOTIFY_URL_VAR: &str = "GOTIFY_URL";
pub const GOTIFY_TOKEN_VAR: &str = "GOTIFY_TOKEN";
pub const WATCHED_IMAGES_VAR: &str = "WATCHED_IMAGES";
pub const GOTIFY_TIMEOUT_VAR: &str = "GOTIFY_TIMEOUT_SECS";

/// Image identifiers (short or full repository names) that trigger a notification.
///
/// Keeps the configured order so `/health` reports the list as it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WatchList(Vec<String>);

impl WatchList {
    /// Parses a comma separated list. Entries are trimmed, empty entries
    /// dropped and repeats collapsed to their first occurrence.
    pub fn parse(raw: &str) -> Self {
        let mut images: Vec<String> = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !images.iter().any(|i| i == entry) {
                images.push(entry.to_string());
            }
        }
        Self(images)
    }

    pub fn contains(&self, image: &str) -> bool {
        self.0.iter().any(|i| i == image)
    }

    /// True if either name of the pushed repository is watched.
    pub fn matches(&self, short_name: &str, full_name: &str) -> bool {
        self.contains(short_name) || self.contains(full_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Notification service base URL, without trailing slash
    pub gotify_url: String,
    pub gotify_token: String,
    pub watched_images: WatchList,
    /// Upper bound for the outbound call. `None` means no timeout.
    pub timeout: Option<Duration>,
}

impl RelayConfig {
    pub fn new(gotify_url: &str, gotify_token: &str, watched_images: WatchList) -> Self {
        Self {
            gotify_url: normalize_url(gotify_url),
            gotify_token: gotify_token.to_string(),
            watched_images,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    /// Fails if the token is missing or the watch list ends up empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gotify_url = lookup(GOTIFY_URL_VAR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GOTIFY_URL.to_string());

        let gotify_token = lookup(GOTIFY_TOKEN_VAR)
            .filter(|s| !s.trim().is_empty())
            .ok_or(RelayError::MissingEnv(GOTIFY_TOKEN_VAR))?;

        let watched_images = WatchList::parse(&lookup(WATCHED_IMAGES_VAR).unwrap_or_default());
        if watched_images.is_empty() {
            return Err(RelayError::MissingEnv(WATCHED_IMAGES_VAR));
        }

        let mut config = Self::new(&gotify_url, &gotify_token, watched_images);
        if let Some(raw) = lookup(GOTIFY_TIMEOUT_VAR) {
            config = config.with_timeout(parse_timeout(&raw)?);
        }
        Ok(config)
    }

    /// Full URL of the notification service's message endpoint.
    pub fn message_url(&self) -> String {
        format!("{}/message", self.gotify_url)
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(RelayError::ConfigError(format!(
            "{} must be a positive number of seconds, got '{}'",
            GOTIFY_TIMEOUT_VAR, raw
        ))),
    }
}
