//! Outbound notifications to a Gotify-compatible push service

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::webhook::PushEvent;

pub const NOTIFICATION_TITLE: &str = "🐳 New Docker Tag Released";
pub const NOTIFICATION_PRIORITY: u8 = 5;

/// Body of `POST {base}/message`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: u8,
}

impl Notification {
    /// Builds the "new tag released" notification for a push event.
    pub fn for_push(event: &PushEvent) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            message: format!(
                "**Image:** {}\n**Tag:** {}\n**Pushed:** {}",
                event.repo_name, event.tag, event.pushed_at
            ),
            priority: NOTIFICATION_PRIORITY,
        }
    }
}

/// Client for the notification service. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct GotifyClient {
    client: Client,
    message_url: String,
    token: String,
}

impl GotifyClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            message_url: config.message_url(),
            token: config.gotify_token.clone(),
        })
    }

    /// Posts the notification. A non-2xx answer becomes
    /// `RelayError::NotificationRejected` carrying the status and response text.
    pub async fn send(&self, notification: &Notification) -> Result<()> {
        debug!("POST {} ({:?})", self.message_url, notification.title);

        let response = self
            .client
            .post(&self.message_url)
            .query(&[("token", self.token.as_str())])
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        Err(RelayError::NotificationRejected { status, body })
    }
}
