//! Webhook handler for Docker registry push events

use axum::{body::Bytes, extract::State as AxumState, http::StatusCode};
use std::fmt;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::SharedState;
use crate::error::{RelayError, Result};
use crate::notifier::Notification;
use crate::webhook::WebhookEvent;

/// How an accepted webhook was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    NotPush,
    NotWatched { image: String },
    NotificationSent,
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookOutcome::NotPush => write!(f, "Not a push event"),
            WebhookOutcome::NotWatched { image } => write!(f, "Image {} not in watch list", image),
            WebhookOutcome::NotificationSent => write!(f, "Notification sent"),
        }
    }
}

/// Handles the Docker registry webhook POST request.
///
/// Always answers: `200` for ignored or relayed events, `500` with a generic
/// body for anything that went wrong along the way.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    body: Bytes,
) -> (StatusCode, String) {
    let span = info_span!("webhook", request_id = %Uuid::now_v7());

    async move {
        match relay_event(&state, &body).await {
            Ok(outcome) => (StatusCode::OK, outcome.to_string()),
            Err(RelayError::NotificationRejected { status, body }) => {
                error!(
                    "Failed to send notification: {} - {}",
                    status.as_u16(),
                    body
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send notification".to_string(),
                )
            }
            Err(e) => {
                error!("Error processing webhook: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing webhook".to_string(),
                )
            }
        }
    }
    .instrument(span)
    .await
}

/// Filters the event against the watch list and makes at most one
/// outbound notification attempt.
async fn relay_event(state: &SharedState, body: &[u8]) -> Result<WebhookOutcome> {
    let push = match WebhookEvent::from_slice(body)? {
        WebhookEvent::Push(push) => push,
        WebhookEvent::Other(action) => {
            info!("Not push event; Received {:?} action", action);
            return Ok(WebhookOutcome::NotPush);
        }
    };

    if !state.config.watched_images.matches(&push.name, &push.repo_name) {
        info!("Image {} not in watch list", push.repo_name);
        return Ok(WebhookOutcome::NotWatched {
            image: push.repo_name,
        });
    }

    state.notifier.send(&Notification::for_push(&push)).await?;
    info!("Notification sent for {}:{}", push.repo_name, push.tag);

    Ok(WebhookOutcome::NotificationSent)
}
