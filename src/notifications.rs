//! Notification resource: fetch the feed, append client-synthesized events

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// A notification feed entry.
///
/// Append-only from the client's perspective: entries are created as side
/// effects of other operations (login, order placed/cancelled) and fetched
/// back on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,

    /// Category tag ("welcome", "order", "delivery", "warning", ...)
    #[serde(rename = "type")]
    pub kind: String,

    pub message: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub read: bool,

    /// Id of the entity this notification refers to, if any
    #[serde(default)]
    pub related_to: Option<String>,
}

/// Payload for a client-synthesized notification
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
}

/// Per-channel notification opt-ins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub push: bool,
    pub sms: bool,
    pub email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push: true,
            sms: false,
            email: true,
        }
    }
}

/// HTTP wrapper for the `/notifications` resource
#[derive(Clone)]
pub struct NotificationsApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl NotificationsApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    /// Fetch the current user's notification feed
    pub async fn list(
        &self,
        token: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Notification>, Error> {
        Fetch::get(&self.client, &format!("{}/notifications", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .cancel_token(cancel)
            .execute::<Vec<Notification>>()
            .await
    }

    /// Append a client-synthesized notification
    pub async fn create(&self, token: &str, notification: &NewNotification) -> Result<(), Error> {
        Fetch::post(&self.client, &format!("{}/notifications", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(notification)?
            .execute_empty()
            .await
    }
}
