//! Tank resource: read tank state, patch tank configuration

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// A physical water reservoir tracked by the system.
///
/// Created server-side at registration; the client only reads state and
/// patches configuration fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    #[serde(rename = "_id")]
    pub id: String,

    /// Total capacity in liters
    pub capacity: f64,

    /// Average consumption in liters per day
    #[serde(default)]
    pub avg_daily_usage: f64,

    /// Percent level below which the tank counts as low
    #[serde(default = "default_low_water_threshold")]
    pub low_water_threshold: f64,

    /// Current fill level as a percentage of capacity
    #[serde(default)]
    pub current_level: f64,

    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub location: Option<String>,
}

fn default_low_water_threshold() -> f64 {
    20.0
}

/// Configuration fields a user may change from the settings screen
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_daily_usage: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_water_threshold: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// HTTP wrapper for the `/tanks` resource
#[derive(Clone)]
pub struct TanksApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl TanksApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    /// Fetch all tanks owned by the current user
    pub async fn list(&self, token: &str, cancel: &CancelToken) -> Result<Vec<Tank>, Error> {
        Fetch::get(&self.client, &format!("{}/tanks", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .cancel_token(cancel)
            .execute::<Vec<Tank>>()
            .await
    }

    /// Fetch a single tank by id
    pub async fn get(&self, token: &str, tank_id: &str) -> Result<Tank, Error> {
        Fetch::get(&self.client, &format!("{}/tanks/{}", self.base_url, tank_id))
            .timeout(self.timeout)
            .bearer_auth(token)
            .execute::<Tank>()
            .await
    }

    /// Patch a tank's configuration fields, returning the updated record
    pub async fn update_settings(
        &self,
        token: &str,
        tank_id: &str,
        settings: &TankSettings,
    ) -> Result<Tank, Error> {
        Fetch::patch(&self.client, &format!("{}/tanks/{}", self.base_url, tank_id))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(settings)?
            .execute::<Tank>()
            .await
    }
}
