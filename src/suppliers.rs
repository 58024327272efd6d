//! Supplier resource: read-only reference data used for order pricing

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// A water supplier with its volume-based pricing tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(rename = "_id")]
    pub id: String,

    /// Company display name
    pub company: String,

    /// Ordered pricing tiers; the first tier containing the requested
    /// quantity applies
    #[serde(default)]
    pub pricing: Vec<PricingTier>,
}

/// One volume band of a supplier's price list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    /// Inclusive lower bound in liters
    pub min_volume: f64,

    /// Inclusive upper bound in liters
    pub max_volume: f64,

    /// Unit price in currency per liter
    pub price_per_liter: f64,
}

/// HTTP wrapper for the `/suppliers` resource
#[derive(Clone)]
pub struct SuppliersApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl SuppliersApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    /// Fetch all suppliers
    pub async fn list(&self, token: &str, cancel: &CancelToken) -> Result<Vec<Supplier>, Error> {
        Fetch::get(&self.client, &format!("{}/suppliers", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .cancel_token(cancel)
            .execute::<Vec<Supplier>>()
            .await
    }
}
