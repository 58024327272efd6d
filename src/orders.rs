//! Order resource: list, place, cancel, and reschedule delivery orders

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::cancel::CancelToken;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// Lifecycle state of a delivery order.
///
/// Placed orders move through acknowledged/scheduled to completed, or to
/// cancelled at any point before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Acknowledged,
    Scheduled,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether the order still has a delivery ahead of it
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Placed | Self::Acknowledged | Self::Scheduled)
    }

    /// Whether the order has reached a terminal state
    pub fn is_past(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A water delivery order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,

    /// Human-facing order reference (e.g. "WO-5821")
    pub order_number: String,

    pub tank_id: String,

    #[serde(default)]
    pub supplier_id: Option<String>,

    pub status: OrderStatus,

    #[serde(rename = "createdAt")]
    pub order_date: DateTime<Utc>,

    #[serde(default)]
    pub scheduled_delivery_date: Option<DateTime<Utc>>,

    /// Ordered volume in liters
    pub quantity: f64,

    /// Total price, computed client-side from the supplier's tiers
    pub price: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for placing a new order.
///
/// The price is expected to have been computed by the caller from the
/// supplier's pricing tiers; the server does not recompute it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub tank_id: String,
    pub supplier_id: String,
    pub quantity: f64,
    pub requested_delivery_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    pub price: f64,
}

/// HTTP wrapper for the `/orders` resource
#[derive(Clone)]
pub struct OrdersApi {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl OrdersApi {
    pub(crate) fn new(base_url: &str, client: Client, options: &ClientOptions) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            timeout: options.request_timeout,
        }
    }

    /// Fetch all orders for the current user
    pub async fn list(&self, token: &str, cancel: &CancelToken) -> Result<Vec<Order>, Error> {
        Fetch::get(&self.client, &format!("{}/orders", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .cancel_token(cancel)
            .execute::<Vec<Order>>()
            .await
    }

    /// Place a new order, returning the created record
    pub async fn place(&self, token: &str, order: &NewOrder) -> Result<Order, Error> {
        Fetch::post(&self.client, &format!("{}/orders", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(order)?
            .execute::<Order>()
            .await
    }

    /// Cancel an order that has not yet completed
    pub async fn cancel(&self, token: &str, order_id: &str) -> Result<(), Error> {
        Fetch::patch(
            &self.client,
            &format!("{}/orders/{}/cancel", self.base_url, order_id),
        )
        .timeout(self.timeout)
        .bearer_auth(token)
        .execute_empty()
        .await
    }

    /// Move an order's scheduled delivery to a new date
    pub async fn reschedule(
        &self,
        token: &str,
        order_id: &str,
        new_date: DateTime<Utc>,
    ) -> Result<(), Error> {
        Fetch::patch(&self.client, &format!("{}/orders/{}", self.base_url, order_id))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(&json!({ "scheduledDeliveryDate": new_date }))?
            .execute_empty()
            .await
    }
}
